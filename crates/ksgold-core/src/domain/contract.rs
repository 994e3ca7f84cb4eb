//! 거래소 및 상품(계약) 참조 정보.

use crate::types::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 게이트웨이가 지원하는 거래소.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    /// 상하이 금 거래소 (Shanghai Gold Exchange)
    Sge,
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exchange::Sge => write!(f, "SGE"),
        }
    }
}

/// 상품 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    /// 현물 (T+D 포함)
    Spot,
}

/// 상품 조회 응답으로부터 생성되는 계약 정보.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    /// 게이트웨이 이름
    pub gateway_name: String,
    /// 상품 코드
    pub symbol: String,
    /// 거래소
    pub exchange: Exchange,
    /// 표시 이름
    pub name: String,
    /// 상품 분류
    pub product: Product,
    /// 계약 단위
    pub size: Quantity,
    /// 최소 호가 단위
    pub pricetick: Price,
}
