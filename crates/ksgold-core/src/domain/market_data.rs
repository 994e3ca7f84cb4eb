//! 시장 데이터 타입 및 구조체.
//!
//! 이 모듈은 시장 데이터 관련 타입을 정의합니다:
//! - `Tick` - 실시간 시세 스냅샷 (최대 5단계 호가 포함)
//! - `DepthLevel` - 호가 단계
//! - `SubscribeRequest` - 시세 구독 요청

use crate::domain::Exchange;
use crate::types::{Price, Quantity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 호가창 가격 레벨.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthLevel {
    /// 가격
    pub price: Price,
    /// 잔량
    pub volume: Quantity,
}

impl DepthLevel {
    /// 새 호가 레벨을 생성합니다.
    pub fn new(price: Price, volume: Quantity) -> Self {
        Self { price, volume }
    }
}

/// 정규화된 실시간 시세.
///
/// `bids`/`asks`는 1단계만 들어있거나 5단계가 모두 들어있습니다.
/// 벤더가 2단계 잔량을 보내지 않으면 1단계만 유효한 것으로 봅니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tick {
    /// 게이트웨이 이름
    pub gateway_name: String,
    /// 상품 코드
    pub symbol: String,
    /// 거래소
    pub exchange: Exchange,
    /// 상품 표시 이름
    pub name: String,
    /// 시세 시각 (거래소 현지 시각을 UTC로 변환)
    pub datetime: DateTime<Utc>,
    /// 누적 거래량
    pub volume: Quantity,
    /// 미결제약정
    pub open_interest: Quantity,
    /// 최근 체결가
    pub last_price: Price,
    /// 상한가
    pub limit_up: Price,
    /// 하한가
    pub limit_down: Price,
    /// 시가
    pub open_price: Price,
    /// 고가
    pub high_price: Price,
    /// 저가
    pub low_price: Price,
    /// 전일 종가
    pub pre_close: Price,
    /// 매수 호가 - 1단계부터 순서대로
    pub bids: Vec<DepthLevel>,
    /// 매도 호가 - 1단계부터 순서대로
    pub asks: Vec<DepthLevel>,
}

impl Tick {
    /// 최우선 매수 호가를 반환합니다.
    pub fn best_bid(&self) -> Option<&DepthLevel> {
        self.bids.first()
    }

    /// 최우선 매도 호가를 반환합니다.
    pub fn best_ask(&self) -> Option<&DepthLevel> {
        self.asks.first()
    }

    /// 5단계 호가가 채워져 있는지 확인합니다.
    pub fn has_full_depth(&self) -> bool {
        self.bids.len() > 1 || self.asks.len() > 1
    }
}

/// 시세 구독 요청.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscribeRequest {
    /// 상품 코드
    pub symbol: String,
    /// 거래소
    pub exchange: Exchange,
}

impl SubscribeRequest {
    /// 새 구독 요청을 생성합니다.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            exchange: Exchange::Sge,
        }
    }
}
