//! 포지션 및 계좌 잔고.
//!
//! 이 모듈은 조회 응답으로부터 생성되는 타입을 정의합니다:
//! - `Position` - 방향별 포지션 스냅샷
//! - `Account` - 자금 계좌 스냅샷

use crate::domain::{Direction, Exchange};
use crate::types::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 한 방향(롱 또는 숏)의 포지션 스냅샷.
///
/// 벤더는 상품 하나에 대해 롱/숏 수량을 한 레코드로 보내므로
/// 게이트웨이는 응답 하나당 두 개의 포지션을 내보냅니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// 게이트웨이 이름
    pub gateway_name: String,
    /// 상품 코드
    pub symbol: String,
    /// 거래소
    pub exchange: Exchange,
    /// 포지션 방향
    pub direction: Direction,
    /// 현재 보유 수량
    pub volume: Quantity,
    /// 전일 보유 수량
    pub yd_volume: Quantity,
    /// 동결(청산 주문에 묶인) 수량
    pub frozen: Quantity,
    /// 평균 진입 가격
    pub price: Price,
    /// 손익 (벤더 미제공, 항상 0)
    pub pnl: Decimal,
}

impl Position {
    /// 청산 가능한 수량을 반환합니다.
    pub fn available(&self) -> Quantity {
        (self.volume - self.frozen).max(Decimal::ZERO)
    }

    /// 포지션이 비어 있는지 확인합니다.
    pub fn is_flat(&self) -> bool {
        self.volume.is_zero()
    }
}

/// 자금 계좌 스냅샷.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// 게이트웨이 이름
    pub gateway_name: String,
    /// 계좌 ID
    pub account_id: String,
    /// 총 잔고 (가용 + 동결)
    pub balance: Decimal,
    /// 동결 자금
    pub frozen: Decimal,
}

impl Account {
    /// 가용 자금을 반환합니다.
    pub fn available(&self) -> Decimal {
        self.balance - self.frozen
    }
}
