//! 주문 타입 및 관리.
//!
//! 이 모듈은 게이트웨이의 주문 관련 타입을 정의합니다:
//! - `Direction` - 주문 방향 (매수/매도)
//! - `Offset` - 개평 구분 (신규/청산)
//! - `Status` - 정규화된 주문 상태
//! - `OrderRequest` / `CancelRequest` - 호스트 플랫폼에서 들어오는 요청
//! - `Order` - 주문 엔티티

use crate::domain::Exchange;
use crate::types::{Price, Quantity};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 주문 방향 (매수 또는 매도).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// 매수 (롱)
    Long,
    /// 매도 (숏)
    Short,
}

impl Direction {
    /// 반대 방향을 반환합니다.
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Long => Direction::Short,
            Direction::Short => Direction::Long,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

/// 개평 구분 (포지션 신규 진입/청산 의도).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Offset {
    /// 구분 없음 (거부 경로 등 코드를 알 수 없는 경우)
    None,
    /// 신규 진입
    Open,
    /// 청산
    Close,
}

impl std::fmt::Display for Offset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Offset::None => write!(f, "NONE"),
            Offset::Open => write!(f, "OPEN"),
            Offset::Close => write!(f, "CLOSE"),
        }
    }
}

/// 정규화된 주문 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// 제출 중 (거래소 확인 전)
    Submitting,
    /// 미체결
    NotTraded,
    /// 부분 체결
    PartTraded,
    /// 전량 체결
    AllTraded,
    /// 취소됨
    Cancelled,
    /// 거부됨
    Rejected,
}

impl Status {
    /// 주문이 최종 상태인지 확인합니다.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            Status::AllTraded | Status::Cancelled | Status::Rejected
        )
    }

    /// 주문이 여전히 활성 상태인지 확인합니다.
    pub fn is_active(&self) -> bool {
        !self.is_final()
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Status::Submitting => "SUBMITTING",
            Status::NotTraded => "NOTTRADED",
            Status::PartTraded => "PARTTRADED",
            Status::AllTraded => "ALLTRADED",
            Status::Cancelled => "CANCELLED",
            Status::Rejected => "REJECTED",
        };
        write!(f, "{}", label)
    }
}

/// 새 주문 생성을 위한 주문 요청.
///
/// 금 현물 거래는 지정가만 지원하므로 가격은 항상 필요합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// 상품 코드 (예: "AU9999")
    pub symbol: String,
    /// 거래소
    pub exchange: Exchange,
    /// 주문 방향
    pub direction: Direction,
    /// 개평 구분
    pub offset: Offset,
    /// 지정가
    pub price: Price,
    /// 주문 수량 (벤더에는 정수로 전달)
    pub volume: Quantity,
    /// 호스트 측 참조 문자열
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl OrderRequest {
    /// 새 주문 요청을 생성합니다.
    pub fn new(
        symbol: impl Into<String>,
        direction: Direction,
        offset: Offset,
        price: Price,
        volume: Quantity,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            exchange: Exchange::Sge,
            direction,
            offset,
            price,
            volume,
            reference: None,
        }
    }

    /// 신규 매수 주문을 생성합니다.
    pub fn open_long(symbol: impl Into<String>, price: Price, volume: Quantity) -> Self {
        Self::new(symbol, Direction::Long, Offset::Open, price, volume)
    }

    /// 신규 매도 주문을 생성합니다.
    pub fn open_short(symbol: impl Into<String>, price: Price, volume: Quantity) -> Self {
        Self::new(symbol, Direction::Short, Offset::Open, price, volume)
    }

    /// 참조 문자열을 설정합니다.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// 요청으로부터 제출 중 상태의 주문을 생성합니다.
    pub fn create_order(&self, order_id: impl Into<String>, gateway_name: impl Into<String>) -> Order {
        Order {
            gateway_name: gateway_name.into(),
            order_id: order_id.into(),
            symbol: self.symbol.clone(),
            exchange: self.exchange,
            direction: self.direction,
            offset: self.offset,
            price: self.price,
            volume: self.volume,
            traded: Decimal::ZERO,
            status: Status::Submitting,
            datetime: Utc::now(),
            reference: self.reference.clone(),
        }
    }
}

/// 주문 취소 요청.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRequest {
    /// 로컬 주문 ID
    pub order_id: String,
    /// 상품 코드
    pub symbol: String,
    /// 거래소
    pub exchange: Exchange,
}

impl CancelRequest {
    /// 새 취소 요청을 생성합니다.
    pub fn new(order_id: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            symbol: symbol.into(),
            exchange: Exchange::Sge,
        }
    }
}

/// 게이트웨이가 호스트 플랫폼으로 내보내는 주문 엔티티.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// 게이트웨이 이름
    pub gateway_name: String,
    /// 로컬 주문 ID (`{front}_{session}_{ref}`)
    pub order_id: String,
    /// 상품 코드
    pub symbol: String,
    /// 거래소
    pub exchange: Exchange,
    /// 주문 방향
    pub direction: Direction,
    /// 개평 구분
    pub offset: Offset,
    /// 지정가
    pub price: Price,
    /// 주문 수량
    pub volume: Quantity,
    /// 체결 수량
    pub traded: Quantity,
    /// 현재 상태
    pub status: Status,
    /// 주문 시각
    pub datetime: DateTime<Utc>,
    /// 호스트 측 참조 문자열
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Order {
    /// 남은 미체결 수량을 반환합니다.
    pub fn remaining(&self) -> Quantity {
        self.volume - self.traded
    }

    /// 주문이 활성 상태인지 확인합니다.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// 이 주문의 취소 요청을 생성합니다.
    pub fn create_cancel_request(&self) -> CancelRequest {
        CancelRequest {
            order_id: self.order_id.clone(),
            symbol: self.symbol.clone(),
            exchange: self.exchange,
        }
    }
}
