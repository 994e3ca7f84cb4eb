//! 거래 체결 기록.

use crate::domain::{Direction, Exchange, Offset};
use crate::types::{Price, Quantity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 주문 체결을 나타내는 거래 기록.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// 게이트웨이 이름
    pub gateway_name: String,
    /// 상품 코드
    pub symbol: String,
    /// 거래소
    pub exchange: Exchange,
    /// 관련 로컬 주문 ID
    pub order_id: String,
    /// 거래소 체결 번호
    pub trade_id: String,
    /// 체결 방향
    pub direction: Direction,
    /// 개평 구분
    pub offset: Offset,
    /// 체결 가격
    pub price: Price,
    /// 체결 수량
    pub volume: Quantity,
    /// 체결 시각
    pub datetime: DateTime<Utc>,
}

impl Trade {
    /// 체결 금액(가격 × 수량)을 반환합니다.
    ///
    /// 계약 단위(size)는 반영하지 않습니다.
    pub fn notional(&self) -> Price {
        self.price * self.volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trade_notional() {
        let trade = Trade {
            gateway_name: "KSGOLD".to_string(),
            symbol: "AU9999".to_string(),
            exchange: Exchange::Sge,
            order_id: "1_2_3".to_string(),
            trade_id: "M0001".to_string(),
            direction: Direction::Long,
            offset: Offset::Open,
            price: dec!(395.5),
            volume: dec!(2),
            datetime: Utc::now(),
        };

        assert_eq!(trade.notional(), dec!(791.0));
    }
}
