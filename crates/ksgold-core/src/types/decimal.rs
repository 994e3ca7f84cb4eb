//! 정밀한 금융 계산을 위한 Decimal 유틸리티.
//!
//! 벤더 API는 가격과 수량을 `f64`로 전달하지만, 정규화된 모델은
//! `Decimal`을 사용합니다. 이 모듈은 두 표현 사이의 변환을 담당합니다.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// 금융 정밀도를 위한 가격 타입.
pub type Price = Decimal;

/// 주문/포지션 수량을 위한 타입.
pub type Quantity = Decimal;

/// 부동소수점 값을 Decimal로 변환합니다.
///
/// NaN, 무한대 등 표현할 수 없는 값은 0이 됩니다.
pub fn decimal_from_f64(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimal_from_f64() {
        assert_eq!(decimal_from_f64(395.5), dec!(395.5));
        assert_eq!(decimal_from_f64(0.0), Decimal::ZERO);
        assert_eq!(decimal_from_f64(f64::NAN), Decimal::ZERO);
        assert_eq!(decimal_from_f64(f64::INFINITY), Decimal::ZERO);
    }
}
