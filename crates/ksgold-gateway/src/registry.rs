//! 식별자 레지스트리.
//!
//! 비동기로 순서 없이 도착하는 콜백 사이에서 식별자 대응을 유지합니다:
//! - 로컬 주문 ID → 벤더 로컬 주문 번호 (취소 요청에 필요)
//! - 시스템 주문 번호 → 로컬 주문 ID (체결을 주문에 연결)
//! - 심볼 → 참조 정보 (이름, 계약 단위, 시장 ID)
//!
//! 게이트웨이 인스턴스마다 하나씩 소유하며 전역 상태는 없습니다.

use ksgold_core::{Exchange, GatewayError, GatewayResult, Price, Quantity};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// 로컬 주문 ID: `{front}_{session}_{order_ref}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalOrderId {
    /// 프론트 연결 ID
    pub front_id: i32,
    /// 세션 ID
    pub session_id: i32,
    /// 주문 참조 번호
    pub order_ref: String,
}

impl LocalOrderId {
    pub fn new(front_id: i32, session_id: i32, order_ref: impl Into<String>) -> Self {
        Self {
            front_id,
            session_id,
            order_ref: order_ref.into(),
        }
    }
}

impl fmt::Display for LocalOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.front_id, self.session_id, self.order_ref)
    }
}

impl FromStr for LocalOrderId {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GatewayError::InvalidInput(format!("로컬 주문 ID 형식 오류: {}", s));

        let mut parts = s.splitn(3, '_');
        let front_id = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let session_id = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let order_ref = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;

        Ok(Self::new(front_id, session_id, order_ref))
    }
}

/// 심볼 참조 정보.
///
/// 상품 조회 응답을 받을 때 한 번 생성되며 이후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolReference {
    /// 상품 코드
    pub symbol: String,
    /// 거래소
    pub exchange: Exchange,
    /// 표시 이름
    pub name: String,
    /// 계약 단위
    pub size: Quantity,
    /// 최소 호가 단위
    pub pricetick: Price,
    /// 벤더 시장 ID (주문 요청에 필요)
    pub market_id: String,
}

/// 식별자 및 심볼 참조 캐시.
#[derive(Debug, Default)]
pub struct IdentifierRegistry {
    symbols: HashMap<String, SymbolReference>,
    local_numbers: HashMap<String, String>,
    local_ids: HashMap<String, String>,
}

impl IdentifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 로컬 주문 ID와 벤더 로컬 주문 번호를 연결합니다.
    pub fn register_order(&mut self, local_id: impl Into<String>, vendor_local_number: impl Into<String>) {
        self.local_numbers
            .insert(local_id.into(), vendor_local_number.into());
    }

    /// 로컬 주문 ID의 벤더 로컬 주문 번호를 조회합니다.
    pub fn resolve_vendor_local_number(&self, local_id: &str) -> GatewayResult<&str> {
        self.local_numbers
            .get(local_id)
            .map(String::as_str)
            .ok_or_else(|| GatewayError::NotFound(format!("벤더 로컬 주문 번호: {}", local_id)))
    }

    /// 시스템 주문 번호와 로컬 주문 ID를 연결합니다.
    pub fn register_system_number(&mut self, system_number: impl Into<String>, local_id: impl Into<String>) {
        self.local_ids.insert(system_number.into(), local_id.into());
    }

    /// 시스템 주문 번호로 로컬 주문 ID를 조회합니다.
    pub fn resolve_local_id(&self, system_number: &str) -> GatewayResult<&str> {
        self.local_ids
            .get(system_number)
            .map(String::as_str)
            .ok_or_else(|| GatewayError::NotFound(format!("시스템 주문 번호: {}", system_number)))
    }

    /// 심볼 참조를 추가합니다.
    ///
    /// 이미 있는 심볼이면 무시하고 `false`를 반환합니다.
    pub fn insert_symbol(&mut self, entry: SymbolReference) -> bool {
        if self.symbols.contains_key(&entry.symbol) {
            return false;
        }
        self.symbols.insert(entry.symbol.clone(), entry);
        true
    }

    pub fn symbol(&self, symbol: &str) -> Option<&SymbolReference> {
        self.symbols.get(symbol)
    }

    /// 심볼의 벤더 시장 ID.
    pub fn market_id(&self, symbol: &str) -> Option<&str> {
        self.symbols.get(symbol).map(|s| s.market_id.as_str())
    }

    pub fn has_symbols(&self) -> bool {
        !self.symbols.is_empty()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn reference(symbol: &str, name: &str) -> SymbolReference {
        SymbolReference {
            symbol: symbol.to_string(),
            exchange: Exchange::Sge,
            name: name.to_string(),
            size: dec!(1000),
            pricetick: dec!(0.01),
            market_id: "00".to_string(),
        }
    }

    #[test]
    fn test_local_order_id_format() {
        let id = LocalOrderId::new(1, 42, "7");
        assert_eq!(id.to_string(), "1_42_7");
        assert_eq!("1_42_7".parse::<LocalOrderId>().unwrap(), id);

        assert!("1_42".parse::<LocalOrderId>().is_err());
        assert!("x_42_7".parse::<LocalOrderId>().is_err());
        assert!("1_42_".parse::<LocalOrderId>().is_err());
    }

    #[test]
    fn test_order_mappings() {
        let mut registry = IdentifierRegistry::new();

        assert!(registry.resolve_vendor_local_number("1_2_3").unwrap_err().is_not_found());
        assert!(registry.resolve_local_id("SYS001").unwrap_err().is_not_found());

        registry.register_order("1_2_3", "880001");
        registry.register_system_number("SYS001", "1_2_3");

        assert_eq!(registry.resolve_vendor_local_number("1_2_3").unwrap(), "880001");
        assert_eq!(registry.resolve_local_id("SYS001").unwrap(), "1_2_3");
    }

    #[test]
    fn test_symbol_insert_is_immutable() {
        let mut registry = IdentifierRegistry::new();
        assert!(!registry.has_symbols());

        assert!(registry.insert_symbol(reference("AU9999", "黄金9999")));
        assert!(!registry.insert_symbol(reference("AU9999", "changed")));

        assert_eq!(registry.symbol_count(), 1);
        assert_eq!(registry.symbol("AU9999").unwrap().name, "黄金9999");
        assert_eq!(registry.market_id("AU9999"), Some("00"));
        assert_eq!(registry.market_id("AG(T+D)"), None);
        assert!(registry.symbol("AG(T+D)").is_none());
    }
}
