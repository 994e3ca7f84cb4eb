//! 게이트웨이 인스턴스별 공유 컨텍스트.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::mpsc;

use crate::event::{EventEmitter, GatewayEvent};
use crate::registry::IdentifierRegistry;

/// 시세/거래 세션이 함께 쓰는 상태.
///
/// 레지스트리 변경은 이 `RwLock` 하나를 통해서만 이뤄집니다.
/// 거래 세션 상태 뮤텍스와 함께 잡을 때는 항상 세션 상태를 먼저 잡습니다.
#[derive(Debug)]
pub struct GatewayContext {
    registry: RwLock<IdentifierRegistry>,
    events: EventEmitter,
}

impl GatewayContext {
    pub fn new(gateway_name: impl Into<String>, sender: mpsc::UnboundedSender<GatewayEvent>) -> Self {
        Self {
            registry: RwLock::new(IdentifierRegistry::new()),
            events: EventEmitter::new(gateway_name, sender),
        }
    }

    pub fn gateway_name(&self) -> &str {
        self.events.gateway_name()
    }

    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    /// 레지스트리 읽기 잠금. 다른 스레드의 패닉으로 오염되어도 계속 사용합니다.
    pub fn registry(&self) -> RwLockReadGuard<'_, IdentifierRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// 레지스트리 쓰기 잠금.
    pub fn registry_mut(&self) -> RwLockWriteGuard<'_, IdentifierRegistry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }
}
