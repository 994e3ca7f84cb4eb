//! KSGOLD 금 현물 게이트웨이 어댑터.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - TradingGateway trait: 호스트 플랫폼용 게이트웨이 인터페이스
//! - KSGOLD 커넥터: 벤더 콜백 디코딩과 요청 페이로드 생성
//! - 식별자 레지스트리: 로컬/벤더/시스템 주문 번호 대응
//! - 참조 데이터 리졸버: 상품 목록 로드 전 보고의 버퍼링과 재처리
//! - 조회 순환 스케줄러: 계좌/포지션 주기 조회

pub mod connector;
pub mod context;
pub mod error;
pub mod event;
pub mod poller;
pub mod registry;
pub mod resolver;
pub mod traits;

pub use connector::ksgold::{QuoteApi, RawCallback, TraderApi};
pub use connector::KsgoldGateway;
pub use context::GatewayContext;
pub use error::*;
pub use event::{EventEmitter, GatewayEvent, LogRecord};
pub use poller::{spawn_query_timer, QueryKind, QueryPoller};
pub use registry::{IdentifierRegistry, LocalOrderId, SymbolReference};
pub use resolver::{ReferenceResolver, ResolverPhase};
pub use traits::*;
