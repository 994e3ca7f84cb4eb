//! # KSGOLD Core
//!
//! 금 현물(SGE) 게이트웨이의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 게이트웨이 전반에서 사용되는 기본 타입을 제공합니다:
//! - 주문/취소/구독 요청 및 주문 엔티티
//! - 체결, 포지션, 계좌 기록
//! - 시세(틱) 및 호가 구조체
//! - 상품(계약) 참조 정보
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
