//! 게이트웨이 핵심 에러 타입.
//!
//! 이 모듈은 설정 로드와 식별자 조회/파싱에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 게이트웨이 에러.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    /// 식별자/참조 조회 실패인지 확인합니다.
    ///
    /// 조회 실패는 호출 측에서 "보류 후 재처리"로 다뤄야 합니다.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound(_))
    }
}

impl From<config::ConfigError> for GatewayError {
    fn from(err: config::ConfigError) -> Self {
        GatewayError::Config(err.to_string())
    }
}
