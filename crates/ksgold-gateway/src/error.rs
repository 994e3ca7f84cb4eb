//! 게이트웨이 에러 타입.

use ksgold_core::GatewayError;
use thiserror::Error;

/// KSGOLD 어댑터 에러.
///
/// 어느 것도 게이트웨이를 중단시키지 않습니다. 콜백 경로에서는 로그로 남기고
/// 버리거나 보류하며, 호스트 요청 경로에서는 호출자에게 반환됩니다.
#[derive(Debug, Error)]
pub enum KsgoldError {
    /// 벤더 API 에러 코드
    #[error("API error {code}: {message}")]
    ApiError { code: i32, message: String },

    /// 요청이 벤더 큐에서 거부됨 (0이 아닌 반환 코드)
    #[error("Request throttled: return code {0}")]
    Throttled(i32),

    /// 매핑되지 않은 벤더 코드
    #[error("Unmapped {kind} code: {code}")]
    UnmappedCode { kind: &'static str, code: String },

    /// 주문을 찾을 수 없음
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// 심볼을 찾을 수 없음
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// 벤더 코드로 변환할 수 없는 개평 구분
    #[error("Invalid offset: {0}")]
    InvalidOffset(String),

    /// 콜백 페이로드 디코딩 에러
    #[error("Decode error: {0}")]
    Decode(String),

    /// 타임스탬프 파싱 에러
    #[error("Timestamp error: {0}")]
    TimestampError(String),

    /// 핵심 크레이트 에러
    #[error(transparent)]
    Core(#[from] GatewayError),
}

/// 어댑터 작업을 위한 Result 타입.
pub type KsgoldResult<T> = Result<T, KsgoldError>;

impl KsgoldError {
    /// 나중에 다시 시도하면 성공할 수 있는 에러인지 확인.
    pub fn is_retryable(&self) -> bool {
        matches!(self, KsgoldError::Throttled(_))
    }

    /// 식별자/참조 조회 실패인지 확인.
    pub fn is_resolution_error(&self) -> bool {
        match self {
            KsgoldError::OrderNotFound(_) | KsgoldError::SymbolNotFound(_) => true,
            KsgoldError::Core(err) => err.is_not_found(),
            _ => false,
        }
    }

    /// 매핑되지 않은 코드 에러를 생성합니다.
    pub(crate) fn unmapped(kind: &'static str, code: impl ToString) -> Self {
        KsgoldError::UnmappedCode {
            kind,
            code: code.to_string(),
        }
    }
}

impl From<serde_json::Error> for KsgoldError {
    fn from(err: serde_json::Error) -> Self {
        KsgoldError::Decode(err.to_string())
    }
}
