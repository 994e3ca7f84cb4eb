//! 금사다(KSGOLD) 금 현물 거래 API 연동 모듈.
//!
//! 상하이 금 거래소(SGE) 현물/T+D 거래를 위한 벤더 바이너리 API를 감쌉니다.
//! 전송, 세션 핸드셰이크, 바이너리 직렬화는 벤더 라이브러리가 담당하며,
//! 이 모듈은 번역과 상태 조정만 수행합니다.
//!
//! # 구성
//!
//! - [`api`]: 벤더 요청 함수 (`TraderApi`, `QuoteApi`)
//! - [`spi`]: 벤더 콜백 디코딩
//! - [`payload`]: 벤더 필드 이름을 보존하는 페이로드 구조체
//! - [`translate`]: 상태/방향/개평 코드 변환
//! - [`market_data`], [`trading`]: 시세/거래 세션
//! - [`gateway`]: 호스트 플랫폼용 게이트웨이
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use ksgold_core::{GatewaySettings, OrderRequest};
//! use ksgold_gateway::connector::ksgold::KsgoldGateway;
//! use tokio::sync::mpsc;
//!
//! let (tx, mut rx) = mpsc::unbounded_channel();
//! let gateway = KsgoldGateway::new("KSGOLD", trader_api, quote_api, tx);
//! gateway.connect(&GatewaySettings::new("1001", "pw", "10.0.0.1:9001", "10.0.0.1:9002"));
//!
//! // 벤더 스레드에서
//! gateway.on_td_callback(RawCallback::new("onRtnOrder", data));
//! ```

pub mod api;
pub mod gateway;
pub mod market_data;
pub mod payload;
pub mod session;
pub mod spi;
pub mod trading;
pub mod translate;

pub use api::{QuoteApi, TraderApi};
pub use gateway::KsgoldGateway;
pub use payload::*;
pub use session::{Credentials, SessionStatus};
pub use spi::{MdCallback, RawCallback, TdCallback};

/// KSGOLD 벤더 코드 상수 모음.
pub mod codes {
    // ========================================
    // 주문 상태 (Entrust status)
    // ========================================

    /// 전송 중
    pub const ENTRUST_SENDING: char = '1';
    /// 대기
    pub const ENTRUST_WAITING: char = '2';
    /// 오류
    pub const ENTRUST_ERROR: char = '3';
    /// 접수됨
    pub const ENTRUST_IN: char = '4';
    /// 부분 체결
    pub const ENTRUST_PART_DONE: char = '5';
    /// 전량 체결
    pub const ENTRUST_ALL_DONE: char = '6';
    /// 전량 취소
    pub const ENTRUST_ALL_CANCEL: char = '7';
    /// 부분 체결 후 취소
    pub const ENTRUST_PART_DONE_CANCEL: char = '8';
    /// 취소 대기
    pub const ENTRUST_WAIT_CANCEL: char = '9';

    // ========================================
    // 매매 방향
    // ========================================

    /// 매수
    pub const BUY: char = 'b';
    /// 매도
    pub const SELL: char = 's';

    // ========================================
    // 개평 구분
    // ========================================

    /// 신규
    pub const OFFSET_OPEN: i32 = 0;
    /// 청산
    pub const OFFSET_CLOSE: i32 = 1;
    /// 신규 (일부 보고에서 문자 '0'의 코드값으로 도착)
    pub const OFFSET_OPEN_LEGACY: i32 = 48;

    // ========================================
    // 기타
    // ========================================

    /// 포지션 조회 결과 없음
    pub const ERROR_NO_POSITION: i32 = 10001;
    /// 토픽 구독 재전송 모드 (처음부터)
    pub const RESUME_RESTART: i32 = 0;
}
