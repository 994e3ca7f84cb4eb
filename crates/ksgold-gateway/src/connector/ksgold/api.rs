//! 벤더 API 요청 인터페이스.
//!
//! 벤더 바이너리 라이브러리는 불투명한 협력자로 다룹니다. 요청 함수는 동기적으로
//! 큐에 넣기만 하고 결과는 나중에 콜백(`spi`)으로 도착합니다.
//! 반환 코드가 0이 아니면 요청이 받아들여지지 않은 것입니다 (흐름 제어 등).

use super::payload::{ReqOrderAction, ReqOrderInsert, ReqUserLogin};

/// 거래 API.
pub trait TraderApi: Send + Sync {
    /// 흐름 파일 경로를 지정해 API 인스턴스를 생성합니다.
    fn create_api(&self, flow_path: &str);

    /// 사설 토픽 구독 (재전송 모드).
    fn subscribe_private_topic(&self, resume_type: i32);

    /// 공용 토픽 구독 (재전송 모드).
    fn subscribe_public_topic(&self, resume_type: i32);

    /// 프론트 주소 등록.
    fn register_front(&self, address: &str);

    /// 연결 시작.
    fn init(&self);

    fn req_user_login(&self, req: &ReqUserLogin, request_id: i32) -> i32;

    fn req_qry_instrument(&self, request_id: i32) -> i32;

    fn req_order_insert(&self, req: &ReqOrderInsert, request_id: i32) -> i32;

    fn req_order_action(&self, req: &ReqOrderAction, request_id: i32) -> i32;

    fn req_qry_trading_account(&self, request_id: i32) -> i32;

    fn req_qry_investor_position(&self, request_id: i32) -> i32;

    /// API 종료.
    fn exit(&self);
}

/// 시세 API.
pub trait QuoteApi: Send + Sync {
    /// 흐름 파일 경로를 지정해 API 인스턴스를 생성합니다.
    fn create_api(&self, flow_path: &str);

    /// 프론트 주소 등록.
    fn register_front(&self, address: &str);

    /// 연결 시작.
    fn init(&self);

    fn req_user_login(&self, req: &ReqUserLogin, request_id: i32) -> i32;

    fn subscribe_market_data(&self, symbol: &str, request_id: i32) -> i32;

    /// API 종료.
    fn exit(&self);
}
