//! 호스트 플랫폼이 사용하는 게이트웨이 trait.

use ksgold_core::{CancelRequest, Exchange, GatewaySettings, OrderRequest, SubscribeRequest};

use crate::KsgoldResult;

/// 호스트 플랫폼용 통합 게이트웨이 인터페이스.
///
/// 모든 요청은 벤더 큐에 넣기만 하고 즉시 반환합니다.
/// 결과는 `GatewayEvent`로 비동기 발행됩니다.
pub trait TradingGateway: Send + Sync {
    /// 게이트웨이 이름 반환.
    fn gateway_name(&self) -> &str;

    /// 지원 거래소 목록.
    fn exchanges(&self) -> &'static [Exchange];

    /// 시세/거래 서버에 연결.
    fn connect(&self, settings: &GatewaySettings);

    // === 시장 데이터 ===

    /// 시세 구독. 로그인 전이면 로그인 후 요청됩니다.
    fn subscribe(&self, req: &SubscribeRequest);

    // === 주문 작업 ===

    /// 주문 제출. 로컬 주문 ID를 반환합니다.
    fn send_order(&self, req: &OrderRequest) -> KsgoldResult<String>;

    /// 주문 취소.
    fn cancel_order(&self, req: &CancelRequest) -> KsgoldResult<()>;

    // === 조회 ===

    /// 자금 조회.
    fn query_account(&self);

    /// 포지션 조회.
    fn query_position(&self);

    /// 연결 종료.
    fn close(&self);

    /// 주기 타이머 틱 (조회 순환).
    fn on_timer(&self);
}
