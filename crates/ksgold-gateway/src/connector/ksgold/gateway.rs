//! KSGOLD 게이트웨이.
//!
//! 시세/거래 세션과 조회 순환 스케줄러를 묶어 호스트 플랫폼에 하나의 게이트웨이로 노출합니다.
//! 벤더 스레드는 `on_md_callback` / `on_td_callback`으로 원시 콜백을 전달합니다.

use ksgold_core::{
    default_setting_template, CancelRequest, Exchange, GatewaySettings, OrderRequest,
    SubscribeRequest,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::info;

use super::api::{QuoteApi, TraderApi};
use super::market_data::MdSession;
use super::session::{Credentials, SessionStatus};
use super::spi::{MdCallback, RawCallback, TdCallback};
use super::trading::TdSession;
use crate::context::GatewayContext;
use crate::event::GatewayEvent;
use crate::poller::{QueryKind, QueryPoller};
use crate::traits::TradingGateway;
use crate::KsgoldResult;

/// 지원 거래소.
const EXCHANGES: [Exchange; 1] = [Exchange::Sge];

/// KSGOLD 게이트웨이.
pub struct KsgoldGateway<T, Q> {
    context: Arc<GatewayContext>,
    td: Arc<TdSession<T>>,
    md: MdSession<Q>,
    poller: Mutex<QueryPoller>,
}

impl<T, Q> KsgoldGateway<T, Q>
where
    T: TraderApi + 'static,
    Q: QuoteApi,
{
    /// 새 게이트웨이를 생성합니다. 이벤트는 `sender`로 발행됩니다.
    pub fn new(
        gateway_name: impl Into<String>,
        trader_api: T,
        quote_api: Q,
        sender: mpsc::UnboundedSender<GatewayEvent>,
    ) -> Self {
        let context = Arc::new(GatewayContext::new(gateway_name, sender));
        Self {
            td: TdSession::new(trader_api, Arc::clone(&context)),
            md: MdSession::new(quote_api, Arc::clone(&context)),
            context,
            poller: Mutex::new(QueryPoller::default()),
        }
    }

    /// 거래 API.
    pub fn trader_api(&self) -> &T {
        self.td.api()
    }

    /// 시세 API.
    pub fn quote_api(&self) -> &Q {
        self.md.api()
    }

    pub fn td_status(&self) -> SessionStatus {
        self.td.status()
    }

    pub fn md_status(&self) -> SessionStatus {
        self.md.status()
    }

    /// 상품 목록 로드 완료 여부.
    pub fn is_catalog_loaded(&self) -> bool {
        self.td.is_catalog_loaded()
    }

    /// 로드 전 보관 중인 주문/체결 보고 수.
    pub fn pending_reports(&self) -> usize {
        self.td.pending_reports()
    }

    /// 호스트 접속 화면용 기본 설정.
    pub fn default_setting() -> Vec<(&'static str, String)> {
        default_setting_template()
    }

    fn poller(&self) -> MutexGuard<'_, QueryPoller> {
        self.poller.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 시세 API 콜백 진입점.
    pub fn on_md_callback(&self, raw: RawCallback) {
        match MdCallback::try_from(&raw) {
            Ok(callback) => self.md.handle(callback),
            Err(e) => self
                .context
                .events()
                .write_log(format!("시세 콜백 디코딩 실패: {}", e)),
        }
    }

    /// 거래 API 콜백 진입점.
    pub fn on_td_callback(&self, raw: RawCallback) {
        match TdCallback::try_from(&raw) {
            Ok(callback) => self.td.handle(callback),
            Err(e) => self
                .context
                .events()
                .write_log(format!("거래 콜백 디코딩 실패: {}", e)),
        }
    }
}

impl<T, Q> TradingGateway for KsgoldGateway<T, Q>
where
    T: TraderApi + 'static,
    Q: QuoteApi,
{
    fn gateway_name(&self) -> &str {
        self.context.gateway_name()
    }

    fn exchanges(&self) -> &'static [Exchange] {
        &EXCHANGES
    }

    fn connect(&self, settings: &GatewaySettings) {
        info!(
            gateway = %self.context.gateway_name(),
            userid = %settings.userid,
            account_type = %settings.account_type,
            "connecting"
        );

        self.td.connect(
            &settings.td_endpoint(),
            &settings.flow_path("Td"),
            Credentials::from_settings(settings),
            settings.instrument_retry_interval(),
        );
        self.md.connect(
            &settings.md_endpoint(),
            &settings.flow_path("Md"),
            Credentials::from_settings(settings),
        );

        self.poller().set_threshold(settings.poll_threshold);
    }

    fn subscribe(&self, req: &SubscribeRequest) {
        self.md.subscribe(req);
    }

    fn send_order(&self, req: &OrderRequest) -> KsgoldResult<String> {
        self.td.send_order(req)
    }

    fn cancel_order(&self, req: &CancelRequest) -> KsgoldResult<()> {
        self.td.cancel_order(req)
    }

    fn query_account(&self) {
        self.td.query_account();
    }

    fn query_position(&self) {
        self.td.query_position();
    }

    fn close(&self) {
        self.td.close();
        self.md.close();
    }

    fn on_timer(&self) {
        self.td.on_timer();

        let query = self.poller().tick();
        match query {
            Some(QueryKind::Account) => self.query_account(),
            Some(QueryKind::Position) => self.query_position(),
            None => {}
        }
    }
}
