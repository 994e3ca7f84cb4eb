//! 시세 세션.
//!
//! 벤더 심층 시세를 정규화된 `Tick`으로 변환합니다.
//! 틱은 버퍼링하지 않습니다. 참조 정보가 없는 심볼의 틱은 조용히 버립니다.

use ksgold_core::{decimal_from_f64, DepthLevel, SubscribeRequest, Tick};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use super::api::QuoteApi;
use super::payload::DepthMarketData;
use super::session::{Credentials, SessionState, SessionStatus};
use super::spi::MdCallback;
use super::translate::{quote_timestamp, sanitized};
use crate::context::GatewayContext;
use crate::registry::SymbolReference;
use crate::KsgoldResult;

#[derive(Debug, Default)]
struct MdState {
    session: SessionState,
    subscribed: BTreeSet<String>,
}

/// 시세 세션.
pub struct MdSession<Q> {
    api: Q,
    context: Arc<GatewayContext>,
    state: Mutex<MdState>,
}

impl<Q: QuoteApi> MdSession<Q> {
    pub fn new(api: Q, context: Arc<GatewayContext>) -> Self {
        Self {
            api,
            context,
            state: Mutex::new(MdState::default()),
        }
    }

    pub fn api(&self) -> &Q {
        &self.api
    }

    pub fn status(&self) -> SessionStatus {
        self.state().session.status
    }

    fn state(&self) -> MutexGuard<'_, MdState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 시세 서버에 연결합니다.
    ///
    /// API는 한 번만 생성합니다. 이미 연결됐지만 로그인 전이면 로그인만 다시 요청합니다.
    pub fn connect(&self, address: &str, flow_path: &str, credentials: Credentials) {
        let mut state = self.state();
        state.session.credentials = Some(credentials);

        if !state.session.api_created {
            self.api.create_api(flow_path);
            self.api.register_front(address);
            self.api.init();
            state.session.mark_connecting();
            debug!(address, "md api initialized");
        } else if !state.session.is_logged_in() {
            self.login(&mut state);
        }
    }

    /// 로그인 요청. 로그인에 한 번 실패하면 더 이상 시도하지 않습니다.
    fn login(&self, state: &mut MdState) {
        if state.session.status == SessionStatus::LoginFailed {
            debug!("md login skipped after failure");
            return;
        }
        if let Some((req, request_id)) = state.session.prepare_login() {
            let rc = self.api.req_user_login(&req, request_id);
            if rc != 0 {
                warn!(rc, "md login request not accepted");
            }
        }
    }

    /// 시세를 구독합니다.
    ///
    /// 로그인 전이면 기록만 해 두고 로그인 성공 시 한 번 요청합니다.
    pub fn subscribe(&self, req: &SubscribeRequest) {
        let mut state = self.state();
        if state.session.is_logged_in() {
            let request_id = state.session.next_request_id();
            let rc = self.api.subscribe_market_data(&req.symbol, request_id);
            if rc != 0 {
                warn!(symbol = %req.symbol, rc, "subscribe request not accepted");
            }
        }
        state.subscribed.insert(req.symbol.clone());
    }

    /// 구독 중인 심볼 목록.
    pub fn subscribed(&self) -> Vec<String> {
        self.state().subscribed.iter().cloned().collect()
    }

    pub fn close(&self) {
        let mut state = self.state();
        if state.session.api_created {
            self.api.exit();
            state.session.api_created = false;
            state.session.status = SessionStatus::Disconnected;
        }
    }

    /// 디코딩된 콜백을 처리합니다.
    pub fn handle(&self, callback: MdCallback) {
        let events = self.context.events();
        match callback {
            MdCallback::FrontConnected => {
                events.write_log("시세 서버 연결 성공");
                let mut state = self.state();
                state.session.mark_front_connected();
                self.login(&mut state);
            }
            MdCallback::FrontDisconnected { reason } => {
                self.state().session.mark_disconnected();
                events.write_log(format!("시세 서버 연결 끊김, 원인 {}", reason));
            }
            MdCallback::RspUserLogin { error } => {
                if let Err(e) = error.check() {
                    debug!(error = %e, "md login rejected");
                    self.state().session.mark_login(false);
                    events.write_error("시세 서버 로그인 실패", &error);
                    return;
                }

                events.write_log("시세 서버 로그인 성공");
                let mut state = self.state();
                state.session.mark_login(true);

                let symbols: Vec<String> = state.subscribed.iter().cloned().collect();
                for symbol in symbols {
                    let request_id = state.session.next_request_id();
                    let rc = self.api.subscribe_market_data(&symbol, request_id);
                    if rc != 0 {
                        warn!(symbol = %symbol, rc, "subscribe request not accepted");
                    }
                }
            }
            MdCallback::RspError { error } => {
                events.write_error("시세 API 오류", &error);
            }
            MdCallback::RspSubMarketData { error } => {
                if error.is_error() {
                    events.write_error("시세 구독 실패", &error);
                }
            }
            MdCallback::DepthMarketData(data) => self.on_depth_market_data(&data),
            MdCallback::Unhandled(name) => debug!(callback = %name, "unhandled md callback"),
        }
    }

    fn on_depth_market_data(&self, data: &DepthMarketData) {
        let reference = match self.context.registry().symbol(&data.inst_id) {
            Some(reference) => reference.clone(),
            None => return,
        };

        match build_tick(data, &reference, self.context.gateway_name()) {
            Ok(tick) => self.context.events().on_tick(tick),
            Err(e) => {
                self.context
                    .events()
                    .write_log(format!("시세 데이터 변환 실패 {}: {}", data.inst_id, e));
            }
        }
    }
}

/// 벤더 시세를 정규화된 틱으로 변환합니다.
///
/// 2단계 매수/매도 잔량이 모두 0이면 1단계만 채웁니다.
pub fn build_tick(
    data: &DepthMarketData,
    reference: &SymbolReference,
    gateway_name: &str,
) -> KsgoldResult<Tick> {
    let datetime = quote_timestamp(&data.quote_date, &data.quote_time, data.update_millisec)?;

    let depth = if data.bid_lot2 != 0.0 || data.ask_lot2 != 0.0 {
        5
    } else {
        1
    };
    let levels = |raw: [(f64, f64); 5]| -> Vec<DepthLevel> {
        raw.iter()
            .take(depth)
            .map(|(price, volume)| DepthLevel::new(sanitized(*price), sanitized(*volume)))
            .collect()
    };

    Ok(Tick {
        gateway_name: gateway_name.to_string(),
        symbol: data.inst_id.clone(),
        exchange: reference.exchange,
        name: reference.name.clone(),
        datetime,
        volume: decimal_from_f64(data.volume),
        open_interest: decimal_from_f64(data.open_int),
        last_price: decimal_from_f64(data.last),
        limit_up: decimal_from_f64(data.high_limit),
        limit_down: decimal_from_f64(data.low_limit),
        open_price: sanitized(data.open),
        high_price: sanitized(data.highest),
        low_price: sanitized(data.low),
        pre_close: sanitized(data.pre_close),
        bids: levels(data.bid_levels()),
        asks: levels(data.ask_levels()),
    })
}
