//! 거래 세션.
//!
//! 주문/취소 요청을 벤더 페이로드로 변환하고, 주문/체결/포지션/계좌/상품 콜백을
//! 정규화된 이벤트로 변환합니다.
//!
//! 세션 상태(리졸버 버퍼, 카운터, 세션 식별자)는 하나의 뮤텍스 뒤에 있으며,
//! 레지스트리 잠금은 항상 이 뮤텍스를 잡은 뒤에 잡습니다.

use chrono::Utc;
use ksgold_core::{
    decimal_from_f64, Account, CancelRequest, Contract, Direction, Exchange, Order, OrderRequest,
    Position, Product, Status, Trade,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use super::api::TraderApi;
use super::codes;
use super::payload::{
    InputOrder, Instrument, InvestorPosition, ReqOrderAction, ReqOrderInsert, RspInfo, RtnOrder,
    RtnTrade, TradingAccount,
};
use super::session::{Credentials, SessionState, SessionStatus};
use super::spi::TdCallback;
use super::translate::{
    direction_from_vendor, direction_to_vendor, exchange_today, offset_from_vendor,
    offset_from_vendor_lenient, offset_to_vendor, report_timestamp, status_from_vendor,
};
use crate::context::GatewayContext;
use crate::registry::{LocalOrderId, SymbolReference};
use crate::resolver::ReferenceResolver;
use crate::{KsgoldError, KsgoldResult};

/// 상품 목록 로드 전에 도착한 보고.
#[derive(Debug, Clone)]
enum PendingReport {
    Order(RtnOrder),
    Trade(RtnTrade),
}

#[derive(Debug)]
struct TdState {
    session: SessionState,
    /// 로그인 성공마다 증가. 이전 로그인의 상품 조회 재시도를 무효화합니다.
    login_epoch: u64,
    order_ref: u64,
    front_id: i32,
    session_id: i32,
    seat_no: String,
    trade_code: String,
    resolver: ReferenceResolver<PendingReport>,
    /// 시스템 주문 번호가 아직 등록되지 않은 체결
    deferred_trades: HashMap<String, Vec<RtnTrade>>,
    retry_interval: Duration,
    /// 런타임이 없어 다음 타이머에서 재시도할 상품 조회
    catalog_retry_pending: bool,
}

impl Default for TdState {
    fn default() -> Self {
        Self {
            session: SessionState::default(),
            login_epoch: 0,
            order_ref: 0,
            front_id: 0,
            session_id: 0,
            seat_no: String::new(),
            trade_code: String::new(),
            resolver: ReferenceResolver::new(),
            deferred_trades: HashMap::new(),
            retry_interval: Duration::from_secs(1),
            catalog_retry_pending: false,
        }
    }
}

impl TdState {
    fn local_order_id(&self, order_ref: &str) -> String {
        LocalOrderId::new(self.front_id, self.session_id, order_ref).to_string()
    }
}

/// 거래 세션.
pub struct TdSession<T> {
    api: T,
    context: Arc<GatewayContext>,
    state: Mutex<TdState>,
    runtime: Option<Handle>,
    this: Weak<Self>,
}

impl<T: TraderApi + 'static> TdSession<T> {
    /// 새 세션을 생성합니다.
    ///
    /// tokio 런타임 안에서 생성하면 상품 조회 재시도를 그 런타임에 예약합니다.
    pub fn new(api: T, context: Arc<GatewayContext>) -> Arc<Self> {
        let runtime = Handle::try_current().ok();
        Arc::new_cyclic(|this| Self {
            api,
            context,
            state: Mutex::new(TdState::default()),
            runtime,
            this: this.clone(),
        })
    }

    pub fn api(&self) -> &T {
        &self.api
    }

    pub fn status(&self) -> SessionStatus {
        self.state().session.status
    }

    /// 상품 목록 로드가 끝났는지 확인합니다.
    pub fn is_catalog_loaded(&self) -> bool {
        self.state().resolver.is_loaded()
    }

    /// 로드 전 버퍼에 보관된 보고 수.
    pub fn pending_reports(&self) -> usize {
        self.state().resolver.pending_len()
    }

    fn state(&self) -> MutexGuard<'_, TdState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 거래 서버에 연결합니다. API는 한 번만 생성합니다.
    pub fn connect(
        &self,
        address: &str,
        flow_path: &str,
        credentials: Credentials,
        retry_interval: Duration,
    ) {
        let mut state = self.state();
        state.session.credentials = Some(credentials);
        state.retry_interval = retry_interval;

        if !state.session.api_created {
            self.api.create_api(flow_path);
            self.api.subscribe_private_topic(codes::RESUME_RESTART);
            self.api.subscribe_public_topic(codes::RESUME_RESTART);
            self.api.register_front(address);
            self.api.init();
            state.session.mark_connecting();
            debug!(address, "td api initialized");
        }
    }

    /// 로그인 요청. 로그인에 한 번 실패하면 더 이상 시도하지 않습니다.
    fn login(&self, state: &mut TdState) {
        if state.session.status == SessionStatus::LoginFailed {
            return;
        }
        if let Some((req, request_id)) = state.session.prepare_login() {
            let rc = self.api.req_user_login(&req, request_id);
            if rc != 0 {
                warn!(rc, "td login request not accepted");
            }
        }
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
    pub fn handle(&self, callback: TdCallback) {
        let events = self.context.events();
        match callback {
            TdCallback::FrontConnected => {
                events.write_log("거래 서버 연결 성공");
                let mut state = self.state();
                state.session.mark_front_connected();
                self.login(&mut state);
            }
            TdCallback::FrontDisconnected { reason } => {
                self.state().session.mark_disconnected();
                events.write_log(format!("거래 서버 연결 끊김, 원인 {}", reason));
            }
            TdCallback::RspUserLogin { data, error } => {
                if let Err(e) = error.check() {
                    debug!(error = %e, "td login rejected");
                    self.state().session.mark_login(false);
                    events.write_error("거래 서버 로그인 실패", &error);
                    return;
                }

                let (epoch, dropped) = {
                    let mut state = self.state();
                    // 이전 세션의 체결은 더 이상 주문 보고로 해소되지 않음
                    let dropped: usize = state
                        .deferred_trades
                        .drain()
                        .map(|(_, trades)| trades.len())
                        .sum();
                    state.front_id = data.front_id;
                    state.session_id = data.session_id;
                    state.seat_no = data.seat_no;
                    state.trade_code = data.trade_code;
                    state.session.mark_login(true);
                    state.login_epoch += 1;
                    (state.login_epoch, dropped)
                };
                events.write_log("거래 서버 로그인 성공");
                if dropped > 0 {
                    warn!(dropped, "deferred trades discarded on login");
                    events.write_log(format!("주문 보고 없이 보류된 체결 {}건 폐기", dropped));
                }
                self.query_instruments(epoch);
            }
            TdCallback::RspError { error } => events.write_error("거래 API 오류", &error),
            TdCallback::RspOrderInsert { data, error } => self.on_order_rejected(data, &error),
            TdCallback::RspOrderAction { error } => events.write_error("주문 취소 실패", &error),
            TdCallback::RspQryInvestorPosition { data, error } => self.on_position(data, &error),
            TdCallback::RspQryTradingAccount { data, error } => self.on_account(data, &error),
            TdCallback::RspQryInstrument {
                data,
                decode_error,
                last,
            } => {
                if let Some(e) = decode_error {
                    events.write_log(format!("상품 정보 디코딩 실패: {}", e));
                }
                self.on_instrument(data, last);
            }
            TdCallback::RtnOrder(data) => self.admit(PendingReport::Order(data)),
            TdCallback::RtnTrade(data) => self.admit(PendingReport::Trade(data)),
            TdCallback::Unhandled(name) => debug!(callback = %name, "unhandled td callback"),
        }
    }

    // ========================================================================
    // 상품 목록
    // ========================================================================

    /// 상품 조회를 요청합니다. 벤더가 받아들이지 않으면 대기 후 다시 요청합니다.
    fn query_instruments(&self, epoch: u64) {
        let (request_id, retry_interval) = {
            let mut state = self.state();
            if !state.session.is_logged_in() || state.login_epoch != epoch {
                debug!(epoch, "instrument query abandoned");
                return;
            }
            state.catalog_retry_pending = false;
            (state.session.next_request_id(), state.retry_interval)
        };

        let rc = self.api.req_qry_instrument(request_id);
        if rc == 0 {
            debug!(request_id, "instrument query sent");
            return;
        }

        warn!(rc, retry_ms = retry_interval.as_millis() as u64, "instrument query throttled");
        match &self.runtime {
            Some(handle) => {
                let this = self.this.clone();
                handle.spawn(async move {
                    tokio::time::sleep(retry_interval).await;
                    if let Some(session) = this.upgrade() {
                        session.query_instruments(epoch);
                    }
                });
            }
            None => self.state().catalog_retry_pending = true,
        }
    }

    /// 타이머 틱. 런타임 없이 예약된 상품 조회 재시도를 수행합니다.
    pub fn on_timer(&self) {
        let epoch = {
            let state = self.state();
            if !state.catalog_retry_pending {
                return;
            }
            state.login_epoch
        };
        self.query_instruments(epoch);
    }

    fn on_instrument(&self, data: Option<Instrument>, last: bool) {
        let mut state = self.state();
        let events = self.context.events();

        if let Some(data) = data {
            let size = decimal_from_f64(data.unit);
            let pricetick = decimal_from_f64(data.tick);

            let inserted = self.context.registry_mut().insert_symbol(SymbolReference {
                symbol: data.inst_id.clone(),
                exchange: Exchange::Sge,
                name: data.name.clone(),
                size,
                pricetick,
                market_id: data.market_id,
            });
            if !inserted {
                debug!(symbol = %data.inst_id, "duplicate instrument ignored");
            }

            events.on_contract(Contract {
                gateway_name: self.context.gateway_name().to_string(),
                symbol: data.inst_id,
                exchange: Exchange::Sge,
                name: data.name,
                product: Product::Spot,
                size,
                pricetick,
            });
        }

        if last {
            events.write_log("상품 정보 조회 성공");

            let pending = state.resolver.begin_replay();
            if !pending.is_empty() {
                debug!(count = pending.len(), "replaying buffered reports");
            }
            for report in pending {
                self.process(&mut state, report);
            }
            state.resolver.finish_replay();
        }
    }

    // ========================================================================
    // 주문 / 체결 보고
    // ========================================================================

    fn admit(&self, report: PendingReport) {
        let mut state = self.state();
        if let Some(report) = state.resolver.admit(report) {
            self.process(&mut state, report);
        }
    }

    fn process(&self, state: &mut TdState, report: PendingReport) {
        match report {
            PendingReport::Order(data) => self.process_order(state, data),
            PendingReport::Trade(data) => self.process_trade(state, data),
        }
    }

    fn symbol_exchange(&self, symbol: &str) -> Option<Exchange> {
        self.context.registry().symbol(symbol).map(|r| r.exchange)
    }

    fn process_order(&self, state: &mut TdState, data: RtnOrder) {
        let events = self.context.events();
        let Some(exchange) = self.symbol_exchange(&data.inst_id) else {
            warn!(symbol = %data.inst_id, order_ref = %data.order_ref, "order report for unknown symbol");
            events.write_log(format!("알 수 없는 상품의 주문 보고 무시: {}", data.inst_id));
            return;
        };

        let order_id = LocalOrderId::new(data.front_id, data.session_id, data.order_ref.as_str()).to_string();
        {
            let mut registry = self.context.registry_mut();
            registry.register_order(order_id.as_str(), data.local_order_no.as_str());
            if !data.order_no.is_empty() {
                registry.register_system_number(data.order_no.as_str(), order_id.as_str());
            }
        }

        match self.translate_order(&data, order_id, exchange) {
            Ok(order) => events.on_order(order),
            Err(e) => events.write_log(format!("주문 보고 변환 실패: {}", e)),
        }

        if data.order_no.is_empty() {
            return;
        }
        if let Some(trades) = state.deferred_trades.remove(&data.order_no) {
            debug!(order_no = %data.order_no, count = trades.len(), "resolving deferred trades");
            for trade in trades {
                self.process_trade(state, trade);
            }
        }
    }

    fn translate_order(&self, data: &RtnOrder, order_id: String, exchange: Exchange) -> KsgoldResult<Order> {
        let datetime = report_timestamp(exchange_today(), &data.entrust_time).unwrap_or_else(|e| {
            debug!(error = %e, "EntrustTime unparsable, using receive time");
            Utc::now()
        });

        Ok(Order {
            gateway_name: self.context.gateway_name().to_string(),
            order_id,
            symbol: data.inst_id.clone(),
            exchange,
            direction: direction_from_vendor(data.buy_or_sell)?,
            offset: offset_from_vendor(data.offset_flag)?,
            price: decimal_from_f64(data.price),
            volume: decimal_from_f64(data.amount),
            traded: decimal_from_f64(data.match_qty),
            status: status_from_vendor(data.status)?,
            datetime,
            reference: None,
        })
    }

    fn process_trade(&self, state: &mut TdState, data: RtnTrade) {
        let events = self.context.events();

        let resolved = self
            .context
            .registry()
            .resolve_local_id(&data.order_no)
            .map(str::to_string);
        let order_id = match resolved {
            Ok(order_id) => order_id,
            Err(_) => {
                debug!(order_no = %data.order_no, trade_id = %data.match_no, "trade deferred until order report");
                state
                    .deferred_trades
                    .entry(data.order_no.clone())
                    .or_default()
                    .push(data);
                return;
            }
        };

        let Some(exchange) = self.symbol_exchange(&data.inst_id) else {
            warn!(symbol = %data.inst_id, trade_id = %data.match_no, "trade report for unknown symbol");
            events.write_log(format!("알 수 없는 상품의 체결 보고 무시: {}", data.inst_id));
            return;
        };

        match self.translate_trade(&data, order_id, exchange) {
            Ok(trade) => events.on_trade(trade),
            Err(e) => events.write_log(format!("체결 보고 변환 실패: {}", e)),
        }
    }

    fn translate_trade(&self, data: &RtnTrade, order_id: String, exchange: Exchange) -> KsgoldResult<Trade> {
        let datetime = report_timestamp(exchange_today(), &data.match_time).unwrap_or_else(|e| {
            debug!(error = %e, "MatchTime unparsable, using receive time");
            Utc::now()
        });

        Ok(Trade {
            gateway_name: self.context.gateway_name().to_string(),
            symbol: data.inst_id.clone(),
            exchange,
            order_id,
            trade_id: data.match_no.clone(),
            direction: direction_from_vendor(data.buy_or_sell)?,
            offset: offset_from_vendor(data.offset_flag)?,
            price: decimal_from_f64(data.price),
            volume: decimal_from_f64(data.volume),
            datetime,
        })
    }

    /// 주문 입력 거부: 거부된 주문 하나와 로그 하나를 내보냅니다.
    fn on_order_rejected(&self, data: Option<InputOrder>, error: &RspInfo) {
        let events = self.context.events();

        if let Some(data) = data {
            let order_id = self.state().local_order_id(&data.order_ref);
            let exchange = self.symbol_exchange(&data.inst_id).unwrap_or(Exchange::Sge);

            match direction_from_vendor(data.buy_or_sell) {
                Ok(direction) => events.on_order(Order {
                    gateway_name: self.context.gateway_name().to_string(),
                    order_id,
                    symbol: data.inst_id,
                    exchange,
                    direction,
                    offset: offset_from_vendor_lenient(data.offset_flag),
                    price: decimal_from_f64(data.price),
                    volume: decimal_from_f64(data.amount),
                    traded: Decimal::ZERO,
                    status: Status::Rejected,
                    datetime: Utc::now(),
                    reference: None,
                }),
                Err(e) => warn!(order_id = %order_id, error = %e, "rejected order not emitted"),
            }
        }

        events.write_error("주문 제출 실패", error);
    }

    // ========================================================================
    // 조회 응답
    // ========================================================================

    fn on_position(&self, data: Option<InvestorPosition>, error: &RspInfo) {
        if error.error_id == codes::ERROR_NO_POSITION {
            return;
        }
        if error.is_error() {
            self.context.events().write_error("포지션 조회 실패", error);
            return;
        }
        let Some(data) = data else {
            return;
        };

        let exchange = self.symbol_exchange(&data.inst_id).unwrap_or(Exchange::Sge);
        let position = |direction, price: f64, volume: f64, yd_volume: f64, frozen: f64| Position {
            gateway_name: self.context.gateway_name().to_string(),
            symbol: data.inst_id.clone(),
            exchange,
            direction,
            volume: decimal_from_f64(volume),
            yd_volume: decimal_from_f64(yd_volume),
            frozen: decimal_from_f64(frozen),
            price: decimal_from_f64(price),
            pnl: Decimal::ZERO,
        };

        let events = self.context.events();
        events.on_position(position(
            Direction::Long,
            data.long_open_avg_price,
            data.long_posi_vol,
            data.last_long,
            data.long_posi_frozen,
        ));
        events.on_position(position(
            Direction::Short,
            data.short_open_avg_price,
            data.short_posi_vol,
            data.last_short,
            data.short_posi_frozen,
        ));
    }

    fn on_account(&self, data: Option<TradingAccount>, error: &RspInfo) {
        if error.is_error() {
            self.context.events().write_error("자금 조회 실패", error);
            return;
        }
        let Some(data) = data else {
            return;
        };
        let Some(account_id) = data.client_id else {
            return;
        };

        let frozen = decimal_from_f64(data.total_frozen);
        self.context.events().on_account(Account {
            gateway_name: self.context.gateway_name().to_string(),
            account_id,
            balance: frozen + decimal_from_f64(data.avail_cap),
            frozen,
        });
    }

    // ========================================================================
    // 호스트 요청
    // ========================================================================

    /// 주문을 제출하고 로컬 주문 ID를 반환합니다.
    ///
    /// 개평 구분을 변환할 수 없거나 시장 ID가 없으면 벤더를 호출하지 않고 거부합니다.
    pub fn send_order(&self, req: &OrderRequest) -> KsgoldResult<String> {
        let events = self.context.events();

        let Some(offset_flag) = offset_to_vendor(req.offset) else {
            events.write_log("개평 구분(신규/청산)을 선택하세요");
            return Err(KsgoldError::InvalidOffset(req.offset.to_string()));
        };
        let Some(market_id) = self.context.registry().market_id(&req.symbol).map(str::to_string) else {
            events.write_log(format!("시장 ID를 찾을 수 없는 상품: {}", req.symbol));
            return Err(KsgoldError::SymbolNotFound(req.symbol.clone()));
        };

        let (insert, request_id, order_id) = {
            let mut state = self.state();
            state.order_ref += 1;
            let order_ref = state.order_ref.to_string();
            let client_id = state
                .session
                .credentials
                .as_ref()
                .map(|c| c.userid.clone())
                .unwrap_or_default();

            let insert = ReqOrderInsert {
                seat_id: state.seat_no.clone(),
                client_id,
                trade_code: state.trade_code.clone(),
                inst_id: req.symbol.clone(),
                buy_or_sell: direction_to_vendor(req.direction),
                offset_flag,
                amount: req.volume.trunc().to_i64().unwrap_or_default(),
                price: req.price.to_f64().unwrap_or_default(),
                market_id,
                order_ref: order_ref.clone(),
                session_id: state.session_id,
            };
            let order_id = state.local_order_id(&order_ref);
            (insert, state.session.next_request_id(), order_id)
        };

        let mut order = req.create_order(order_id.as_str(), self.context.gateway_name());
        events.on_order(order.clone());

        let rc = self.api.req_order_insert(&insert, request_id);
        if rc != 0 {
            order.status = Status::Rejected;
            order.datetime = Utc::now();
            events.on_order(order);
            events.write_log(format!("주문 요청 전송 실패, 반환 코드 {}", rc));
        }

        Ok(order_id)
    }

    /// 주문을 취소합니다. 벤더 로컬 주문 번호를 모르면 벤더를 호출하지 않습니다.
    pub fn cancel_order(&self, req: &CancelRequest) -> KsgoldResult<()> {
        let events = self.context.events();

        let resolved = self
            .context
            .registry()
            .resolve_vendor_local_number(&req.order_id)
            .map(str::to_string);
        let Ok(local_order_no) = resolved else {
            events.write_log(format!("취소할 주문을 찾을 수 없음: {}", req.order_id));
            return Err(KsgoldError::OrderNotFound(req.order_id.clone()));
        };

        let request_id = self.state().session.next_request_id();
        let rc = self.api.req_order_action(&ReqOrderAction { local_order_no }, request_id);
        if rc != 0 {
            events.write_log(format!("취소 요청 전송 실패, 반환 코드 {}", rc));
            return Err(KsgoldError::Throttled(rc));
        }
        Ok(())
    }

    pub fn query_account(&self) {
        let request_id = self.state().session.next_request_id();
        let rc = self.api.req_qry_trading_account(request_id);
        if rc != 0 {
            debug!(rc, "account query not accepted");
        }
    }

    /// 포지션 조회. 상품이 하나도 없으면 건너뜁니다.
    pub fn query_position(&self) {
        if !self.context.registry().has_symbols() {
            return;
        }
        let request_id = self.state().session.next_request_id();
        let rc = self.api.req_qry_investor_position(request_id);
        if rc != 0 {
            debug!(rc, "position query not accepted");
        }
    }
}
