//! 통합 테스트용 기록 mock 벤더 API.

#![allow(dead_code)]

use ksgold_core::GatewaySettings;
use ksgold_gateway::connector::ksgold::{ReqOrderAction, ReqOrderInsert, ReqUserLogin};
use ksgold_gateway::{GatewayEvent, KsgoldGateway, QuoteApi, RawCallback, TraderApi, TradingGateway};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum TdCall {
    CreateApi(String),
    SubscribePrivateTopic(i32),
    SubscribePublicTopic(i32),
    RegisterFront(String),
    Init,
    Login { account_id: String, login_type: i32 },
    QryInstrument,
    OrderInsert(Value),
    OrderAction(String),
    QryTradingAccount,
    QryInvestorPosition,
    Exit,
}

#[derive(Debug, Default)]
pub struct MockTraderApi {
    calls: Mutex<Vec<TdCall>>,
    instrument_rcs: Mutex<VecDeque<i32>>,
    insert_rc: Mutex<i32>,
}

impl MockTraderApi {
    /// 상품 조회 반환 코드를 순서대로 지정합니다. 소진되면 0.
    pub fn with_instrument_rcs(rcs: &[i32]) -> Self {
        let api = Self::default();
        api.instrument_rcs.lock().unwrap().extend(rcs.iter().copied());
        api
    }

    pub fn set_insert_rc(&self, rc: i32) {
        *self.insert_rc.lock().unwrap() = rc;
    }

    pub fn calls(&self) -> Vec<TdCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&TdCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: TdCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl TraderApi for MockTraderApi {
    fn create_api(&self, flow_path: &str) {
        self.record(TdCall::CreateApi(flow_path.to_string()));
    }

    fn subscribe_private_topic(&self, resume_type: i32) {
        self.record(TdCall::SubscribePrivateTopic(resume_type));
    }

    fn subscribe_public_topic(&self, resume_type: i32) {
        self.record(TdCall::SubscribePublicTopic(resume_type));
    }

    fn register_front(&self, address: &str) {
        self.record(TdCall::RegisterFront(address.to_string()));
    }

    fn init(&self) {
        self.record(TdCall::Init);
    }

    fn req_user_login(&self, req: &ReqUserLogin, _request_id: i32) -> i32 {
        self.record(TdCall::Login {
            account_id: req.account_id.clone(),
            login_type: req.login_type,
        });
        0
    }

    fn req_qry_instrument(&self, _request_id: i32) -> i32 {
        self.record(TdCall::QryInstrument);
        self.instrument_rcs.lock().unwrap().pop_front().unwrap_or(0)
    }

    fn req_order_insert(&self, req: &ReqOrderInsert, _request_id: i32) -> i32 {
        self.record(TdCall::OrderInsert(serde_json::to_value(req).unwrap()));
        *self.insert_rc.lock().unwrap()
    }

    fn req_order_action(&self, req: &ReqOrderAction, _request_id: i32) -> i32 {
        self.record(TdCall::OrderAction(req.local_order_no.clone()));
        0
    }

    fn req_qry_trading_account(&self, _request_id: i32) -> i32 {
        self.record(TdCall::QryTradingAccount);
        0
    }

    fn req_qry_investor_position(&self, _request_id: i32) -> i32 {
        self.record(TdCall::QryInvestorPosition);
        0
    }

    fn exit(&self) {
        self.record(TdCall::Exit);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MdCall {
    CreateApi(String),
    RegisterFront(String),
    Init,
    Login,
    Subscribe(String),
    Exit,
}

#[derive(Debug, Default)]
pub struct MockQuoteApi {
    calls: Mutex<Vec<MdCall>>,
}

impl MockQuoteApi {
    pub fn calls(&self) -> Vec<MdCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&MdCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: MdCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl QuoteApi for MockQuoteApi {
    fn create_api(&self, flow_path: &str) {
        self.record(MdCall::CreateApi(flow_path.to_string()));
    }

    fn register_front(&self, address: &str) {
        self.record(MdCall::RegisterFront(address.to_string()));
    }

    fn init(&self) {
        self.record(MdCall::Init);
    }

    fn req_user_login(&self, _req: &ReqUserLogin, _request_id: i32) -> i32 {
        self.record(MdCall::Login);
        0
    }

    fn subscribe_market_data(&self, symbol: &str, _request_id: i32) -> i32 {
        self.record(MdCall::Subscribe(symbol.to_string()));
        0
    }

    fn exit(&self) {
        self.record(MdCall::Exit);
    }
}

pub type TestGateway = KsgoldGateway<MockTraderApi, MockQuoteApi>;

pub struct Harness {
    pub gateway: TestGateway,
    pub events: mpsc::UnboundedReceiver<GatewayEvent>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_trader(MockTraderApi::default())
    }

    pub fn with_trader(trader: MockTraderApi) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let gateway = KsgoldGateway::new("KSGOLD", trader, MockQuoteApi::default(), tx);
        Self {
            gateway,
            events: rx,
        }
    }

    pub fn settings() -> GatewaySettings {
        GatewaySettings::new("1001", "pw", "10.0.0.1:9001", "10.0.0.1:9002").with_flow_dir("/tmp/ksgold")
    }

    pub fn connect(&self) {
        self.gateway.connect(&Self::settings());
    }

    /// 거래 세션을 연결하고 로그인시킵니다 (front 1, session 7).
    pub fn login_td(&self) {
        self.connect();
        self.td(RawCallback::new("onFrontConnected", json!(0)));
        self.td(
            RawCallback::new(
                "onRspUserLogin",
                json!({"FrontID": 1, "SessionID": 7, "SeatNo": "S01", "TradeCode": "T01"}),
            )
            .with_error(json!({"ErrorID": 0, "ErrorMsg": ""})),
        );
    }

    pub fn login_md(&self) {
        self.md(RawCallback::new("onFrontConnected", json!(0)));
        self.md(RawCallback::new("onRspUserLogin", json!({})).with_error(json!({"ErrorID": 0, "ErrorMsg": ""})));
    }

    /// 상품 목록을 전달합니다. 마지막 항목이 마지막 페이지입니다.
    pub fn load_catalog(&self, symbols: &[&str]) {
        for (i, symbol) in symbols.iter().enumerate() {
            self.td(
                RawCallback::new(
                    "onRspQryInstrument",
                    json!({"InstID": symbol, "Name": format!("{} name", symbol), "Unit": 1000, "Tick": 0.01, "MarketID": "00"}),
                )
                .with_last(i + 1 == symbols.len()),
            );
        }
    }

    pub fn td(&self, raw: RawCallback) {
        self.gateway.on_td_callback(raw);
    }

    pub fn md(&self, raw: RawCallback) {
        self.gateway.on_md_callback(raw);
    }

    pub fn drain(&mut self) -> Vec<GatewayEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

pub fn rtn_order(order_ref: &str, local_no: &str, order_no: &str, status: &str) -> RawCallback {
    RawCallback::new(
        "onRtnOrder",
        json!({
            "InstID": "AU9999",
            "FrontID": 1,
            "SessionID": 7,
            "OrderRef": order_ref,
            "LocalOrderNo": local_no,
            "OrderNo": order_no,
            "EntrustTime": "09:30:00",
            "BuyOrSell": "b",
            "OffsetFlag": 0,
            "Price": 480.5,
            "Amount": 2,
            "MatchQty": 0,
            "Status": status
        }),
    )
}

pub fn rtn_trade(order_no: &str, match_no: &str) -> RawCallback {
    RawCallback::new(
        "onRtnTrade",
        json!({
            "InstID": "AU9999",
            "OrderNo": order_no,
            "MatchNo": match_no,
            "BuyOrSell": "b",
            "OffSetFlag": 0,
            "Price": 480.5,
            "Volume": 1,
            "MatchTime": "09:30:05"
        }),
    )
}

/// 주문/체결 이벤트만 (종류, ID) 목록으로.
pub fn order_flow(events: &[GatewayEvent]) -> Vec<(&'static str, String)> {
    events
        .iter()
        .filter_map(|event| match event {
            GatewayEvent::Order(order) => Some(("order", order.order_id.clone())),
            GatewayEvent::Trade(trade) => Some(("trade", trade.trade_id.clone())),
            _ => None,
        })
        .collect()
}

pub fn logs(events: &[GatewayEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            GatewayEvent::Log(record) => Some(record.msg.clone()),
            _ => None,
        })
        .collect()
}
