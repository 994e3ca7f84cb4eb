//! 시세 세션 흐름 통합 테스트.

mod common;

use chrono::{TimeZone, Utc};
use common::{logs, Harness, MdCall};
use ksgold_core::{SubscribeRequest, Tick};
use ksgold_gateway::connector::ksgold::SessionStatus;
use ksgold_gateway::{GatewayEvent, RawCallback, TradingGateway};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

fn subscribes(h: &Harness, symbol: &str) -> usize {
    h.gateway
        .quote_api()
        .count(|c| matches!(c, MdCall::Subscribe(s) if s == symbol))
}

fn depth(symbol: &str, bid_lot2: f64, ask_lot2: f64) -> Value {
    json!({
        "InstID": symbol,
        "QuoteDate": "20240115",
        "QuoteTime": "10:15:30",
        "UpdateMillisec": 500,
        "Volume": 1200,
        "OpenInt": 300,
        "Last": 480.5,
        "highLimit": 520.0,
        "lowLimit": 440.0,
        "Open": 479.0,
        "Highest": 481.0,
        "Low": 478.5,
        "PreClose": 478.0,
        "Bid1": 480.4, "BidLot1": 10,
        "Bid2": 480.3, "BidLot2": bid_lot2,
        "Bid3": 480.2, "BidLot3": 3,
        "Bid4": 480.1, "BidLot4": 4,
        "Bid5": 480.0, "BidLot5": 5,
        "Ask1": 480.6, "AskLot1": 12,
        "Ask2": 480.7, "AskLot2": ask_lot2,
        "Ask3": 480.8, "AskLot3": 3,
        "Ask4": 480.9, "AskLot4": 4,
        "Ask5": 481.0, "AskLot5": 5
    })
}

fn ticks(events: &[GatewayEvent]) -> Vec<Tick> {
    events
        .iter()
        .filter_map(|e| match e {
            GatewayEvent::Tick(tick) => Some(tick.clone()),
            _ => None,
        })
        .collect()
}

/// 거래 세션에서 상품 목록을 받고 시세 세션까지 로그인한 상태.
fn ready() -> Harness {
    let mut h = Harness::new();
    h.login_td();
    h.load_catalog(&["AU9999", "AG(T+D)"]);
    h.login_md();
    h.drain();
    h
}

#[test]
fn test_md_connect_paths() {
    let h = Harness::new();
    h.connect();

    assert_eq!(
        h.gateway.quote_api().calls(),
        vec![
            MdCall::CreateApi("/tmp/ksgold/Md".to_string()),
            MdCall::RegisterFront("tcp://10.0.0.1:9002".to_string()),
            MdCall::Init,
        ]
    );
}

#[test]
fn test_reconnect_before_login_only_relogs_in() {
    let h = Harness::new();
    h.connect();
    h.connect();

    let api = h.gateway.quote_api();
    assert_eq!(api.count(|c| matches!(c, MdCall::CreateApi(_))), 1);
    assert_eq!(api.count(|c| *c == MdCall::Login), 1);
}

#[test]
fn test_subscription_before_login_issued_once() {
    let h = Harness::new();
    h.connect();
    h.gateway.subscribe(&SubscribeRequest::new("AU9999"));
    h.gateway.subscribe(&SubscribeRequest::new("AU9999"));
    assert_eq!(subscribes(&h, "AU9999"), 0);

    h.login_md();
    assert_eq!(subscribes(&h, "AU9999"), 1);
    assert_eq!(h.gateway.md_status(), SessionStatus::LoggedIn);

    h.gateway.subscribe(&SubscribeRequest::new("AG(T+D)"));
    assert_eq!(subscribes(&h, "AG(T+D)"), 1);
}

#[test]
fn test_subscriptions_replayed_after_relogin() {
    let h = Harness::new();
    h.connect();
    h.login_md();
    h.gateway.subscribe(&SubscribeRequest::new("AU9999"));
    assert_eq!(subscribes(&h, "AU9999"), 1);

    h.md(RawCallback::new("onFrontDisconnected", json!(4097)));
    h.login_md();
    assert_eq!(subscribes(&h, "AU9999"), 2);
}

#[test]
fn test_md_login_failure() {
    let mut h = Harness::new();
    h.connect();
    h.md(RawCallback::new("onFrontConnected", json!(0)));
    h.md(
        RawCallback::new("onRspUserLogin", json!({}))
            .with_error(json!({"ErrorID": 3, "ErrorMsg": "bad user"})),
    );

    assert_eq!(h.gateway.md_status(), SessionStatus::LoginFailed);
    let events = h.drain();
    assert!(events
        .iter()
        .any(|e| matches!(e, GatewayEvent::Log(record) if record.code == Some(3))));
}

#[test]
fn test_md_failed_login_not_retried_on_reconnect() {
    let h = Harness::new();
    h.connect();
    h.md(RawCallback::new("onFrontConnected", json!(0)));
    h.md(
        RawCallback::new("onRspUserLogin", json!({}))
            .with_error(json!({"ErrorID": 3, "ErrorMsg": "bad user"})),
    );
    h.gateway.subscribe(&SubscribeRequest::new("AU9999"));

    h.md(RawCallback::new("onFrontDisconnected", json!(4097)));
    h.md(RawCallback::new("onFrontConnected", json!(0)));
    h.connect();

    let api = h.gateway.quote_api();
    assert_eq!(api.count(|c| *c == MdCall::Login), 1);
    assert_eq!(subscribes(&h, "AU9999"), 0);
    assert_eq!(h.gateway.md_status(), SessionStatus::LoginFailed);
}

#[test]
fn test_tick_with_empty_second_level_has_one_level() {
    let mut h = ready();
    h.md(RawCallback::new("onRtnDepthMarketData", depth("AU9999", 0.0, 0.0)));

    let ticks = ticks(&h.drain());
    assert_eq!(ticks.len(), 1);
    let tick = &ticks[0];
    assert_eq!(tick.symbol, "AU9999");
    assert_eq!(tick.name, "AU9999 name");
    assert_eq!(tick.bids.len(), 1);
    assert_eq!(tick.asks.len(), 1);
    assert!(!tick.has_full_depth());
    assert_eq!(tick.best_bid().unwrap().price, dec!(480.4));
    assert_eq!(tick.best_ask().unwrap().volume, dec!(12));
}

#[test]
fn test_tick_with_second_level_has_five_levels() {
    let mut h = ready();
    h.md(RawCallback::new("onRtnDepthMarketData", depth("AU9999", 2.0, 0.0)));

    let ticks = ticks(&h.drain());
    assert_eq!(ticks.len(), 1);
    let tick = &ticks[0];
    assert_eq!(tick.bids.len(), 5);
    assert_eq!(tick.asks.len(), 5);
    assert_eq!(tick.bids[4].price, dec!(480.0));
    assert_eq!(tick.asks[2].volume, dec!(3));
}

#[test]
fn test_tick_fields_and_timestamp() {
    let mut h = ready();
    h.md(RawCallback::new("onRtnDepthMarketData", depth("AU9999", 0.0, 0.0)));

    let tick = ticks(&h.drain()).remove(0);
    // 상하이 10:15:30.500 = UTC 02:15:30.500
    let expected = Utc.with_ymd_and_hms(2024, 1, 15, 2, 15, 30).unwrap()
        + chrono::Duration::milliseconds(500);
    assert_eq!(tick.datetime, expected);
    assert_eq!(tick.last_price, dec!(480.5));
    assert_eq!(tick.limit_up, dec!(520));
    assert_eq!(tick.limit_down, dec!(440));
    assert_eq!(tick.volume, dec!(1200));
    assert_eq!(tick.open_interest, dec!(300));
    assert_eq!(tick.pre_close, dec!(478));
}

#[test]
fn test_sentinel_prices_become_zero() {
    let mut h = ready();
    let mut data = depth("AU9999", 0.0, 0.0);
    data["Last"] = json!(f64::MAX);
    data["Ask1"] = json!(f64::MAX);
    h.md(RawCallback::new("onRtnDepthMarketData", data));

    let tick = ticks(&h.drain()).remove(0);
    assert_eq!(tick.last_price, Decimal::ZERO);
    assert_eq!(tick.best_ask().unwrap().price, Decimal::ZERO);
}

#[test]
fn test_tick_for_unknown_symbol_dropped() {
    let mut h = ready();
    h.md(RawCallback::new("onRtnDepthMarketData", depth("PT9995", 0.0, 0.0)));

    let events = h.drain();
    assert!(ticks(&events).is_empty());
    assert!(logs(&events).is_empty());
}

#[test]
fn test_tick_with_bad_timestamp_becomes_log() {
    let mut h = ready();
    let mut data = depth("AU9999", 0.0, 0.0);
    data["QuoteTime"] = json!("25:99:00");
    h.md(RawCallback::new("onRtnDepthMarketData", data));

    let events = h.drain();
    assert!(ticks(&events).is_empty());
    assert!(logs(&events).iter().any(|m| m.contains("AU9999")));
}
