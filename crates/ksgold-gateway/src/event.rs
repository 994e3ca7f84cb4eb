//! 호스트 플랫폼으로 발행되는 게이트웨이 이벤트.
//!
//! 모든 정규화된 레코드는 `GatewayEvent`로 감싸져 tokio mpsc 채널로 전달됩니다.
//! 호스트에 보이는 로그도 같은 채널로 흐르며, 동시에 `tracing`으로 기록됩니다.

use chrono::{DateTime, Utc};
use ksgold_core::{Account, Contract, Order, Position, Tick, Trade};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::connector::ksgold::RspInfo;

/// 호스트 플랫폼에 전달되는 로그 레코드.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// 게이트웨이 이름
    pub gateway_name: String,
    /// 로그 메시지
    pub msg: String,
    /// 벤더 에러 코드 (에러 로그인 경우)
    pub code: Option<i32>,
    /// 기록 시각
    pub time: DateTime<Utc>,
}

/// 게이트웨이 이벤트.
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    /// 시세
    Tick(Tick),
    /// 주문 상태
    Order(Order),
    /// 체결
    Trade(Trade),
    /// 포지션
    Position(Position),
    /// 계좌
    Account(Account),
    /// 상품 정보
    Contract(Contract),
    /// 로그
    Log(LogRecord),
}

impl GatewayEvent {
    /// 이벤트 종류 이름.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayEvent::Tick(_) => "tick",
            GatewayEvent::Order(_) => "order",
            GatewayEvent::Trade(_) => "trade",
            GatewayEvent::Position(_) => "position",
            GatewayEvent::Account(_) => "account",
            GatewayEvent::Contract(_) => "contract",
            GatewayEvent::Log(_) => "log",
        }
    }
}

/// 이벤트 발행기.
///
/// 송신 실패(수신 측 종료)는 무시합니다. 게이트웨이는 호스트가 사라져도
/// 벤더 콜백을 계속 소비해야 합니다.
#[derive(Debug, Clone)]
pub struct EventEmitter {
    gateway_name: String,
    sender: mpsc::UnboundedSender<GatewayEvent>,
}

impl EventEmitter {
    /// 새 발행기를 생성합니다.
    pub fn new(gateway_name: impl Into<String>, sender: mpsc::UnboundedSender<GatewayEvent>) -> Self {
        Self {
            gateway_name: gateway_name.into(),
            sender,
        }
    }

    /// 게이트웨이 이름.
    pub fn gateway_name(&self) -> &str {
        &self.gateway_name
    }

    fn emit(&self, event: GatewayEvent) {
        let kind = event.kind();
        if self.sender.send(event).is_err() {
            debug!(kind, "event receiver closed, dropping event");
        }
    }

    pub fn on_tick(&self, tick: Tick) {
        self.emit(GatewayEvent::Tick(tick));
    }

    pub fn on_order(&self, order: Order) {
        self.emit(GatewayEvent::Order(order));
    }

    pub fn on_trade(&self, trade: Trade) {
        self.emit(GatewayEvent::Trade(trade));
    }

    pub fn on_position(&self, position: Position) {
        self.emit(GatewayEvent::Position(position));
    }

    pub fn on_account(&self, account: Account) {
        self.emit(GatewayEvent::Account(account));
    }

    pub fn on_contract(&self, contract: Contract) {
        self.emit(GatewayEvent::Contract(contract));
    }

    /// 호스트에 로그를 남깁니다.
    pub fn write_log(&self, msg: impl Into<String>) {
        let msg = msg.into();
        info!(gateway = %self.gateway_name, "{}", msg);
        self.emit(GatewayEvent::Log(LogRecord {
            gateway_name: self.gateway_name.clone(),
            msg,
            code: None,
            time: Utc::now(),
        }));
    }

    /// 벤더 에러 코드와 메시지를 붙여 호스트에 로그를 남깁니다.
    pub fn write_error(&self, msg: &str, error: &RspInfo) {
        let msg = format!(
            "{}, 코드: {}, 메시지: {}",
            msg, error.error_id, error.error_msg
        );
        warn!(gateway = %self.gateway_name, code = error.error_id, "{}", msg);
        self.emit(GatewayEvent::Log(LogRecord {
            gateway_name: self.gateway_name.clone(),
            msg,
            code: Some(error.error_id),
            time: Utc::now(),
        }));
    }
}
