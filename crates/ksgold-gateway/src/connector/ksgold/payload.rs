//! 벤더 콜백/요청 페이로드.
//!
//! 필드의 serde 이름은 벤더 필드 이름을 그대로 따릅니다 (`InstID`, `OrderNo`,
//! 체결 보고의 `OffSetFlag` 등 대소문자까지 동일).
//! 벤더는 같은 필드를 숫자나 문자열로 보내기도 하므로 역직렬화는 관대하게 처리합니다.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ============================================================================
// 관대한 역직렬화 헬퍼
// ============================================================================

/// 숫자 또는 숫자 문자열을 f64로. 빈 값/null은 0.
fn deserialize_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom(format!("Invalid number: {}", n))),
        Value::String(s) if s.trim().is_empty() => Ok(0.0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("Invalid number: {}", s))),
        Value::Null => Ok(0.0),
        other => Err(de::Error::custom(format!("Invalid number: {}", other))),
    }
}

/// 숫자 또는 숫자 문자열을 i32로.
fn deserialize_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| de::Error::custom(format!("Invalid integer: {}", n))),
        Value::String(s) => s
            .trim()
            .parse::<i32>()
            .map_err(|_| de::Error::custom(format!("Invalid integer: {}", s))),
        Value::Null => Ok(0),
        other => Err(de::Error::custom(format!("Invalid integer: {}", other))),
    }
}

/// 문자열 또는 숫자를 문자열로.
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!("Invalid text: {}", other))),
    }
}

/// 한 글자 코드 (문자열 첫 글자, 또는 숫자 0-9 / ASCII 코드).
fn deserialize_code_char<'de, D>(deserializer: D) -> Result<char, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => s
            .chars()
            .next()
            .ok_or_else(|| de::Error::custom("Empty code")),
        Value::Number(n) => {
            let code = n
                .as_u64()
                .ok_or_else(|| de::Error::custom(format!("Invalid code: {}", n)))?;
            match code {
                0..=9 => char::from_digit(code as u32, 10)
                    .ok_or_else(|| de::Error::custom(format!("Invalid code: {}", n))),
                32..=126 => Ok(code as u8 as char),
                _ => Err(de::Error::custom(format!("Invalid code: {}", n))),
            }
        }
        other => Err(de::Error::custom(format!("Invalid code: {}", other))),
    }
}

// ============================================================================
// 공통
// ============================================================================

/// 벤더 응답 정보 (에러 코드와 메시지).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RspInfo {
    /// 에러 코드 (0이면 성공)
    #[serde(rename = "ErrorID", default, deserialize_with = "deserialize_i32")]
    pub error_id: i32,
    /// 에러 메시지
    #[serde(rename = "ErrorMsg", default, deserialize_with = "deserialize_text")]
    pub error_msg: String,
}

impl RspInfo {
    pub fn new(error_id: i32, error_msg: impl Into<String>) -> Self {
        Self {
            error_id,
            error_msg: error_msg.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error_id != 0
    }

    /// 에러 코드가 있으면 `ApiError`로 변환합니다.
    pub fn check(&self) -> crate::KsgoldResult<()> {
        if self.is_error() {
            Err(crate::KsgoldError::ApiError {
                code: self.error_id,
                message: self.error_msg.clone(),
            })
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// 로그인
// ============================================================================

/// 로그인 요청.
#[derive(Clone, Serialize)]
pub struct ReqUserLogin {
    #[serde(rename = "AccountID")]
    pub account_id: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "LoginType")]
    pub login_type: i32,
}

impl fmt::Debug for ReqUserLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqUserLogin")
            .field("account_id", &self.account_id)
            .field("password", &"[REDACTED]")
            .field("login_type", &self.login_type)
            .finish()
    }
}

/// 로그인 응답. 시세 로그인 응답에는 세션 필드가 없을 수 있습니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RspUserLogin {
    #[serde(rename = "FrontID", default, deserialize_with = "deserialize_i32")]
    pub front_id: i32,
    #[serde(rename = "SessionID", default, deserialize_with = "deserialize_i32")]
    pub session_id: i32,
    #[serde(rename = "SeatNo", default, deserialize_with = "deserialize_text")]
    pub seat_no: String,
    #[serde(rename = "TradeCode", default, deserialize_with = "deserialize_text")]
    pub trade_code: String,
}

// ============================================================================
// 시세
// ============================================================================

/// 심층 시세 스냅샷.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepthMarketData {
    #[serde(rename = "InstID", deserialize_with = "deserialize_text")]
    pub inst_id: String,
    /// `%Y%m%d`
    #[serde(rename = "QuoteDate", default, deserialize_with = "deserialize_text")]
    pub quote_date: String,
    /// `%H:%M:%S`
    #[serde(rename = "QuoteTime", default, deserialize_with = "deserialize_text")]
    pub quote_time: String,
    #[serde(rename = "UpdateMillisec", default, deserialize_with = "deserialize_i32")]
    pub update_millisec: i32,

    #[serde(rename = "Volume", default, deserialize_with = "deserialize_f64")]
    pub volume: f64,
    #[serde(rename = "OpenInt", default, deserialize_with = "deserialize_f64")]
    pub open_int: f64,
    #[serde(rename = "Last", default, deserialize_with = "deserialize_f64")]
    pub last: f64,
    #[serde(rename = "highLimit", default, deserialize_with = "deserialize_f64")]
    pub high_limit: f64,
    #[serde(rename = "lowLimit", default, deserialize_with = "deserialize_f64")]
    pub low_limit: f64,
    #[serde(rename = "Open", default, deserialize_with = "deserialize_f64")]
    pub open: f64,
    #[serde(rename = "Highest", default, deserialize_with = "deserialize_f64")]
    pub highest: f64,
    #[serde(rename = "Low", default, deserialize_with = "deserialize_f64")]
    pub low: f64,
    #[serde(rename = "PreClose", default, deserialize_with = "deserialize_f64")]
    pub pre_close: f64,

    #[serde(rename = "Bid1", default, deserialize_with = "deserialize_f64")]
    pub bid1: f64,
    #[serde(rename = "Bid2", default, deserialize_with = "deserialize_f64")]
    pub bid2: f64,
    #[serde(rename = "Bid3", default, deserialize_with = "deserialize_f64")]
    pub bid3: f64,
    #[serde(rename = "Bid4", default, deserialize_with = "deserialize_f64")]
    pub bid4: f64,
    #[serde(rename = "Bid5", default, deserialize_with = "deserialize_f64")]
    pub bid5: f64,
    #[serde(rename = "Ask1", default, deserialize_with = "deserialize_f64")]
    pub ask1: f64,
    #[serde(rename = "Ask2", default, deserialize_with = "deserialize_f64")]
    pub ask2: f64,
    #[serde(rename = "Ask3", default, deserialize_with = "deserialize_f64")]
    pub ask3: f64,
    #[serde(rename = "Ask4", default, deserialize_with = "deserialize_f64")]
    pub ask4: f64,
    #[serde(rename = "Ask5", default, deserialize_with = "deserialize_f64")]
    pub ask5: f64,

    #[serde(rename = "BidLot1", default, deserialize_with = "deserialize_f64")]
    pub bid_lot1: f64,
    #[serde(rename = "BidLot2", default, deserialize_with = "deserialize_f64")]
    pub bid_lot2: f64,
    #[serde(rename = "BidLot3", default, deserialize_with = "deserialize_f64")]
    pub bid_lot3: f64,
    #[serde(rename = "BidLot4", default, deserialize_with = "deserialize_f64")]
    pub bid_lot4: f64,
    #[serde(rename = "BidLot5", default, deserialize_with = "deserialize_f64")]
    pub bid_lot5: f64,
    #[serde(rename = "AskLot1", default, deserialize_with = "deserialize_f64")]
    pub ask_lot1: f64,
    #[serde(rename = "AskLot2", default, deserialize_with = "deserialize_f64")]
    pub ask_lot2: f64,
    #[serde(rename = "AskLot3", default, deserialize_with = "deserialize_f64")]
    pub ask_lot3: f64,
    #[serde(rename = "AskLot4", default, deserialize_with = "deserialize_f64")]
    pub ask_lot4: f64,
    #[serde(rename = "AskLot5", default, deserialize_with = "deserialize_f64")]
    pub ask_lot5: f64,
}

impl DepthMarketData {
    /// 1~5단계 매수 (가격, 잔량).
    pub fn bid_levels(&self) -> [(f64, f64); 5] {
        [
            (self.bid1, self.bid_lot1),
            (self.bid2, self.bid_lot2),
            (self.bid3, self.bid_lot3),
            (self.bid4, self.bid_lot4),
            (self.bid5, self.bid_lot5),
        ]
    }

    /// 1~5단계 매도 (가격, 잔량).
    pub fn ask_levels(&self) -> [(f64, f64); 5] {
        [
            (self.ask1, self.ask_lot1),
            (self.ask2, self.ask_lot2),
            (self.ask3, self.ask_lot3),
            (self.ask4, self.ask_lot4),
            (self.ask5, self.ask_lot5),
        ]
    }
}

// ============================================================================
// 주문 / 체결
// ============================================================================

/// 주문 입력 요청.
#[derive(Debug, Clone, Serialize)]
pub struct ReqOrderInsert {
    #[serde(rename = "SeatID")]
    pub seat_id: String,
    #[serde(rename = "ClientID")]
    pub client_id: String,
    #[serde(rename = "TradeCode")]
    pub trade_code: String,
    #[serde(rename = "InstID")]
    pub inst_id: String,
    #[serde(rename = "BuyOrSell")]
    pub buy_or_sell: char,
    #[serde(rename = "OffsetFlag")]
    pub offset_flag: i32,
    #[serde(rename = "Amount")]
    pub amount: i64,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "MarketID")]
    pub market_id: String,
    #[serde(rename = "OrderRef")]
    pub order_ref: String,
    #[serde(rename = "SessionID")]
    pub session_id: i32,
}

/// 주문 취소 요청. 벤더 로컬 주문 번호만 필요합니다.
#[derive(Debug, Clone, Serialize)]
pub struct ReqOrderAction {
    #[serde(rename = "LocalOrderNo")]
    pub local_order_no: String,
}

/// 주문 입력 거부 응답의 주문 정보.
#[derive(Debug, Clone, Deserialize)]
pub struct InputOrder {
    #[serde(rename = "InstID", deserialize_with = "deserialize_text")]
    pub inst_id: String,
    #[serde(rename = "OrderRef", default, deserialize_with = "deserialize_text")]
    pub order_ref: String,
    #[serde(rename = "BuyOrSell", deserialize_with = "deserialize_code_char")]
    pub buy_or_sell: char,
    #[serde(rename = "OffsetFlag", default, deserialize_with = "deserialize_i32")]
    pub offset_flag: i32,
    #[serde(rename = "Price", default, deserialize_with = "deserialize_f64")]
    pub price: f64,
    #[serde(rename = "Amount", default, deserialize_with = "deserialize_f64")]
    pub amount: f64,
}

/// 주문 상태 보고.
#[derive(Debug, Clone, Deserialize)]
pub struct RtnOrder {
    #[serde(rename = "InstID", deserialize_with = "deserialize_text")]
    pub inst_id: String,
    #[serde(rename = "FrontID", deserialize_with = "deserialize_i32")]
    pub front_id: i32,
    #[serde(rename = "SessionID", deserialize_with = "deserialize_i32")]
    pub session_id: i32,
    #[serde(rename = "OrderRef", deserialize_with = "deserialize_text")]
    pub order_ref: String,
    /// 벤더 로컬 주문 번호
    #[serde(rename = "LocalOrderNo", deserialize_with = "deserialize_text")]
    pub local_order_no: String,
    /// 시스템 주문 번호 (접수 전에는 비어 있을 수 있음)
    #[serde(rename = "OrderNo", default, deserialize_with = "deserialize_text")]
    pub order_no: String,
    /// `%H:%M:%S`
    #[serde(rename = "EntrustTime", default, deserialize_with = "deserialize_text")]
    pub entrust_time: String,
    #[serde(rename = "BuyOrSell", deserialize_with = "deserialize_code_char")]
    pub buy_or_sell: char,
    #[serde(rename = "OffsetFlag", deserialize_with = "deserialize_i32")]
    pub offset_flag: i32,
    #[serde(rename = "Price", default, deserialize_with = "deserialize_f64")]
    pub price: f64,
    #[serde(rename = "Amount", default, deserialize_with = "deserialize_f64")]
    pub amount: f64,
    #[serde(rename = "MatchQty", default, deserialize_with = "deserialize_f64")]
    pub match_qty: f64,
    #[serde(rename = "Status", deserialize_with = "deserialize_code_char")]
    pub status: char,
}

/// 체결 보고.
#[derive(Debug, Clone, Deserialize)]
pub struct RtnTrade {
    #[serde(rename = "InstID", deserialize_with = "deserialize_text")]
    pub inst_id: String,
    #[serde(rename = "OrderNo", deserialize_with = "deserialize_text")]
    pub order_no: String,
    #[serde(rename = "MatchNo", deserialize_with = "deserialize_text")]
    pub match_no: String,
    #[serde(rename = "BuyOrSell", deserialize_with = "deserialize_code_char")]
    pub buy_or_sell: char,
    /// 주문 보고와 달리 `OffSetFlag`
    #[serde(rename = "OffSetFlag", deserialize_with = "deserialize_i32")]
    pub offset_flag: i32,
    #[serde(rename = "Price", default, deserialize_with = "deserialize_f64")]
    pub price: f64,
    #[serde(rename = "Volume", default, deserialize_with = "deserialize_f64")]
    pub volume: f64,
    /// `%H:%M:%S`
    #[serde(rename = "MatchTime", default, deserialize_with = "deserialize_text")]
    pub match_time: String,
}

// ============================================================================
// 조회
// ============================================================================

/// 포지션 조회 응답. 한 레코드에 롱/숏이 함께 들어 있습니다.
#[derive(Debug, Clone, Deserialize)]
pub struct InvestorPosition {
    #[serde(rename = "InstID", deserialize_with = "deserialize_text")]
    pub inst_id: String,
    #[serde(rename = "LongOpenAvgPrice", default, deserialize_with = "deserialize_f64")]
    pub long_open_avg_price: f64,
    #[serde(rename = "LastLong", default, deserialize_with = "deserialize_f64")]
    pub last_long: f64,
    #[serde(rename = "LongPosiVol", default, deserialize_with = "deserialize_f64")]
    pub long_posi_vol: f64,
    #[serde(rename = "LongPosiFrozen", default, deserialize_with = "deserialize_f64")]
    pub long_posi_frozen: f64,
    #[serde(rename = "ShortOpenAvgPrice", default, deserialize_with = "deserialize_f64")]
    pub short_open_avg_price: f64,
    #[serde(rename = "LastShort", default, deserialize_with = "deserialize_f64")]
    pub last_short: f64,
    #[serde(rename = "ShortPosiVol", default, deserialize_with = "deserialize_f64")]
    pub short_posi_vol: f64,
    #[serde(rename = "ShortPosiFrozen", default, deserialize_with = "deserialize_f64")]
    pub short_posi_frozen: f64,
}

/// 자금 조회 응답. `ClientID`가 없는 응답은 무시됩니다.
#[derive(Debug, Clone, Deserialize)]
pub struct TradingAccount {
    #[serde(rename = "ClientID", default)]
    pub client_id: Option<String>,
    #[serde(rename = "TotalFrozen", default, deserialize_with = "deserialize_f64")]
    pub total_frozen: f64,
    #[serde(rename = "AvailCap", default, deserialize_with = "deserialize_f64")]
    pub avail_cap: f64,
}

/// 상품 조회 응답.
#[derive(Debug, Clone, Deserialize)]
pub struct Instrument {
    #[serde(rename = "InstID", deserialize_with = "deserialize_text")]
    pub inst_id: String,
    #[serde(rename = "Name", default, deserialize_with = "deserialize_text")]
    pub name: String,
    #[serde(rename = "Unit", default, deserialize_with = "deserialize_f64")]
    pub unit: f64,
    #[serde(rename = "Tick", default, deserialize_with = "deserialize_f64")]
    pub tick: f64,
    #[serde(rename = "MarketID", default, deserialize_with = "deserialize_text")]
    pub market_id: String,
}
