//! 벤더 콜백 디코딩.
//!
//! 벤더 스레드에서 전달되는 콜백은 이름과 느슨한 JSON 형태 데이터로 들어옵니다.
//! 경계에서 한 번만 타입 있는 콜백으로 변환하고, 이후 로직은 타입만 다룹니다.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::payload::{
    DepthMarketData, InputOrder, Instrument, InvestorPosition, RspInfo, RspUserLogin, RtnOrder,
    RtnTrade, TradingAccount,
};
use crate::{KsgoldError, KsgoldResult};

/// 디코딩 전의 벤더 콜백.
#[derive(Debug, Clone)]
pub struct RawCallback {
    /// 콜백 이름 (예: "onRtnOrder")
    pub name: String,
    /// 콜백 데이터
    pub data: Value,
    /// 응답 정보 (`ErrorID`, `ErrorMsg`)
    pub error: Option<Value>,
    /// 요청 ID
    pub request_id: i32,
    /// 마지막 응답 여부
    pub last: bool,
}

impl RawCallback {
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
            error: None,
            request_id: 0,
            last: true,
        }
    }

    pub fn with_error(mut self, error: Value) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_request_id(mut self, request_id: i32) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_last(mut self, last: bool) -> Self {
        self.last = last;
        self
    }

    fn rsp_info(&self) -> KsgoldResult<RspInfo> {
        match &self.error {
            None | Some(Value::Null) => Ok(RspInfo::default()),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| KsgoldError::Decode(format!("{} error info: {}", self.name, e))),
        }
    }

    fn decode<T: DeserializeOwned>(&self) -> KsgoldResult<T> {
        serde_json::from_value(self.data.clone())
            .map_err(|e| KsgoldError::Decode(format!("{}: {}", self.name, e)))
    }

    /// 데이터가 비어 있으면 `None`.
    fn decode_opt<T: DeserializeOwned>(&self) -> KsgoldResult<Option<T>> {
        match &self.data {
            Value::Null => Ok(None),
            Value::Object(map) if map.is_empty() => Ok(None),
            _ => self.decode().map(Some),
        }
    }

    fn reason(&self) -> i32 {
        self.data
            .as_i64()
            .or_else(|| self.data.get("reason").and_then(Value::as_i64))
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or_default()
    }
}

/// 시세 API 콜백.
#[derive(Debug, Clone)]
pub enum MdCallback {
    FrontConnected,
    FrontDisconnected { reason: i32 },
    RspUserLogin { error: RspInfo },
    RspError { error: RspInfo },
    RspSubMarketData { error: RspInfo },
    DepthMarketData(Box<DepthMarketData>),
    /// 처리하지 않는 콜백
    Unhandled(String),
}

impl TryFrom<&RawCallback> for MdCallback {
    type Error = KsgoldError;

    fn try_from(raw: &RawCallback) -> Result<Self, Self::Error> {
        let callback = match raw.name.as_str() {
            "onFrontConnected" => MdCallback::FrontConnected,
            "onFrontDisconnected" => MdCallback::FrontDisconnected {
                reason: raw.reason(),
            },
            "onRspUserLogin" => MdCallback::RspUserLogin {
                error: raw.rsp_info()?,
            },
            "onRspError" => MdCallback::RspError {
                error: raw.rsp_info()?,
            },
            "onRspSubMarketData" => MdCallback::RspSubMarketData {
                error: raw.rsp_info()?,
            },
            "onRtnDepthMarketData" => MdCallback::DepthMarketData(Box::new(raw.decode()?)),
            other => MdCallback::Unhandled(other.to_string()),
        };
        Ok(callback)
    }
}

/// 거래 API 콜백.
#[derive(Debug, Clone)]
pub enum TdCallback {
    FrontConnected,
    FrontDisconnected {
        reason: i32,
    },
    RspUserLogin {
        data: RspUserLogin,
        error: RspInfo,
    },
    RspError {
        error: RspInfo,
    },
    RspOrderInsert {
        data: Option<InputOrder>,
        error: RspInfo,
    },
    RspOrderAction {
        error: RspInfo,
    },
    RspQryInvestorPosition {
        data: Option<InvestorPosition>,
        error: RspInfo,
    },
    RspQryTradingAccount {
        data: Option<TradingAccount>,
        error: RspInfo,
    },
    /// 페이지 데이터를 디코딩하지 못해도 `last`는 전달됩니다.
    RspQryInstrument {
        data: Option<Instrument>,
        decode_error: Option<String>,
        last: bool,
    },
    RtnOrder(RtnOrder),
    RtnTrade(RtnTrade),
    /// 처리하지 않는 콜백
    Unhandled(String),
}

impl TryFrom<&RawCallback> for TdCallback {
    type Error = KsgoldError;

    fn try_from(raw: &RawCallback) -> Result<Self, Self::Error> {
        let callback = match raw.name.as_str() {
            "onFrontConnected" => TdCallback::FrontConnected,
            "onFrontDisconnected" => TdCallback::FrontDisconnected {
                reason: raw.reason(),
            },
            "onRspUserLogin" => {
                let error = raw.rsp_info()?;
                // 실패 응답에는 세션 필드가 없음
                let data = if error.is_error() {
                    RspUserLogin::default()
                } else {
                    raw.decode_opt()?.unwrap_or_default()
                };
                TdCallback::RspUserLogin { data, error }
            }
            "onRspError" => TdCallback::RspError {
                error: raw.rsp_info()?,
            },
            "onRspOrderInsert" => TdCallback::RspOrderInsert {
                data: raw.decode_opt()?,
                error: raw.rsp_info()?,
            },
            "onRspOrderAction" => TdCallback::RspOrderAction {
                error: raw.rsp_info()?,
            },
            "onRspQryInvestorPosition" => {
                let error = raw.rsp_info()?;
                let data = if error.is_error() {
                    None
                } else {
                    raw.decode_opt()?
                };
                TdCallback::RspQryInvestorPosition { data, error }
            }
            "onRspQryTradingAccount" => TdCallback::RspQryTradingAccount {
                data: raw.decode_opt()?,
                error: raw.rsp_info()?,
            },
            "onRspQryInstrument" => {
                // 마지막 페이지를 잃으면 리졸버가 로드 상태로 넘어가지 못함
                let (data, decode_error) = match raw.decode_opt() {
                    Ok(data) => (data, None),
                    Err(e) => (None, Some(e.to_string())),
                };
                TdCallback::RspQryInstrument {
                    data,
                    decode_error,
                    last: raw.last,
                }
            }
            "onRtnOrder" => TdCallback::RtnOrder(raw.decode()?),
            "onRtnTrade" => TdCallback::RtnTrade(raw.decode()?),
            other => TdCallback::Unhandled(other.to_string()),
        };
        Ok(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_md_callbacks() {
        let raw = RawCallback::new("onFrontDisconnected", json!(4097));
        assert!(matches!(
            MdCallback::try_from(&raw).unwrap(),
            MdCallback::FrontDisconnected { reason: 4097 }
        ));

        let raw = RawCallback::new("onRspUserLogin", json!({}))
            .with_error(json!({"ErrorID": 0, "ErrorMsg": ""}));
        match MdCallback::try_from(&raw).unwrap() {
            MdCallback::RspUserLogin { error } => assert!(!error.is_error()),
            other => panic!("unexpected callback: {:?}", other),
        }

        let raw = RawCallback::new("onHeartBeatWarning", json!(30));
        assert!(matches!(
            MdCallback::try_from(&raw).unwrap(),
            MdCallback::Unhandled(name) if name == "onHeartBeatWarning"
        ));
    }

    #[test]
    fn test_failed_login_has_no_session() {
        let raw = RawCallback::new("onRspUserLogin", Value::Null)
            .with_error(json!({"ErrorID": 3, "ErrorMsg": "bad password"}));
        match TdCallback::try_from(&raw).unwrap() {
            TdCallback::RspUserLogin { data, error } => {
                assert_eq!(error.error_id, 3);
                assert_eq!(data.front_id, 0);
            }
            other => panic!("unexpected callback: {:?}", other),
        }
    }

    #[test]
    fn test_position_error_skips_data() {
        let raw = RawCallback::new("onRspQryInvestorPosition", json!({"garbage": true}))
            .with_error(json!({"ErrorID": 10001, "ErrorMsg": "no position"}));
        match TdCallback::try_from(&raw).unwrap() {
            TdCallback::RspQryInvestorPosition { data, error } => {
                assert!(data.is_none());
                assert_eq!(error.error_id, 10001);
            }
            other => panic!("unexpected callback: {:?}", other),
        }
    }

    #[test]
    fn test_undecodable_payload() {
        let raw = RawCallback::new("onRtnTrade", json!({"InstID": "AU9999"}));
        let err = TdCallback::try_from(&raw).unwrap_err();
        assert!(matches!(err, KsgoldError::Decode(ref msg) if msg.starts_with("onRtnTrade")));
    }

    #[test]
    fn test_instrument_page_flag() {
        let raw = RawCallback::new(
            "onRspQryInstrument",
            json!({"InstID": "AU9999", "Name": "黄金9999", "Unit": 1000, "Tick": 0.01, "MarketID": "00"}),
        )
        .with_last(false)
        .with_request_id(3);
        match TdCallback::try_from(&raw).unwrap() {
            TdCallback::RspQryInstrument {
                data,
                decode_error,
                last,
            } => {
                assert!(!last);
                assert!(decode_error.is_none());
                assert_eq!(data.unwrap().market_id, "00");
            }
            other => panic!("unexpected callback: {:?}", other),
        }
    }

    #[test]
    fn test_undecodable_instrument_page_keeps_last_flag() {
        let raw = RawCallback::new("onRspQryInstrument", json!({"Name": "x", "Unit": 1000}));
        match TdCallback::try_from(&raw).unwrap() {
            TdCallback::RspQryInstrument {
                data,
                decode_error,
                last,
            } => {
                assert!(last);
                assert!(data.is_none());
                assert!(decode_error.unwrap().starts_with("Decode error: onRspQryInstrument"));
            }
            other => panic!("unexpected callback: {:?}", other),
        }
    }
}
