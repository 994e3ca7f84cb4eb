//! 연결 세션 상태 머신.
//!
//! 시세/거래 세션은 각각 하나의 상태 머신을 가집니다:
//! `Disconnected → Connecting → Connected → LoggedIn | LoginFailed`
//!
//! 재연결 자체는 벤더 API가 담당하며, 세션은 연결 끊김 시 로그인 상태만 되돌립니다.

use ksgold_core::GatewaySettings;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use super::payload::ReqUserLogin;

/// 세션 연결 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// 연결 전
    #[default]
    Disconnected,
    /// API 초기화 요청됨
    Connecting,
    /// 프론트 연결됨 (자동 로그인 진행)
    Connected,
    /// 로그인 완료
    LoggedIn,
    /// 로그인 실패
    LoginFailed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionStatus::Disconnected => "disconnected",
            SessionStatus::Connecting => "connecting",
            SessionStatus::Connected => "connected",
            SessionStatus::LoggedIn => "logged_in",
            SessionStatus::LoginFailed => "login_failed",
        };
        write!(f, "{}", label)
    }
}

/// 로그인 자격증명.
#[derive(Debug)]
pub struct Credentials {
    /// 사용자 ID
    pub userid: String,
    password: SecretString,
    /// 벤더 로그인 유형 (은행 1, 금 계좌 2)
    pub login_type: i32,
}

impl Credentials {
    pub fn new(userid: impl Into<String>, password: &str, login_type: i32) -> Self {
        Self {
            userid: userid.into(),
            password: SecretString::new(password.into()),
            login_type,
        }
    }

    pub fn from_settings(settings: &GatewaySettings) -> Self {
        Self::new(
            settings.userid.clone(),
            settings.password(),
            settings.account_type.login_type(),
        )
    }

    /// 벤더 로그인 요청을 생성합니다.
    pub fn login_request(&self) -> ReqUserLogin {
        ReqUserLogin {
            account_id: self.userid.clone(),
            password: self.password.expose_secret().to_string(),
            login_type: self.login_type,
        }
    }
}

/// 시세/거래 세션 공통 상태.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub status: SessionStatus,
    /// 벤더 API 생성 여부 (중복 생성 금지)
    pub api_created: bool,
    pub credentials: Option<Credentials>,
    request_id: i32,
}

impl SessionState {
    pub fn next_request_id(&mut self) -> i32 {
        self.request_id += 1;
        self.request_id
    }

    pub fn is_logged_in(&self) -> bool {
        self.status == SessionStatus::LoggedIn
    }

    pub fn mark_connecting(&mut self) {
        self.api_created = true;
        self.status = SessionStatus::Connecting;
    }

    /// 프론트 연결 시. 로그인 실패 상태는 유지합니다.
    pub fn mark_front_connected(&mut self) {
        if self.status != SessionStatus::LoginFailed {
            self.status = SessionStatus::Connected;
        }
    }

    /// 연결 끊김 시 로그인 상태를 되돌립니다.
    pub fn mark_disconnected(&mut self) {
        if self.status != SessionStatus::LoginFailed {
            self.status = SessionStatus::Disconnected;
        }
    }

    pub fn mark_login(&mut self, success: bool) {
        self.status = if success {
            SessionStatus::LoggedIn
        } else {
            SessionStatus::LoginFailed
        };
    }

    /// 로그인 요청을 만들고 요청 ID를 할당합니다. 자격증명이 없으면 `None`.
    pub fn prepare_login(&mut self) -> Option<(ReqUserLogin, i32)> {
        let req = self.credentials.as_ref()?.login_request();
        Some((req, self.next_request_id()))
    }
}
