//! 설정 관리.
//!
//! 게이트웨이 접속 설정과 애플리케이션 설정을 정의합니다.
//! 설정은 TOML 파일에서 로드되며 `KSGOLD__*` 환경 변수로 덮어쓸 수 있습니다.

use crate::error::GatewayResult;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// 기본 게이트웨이 이름.
pub const DEFAULT_GATEWAY_NAME: &str = "KSGOLD";

/// 계좌 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// 은행 계좌
    Bank,
    /// 금 거래 계좌
    #[default]
    Gold,
}

impl AccountType {
    /// 벤더 로그인 요청의 `LoginType` 값을 반환합니다.
    pub fn login_type(&self) -> i32 {
        match self {
            AccountType::Bank => 1,
            AccountType::Gold => 2,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Bank => write!(f, "bank"),
            AccountType::Gold => write!(f, "gold"),
        }
    }
}

/// 게이트웨이 접속 설정.
///
/// 비밀번호는 `SecretString`으로 보관되며 `Debug` 출력에 노출되지 않습니다.
#[derive(Debug, Deserialize)]
pub struct GatewaySettings {
    /// 사용자 ID
    pub userid: String,
    /// 비밀번호
    #[serde(deserialize_with = "deserialize_secret")]
    pub password: SecretString,
    /// 계좌 유형
    #[serde(default)]
    pub account_type: AccountType,
    /// 거래 서버 주소
    pub td_address: String,
    /// 시세 서버 주소
    pub md_address: String,
    /// 벤더 흐름(flow) 파일 디렉토리
    #[serde(default = "default_flow_dir")]
    pub flow_dir: String,
    /// 상품 조회 재시도 간격 (밀리초)
    #[serde(default = "default_instrument_retry_interval_ms")]
    pub instrument_retry_interval_ms: u64,
    /// 조회 순환 타이머 임계값 (타이머 틱 수)
    #[serde(default = "default_poll_threshold")]
    pub poll_threshold: u32,
}

fn default_flow_dir() -> String {
    ".ksgold".to_string()
}

fn default_instrument_retry_interval_ms() -> u64 {
    1000
}

fn default_poll_threshold() -> u32 {
    2
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(SecretString::new(value.into_boxed_str()))
}

impl GatewaySettings {
    /// 새 설정을 생성합니다. 나머지 값은 기본값을 사용합니다.
    pub fn new(
        userid: impl Into<String>,
        password: impl Into<String>,
        td_address: impl Into<String>,
        md_address: impl Into<String>,
    ) -> Self {
        let password: String = password.into();
        Self {
            userid: userid.into(),
            password: SecretString::new(password.into_boxed_str()),
            account_type: AccountType::default(),
            td_address: td_address.into(),
            md_address: md_address.into(),
            flow_dir: default_flow_dir(),
            instrument_retry_interval_ms: default_instrument_retry_interval_ms(),
            poll_threshold: default_poll_threshold(),
        }
    }

    /// 계좌 유형을 설정합니다.
    pub fn with_account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = account_type;
        self
    }

    /// 흐름 파일 디렉토리를 설정합니다.
    pub fn with_flow_dir(mut self, flow_dir: impl Into<String>) -> Self {
        self.flow_dir = flow_dir.into();
        self
    }

    /// 상품 조회 재시도 간격을 설정합니다.
    pub fn with_instrument_retry_interval(mut self, interval: Duration) -> Self {
        self.instrument_retry_interval_ms = interval.as_millis() as u64;
        self
    }

    /// 조회 순환 임계값을 설정합니다.
    pub fn with_poll_threshold(mut self, threshold: u32) -> Self {
        self.poll_threshold = threshold;
        self
    }

    /// 비밀번호 평문을 반환합니다. 로그인 요청 생성 시에만 사용합니다.
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// 스킴이 붙은 거래 서버 주소.
    pub fn td_endpoint(&self) -> String {
        normalize_address(&self.td_address)
    }

    /// 스킴이 붙은 시세 서버 주소.
    pub fn md_endpoint(&self) -> String {
        normalize_address(&self.md_address)
    }

    /// 상품 조회 재시도 간격.
    pub fn instrument_retry_interval(&self) -> Duration {
        Duration::from_millis(self.instrument_retry_interval_ms)
    }

    /// 벤더 API 생성 시 전달할 흐름 파일 경로.
    pub fn flow_path(&self, suffix: &str) -> String {
        let dir = self.flow_dir.trim_end_matches(['/', '\\']);
        if dir.is_empty() {
            suffix.to_string()
        } else {
            format!("{}/{}", dir, suffix)
        }
    }
}

/// 서버 주소에 스킴을 붙입니다.
///
/// `tcp://` 또는 `ssl://`로 시작하지 않으면 `tcp://`를 붙입니다.
pub fn normalize_address(address: &str) -> String {
    let address = address.trim();
    if address.starts_with("tcp://") || address.starts_with("ssl://") {
        address.to_string()
    } else {
        format!("tcp://{}", address)
    }
}

/// 호스트 플랫폼이 접속 화면을 그릴 때 쓰는 기본 설정 템플릿.
///
/// (필드 이름, 기본값) 쌍의 목록입니다.
pub fn default_setting_template() -> Vec<(&'static str, String)> {
    vec![
        ("userid", String::new()),
        ("password", String::new()),
        ("account_type", AccountType::Gold.to_string()),
        ("td_address", String::new()),
        ("md_address", String::new()),
        ("flow_dir", default_flow_dir()),
    ]
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 애플리케이션 설정.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// 게이트웨이 이름
    #[serde(default = "default_gateway_name")]
    pub gateway_name: String,
    /// 게이트웨이 접속 설정
    pub gateway: GatewaySettings,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_gateway_name() -> String {
    DEFAULT_GATEWAY_NAME.to_string()
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> GatewayResult<Self> {
        let builder = config::Config::builder()
            .set_default("gateway_name", DEFAULT_GATEWAY_NAME)?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("KSGOLD")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> GatewayResult<Self> {
        Self::load("config/default.toml")
    }

    /// TOML 문자열에서 설정을 로드합니다.
    pub fn from_toml_str(content: &str) -> GatewayResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// `[logging]` 섹션으로 진단 로그를 초기화합니다.
    pub fn init_logging(&self) -> GatewayResult<()> {
        crate::logging::init_logging(&self.logging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [gateway]
        userid = "1001"
        password = "secret"
        account_type = "bank"
        td_address = "10.0.0.1:9001"
        md_address = "ssl://10.0.0.1:9002"
        instrument_retry_interval_ms = 250

        [logging]
        level = "debug"
        format = "json"
    "#;

    #[test]
    fn test_login_type() {
        assert_eq!(AccountType::Bank.login_type(), 1);
        assert_eq!(AccountType::Gold.login_type(), 2);
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("10.0.0.1:9001"), "tcp://10.0.0.1:9001");
        assert_eq!(normalize_address("tcp://10.0.0.1:9001"), "tcp://10.0.0.1:9001");
        assert_eq!(normalize_address("ssl://10.0.0.1:9001"), "ssl://10.0.0.1:9001");
    }

    #[test]
    fn test_from_toml_str() {
        let config = AppConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.gateway_name, DEFAULT_GATEWAY_NAME);
        assert_eq!(config.gateway.userid, "1001");
        assert_eq!(config.gateway.password(), "secret");
        assert_eq!(config.gateway.account_type, AccountType::Bank);
        assert_eq!(config.gateway.td_endpoint(), "tcp://10.0.0.1:9001");
        assert_eq!(config.gateway.md_endpoint(), "ssl://10.0.0.1:9002");
        assert_eq!(
            config.gateway.instrument_retry_interval(),
            Duration::from_millis(250)
        );
        assert_eq!(config.gateway.poll_threshold, 2);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_missing_gateway_section() {
        let err = AppConfig::from_toml_str("[logging]\nlevel = \"info\"\nformat = \"pretty\"").unwrap_err();
        assert!(matches!(err, crate::GatewayError::Config(_)));
    }

    #[test]
    fn test_password_not_in_debug() {
        let settings = GatewaySettings::new("1001", "hunter2", "a:1", "b:2");
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_flow_path() {
        let settings = GatewaySettings::new("1001", "pw", "a:1", "b:2").with_flow_dir("/tmp/ks/");
        assert_eq!(settings.flow_path("Td"), "/tmp/ks/Td");
        assert_eq!(settings.with_flow_dir("").flow_path("Md"), "Md");
    }

    #[test]
    fn test_setting_template() {
        let template = default_setting_template();
        assert!(template.iter().any(|(k, v)| *k == "account_type" && v == "gold"));
    }
}
