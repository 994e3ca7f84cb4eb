//! 게이트웨이 진단 로그(`tracing`) 초기화.
//!
//! 설정 파일의 `[logging]` 섹션(`level`, `format`)으로 전역 subscriber를 설치합니다.
//! `RUST_LOG`가 설정돼 있으면 `level`보다 우선합니다.
//!
//! 호스트 플랫폼에 보이는 로그는 이와 별개로 게이트웨이 이벤트(`Log`)로 발행됩니다.
//!
//! ```no_run
//! use ksgold_core::AppConfig;
//!
//! let config = AppConfig::load_default()?;
//! config.init_logging()?;
//! # Ok::<(), ksgold_core::GatewayError>(())
//! ```

use crate::config::LoggingConfig;
use crate::error::{GatewayError, GatewayResult};
use std::str::FromStr;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `logging.format` 값.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 파일/줄 번호가 포함된 여러 줄 형식 (개발용)
    #[default]
    Pretty,
    /// 로그 수집기용 JSON
    Json,
    /// 한 줄 형식
    Compact,
}

impl FromStr for LogFormat {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(GatewayError::Config(format!("알 수 없는 로그 형식: {}", s))),
        }
    }
}

/// `logging.level` 값을 필터로 변환합니다 (예: "info", "ksgold_gateway=debug").
pub fn level_filter(level: &str) -> GatewayResult<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| GatewayError::Config(format!("로그 레벨 '{}': {}", level, e)))
}

/// 전역 로그 subscriber를 설치합니다. 프로세스에서 한 번만 성공합니다.
pub fn init_logging(config: &LoggingConfig) -> GatewayResult<()> {
    let format: LogFormat = config.format.parse()?;
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(&config.level)?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_file(true).with_line_number(true))
            .try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
    };
    installed.map_err(|e| GatewayError::Config(format!("로깅 초기화 실패: {}", e)))?;

    tracing::info!(format = ?format, level = %config.level, "로깅 초기화 완료");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logging(level: &str, format: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
            format: format.to_string(),
        }
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!(" JSON ".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!(matches!(
            "xml".parse::<LogFormat>(),
            Err(GatewayError::Config(_))
        ));
    }

    #[test]
    fn test_level_filter() {
        assert!(level_filter("info").is_ok());
        assert!(level_filter("ksgold_gateway=debug,warn").is_ok());
        assert!(level_filter("ksgold_gateway=loud").is_err());
    }

    #[test]
    fn test_unknown_format_rejected_before_install() {
        let err = init_logging(&logging("info", "xml")).unwrap_err();
        assert!(err.to_string().contains("xml"));
    }

    #[test]
    fn test_init_from_app_config_once() {
        let config = crate::AppConfig::from_toml_str(
            r#"
            [gateway]
            userid = "1001"
            password = "pw"
            td_address = "127.0.0.1:9001"
            md_address = "127.0.0.1:9002"

            [logging]
            level = "debug"
            format = "compact"
            "#,
        )
        .unwrap();

        assert!(config.init_logging().is_ok());
        assert!(matches!(
            config.init_logging(),
            Err(GatewayError::Config(_))
        ));
    }
}
