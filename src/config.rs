use crate::application::notification::SweepGuard;
use crate::domain::{EmailAddress, EmailAddressError};
use std::time::Duration;
use thiserror::Error;

/// 1日（延滞走査のデフォルト間隔）
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// 設定読み込みのエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 値の形式が不正
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    /// 送信元アドレスが不正
    #[error("Invalid DEFAULT_FROM_EMAIL")]
    InvalidSender(#[source] EmailAddressError),
}

/// SMTPリレーの接続設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// アプリケーション設定
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub from_email: EmailAddress,
    pub smtp: SmtpConfig,
    pub sweep_interval: Duration,
    pub sweep_guard: SweepGuard,
    pub port: u16,
}

impl AppConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// 未設定の項目にはデフォルト値を使う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "postgres://localhost/library".into());

        let from_email = EmailAddress::parse(
            lookup("DEFAULT_FROM_EMAIL").unwrap_or_else(|| "webmaster@localhost".into()),
        )
        .map_err(ConfigError::InvalidSender)?;

        let smtp = SmtpConfig {
            host: lookup("SMTP_HOST").unwrap_or_else(|| "localhost".into()),
            port: parse_or("SMTP_PORT", lookup("SMTP_PORT"), 25)?,
            username: lookup("SMTP_USERNAME"),
            password: lookup("SMTP_PASSWORD"),
        };

        let interval_secs: u64 = parse_or(
            "OVERDUE_SWEEP_INTERVAL_SECS",
            lookup("OVERDUE_SWEEP_INTERVAL_SECS"),
            DEFAULT_SWEEP_INTERVAL_SECS,
        )?;
        if interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "OVERDUE_SWEEP_INTERVAL_SECS",
                value: "0".into(),
            });
        }

        let sweep_guard = parse_or(
            "OVERDUE_SWEEP_GUARD",
            lookup("OVERDUE_SWEEP_GUARD"),
            SweepGuard::Legacy,
        )?;

        let port = parse_or("PORT", lookup("PORT"), 3000)?;

        Ok(Self {
            database_url,
            from_email,
            smtp,
            sweep_interval: Duration::from_secs(interval_secs),
            sweep_guard,
            port,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, "postgres://localhost/library");
        assert_eq!(config.from_email.as_str(), "webmaster@localhost");
        assert_eq!(config.smtp.host, "localhost");
        assert_eq!(config.smtp.port, 25);
        assert_eq!(config.smtp.username, None);
        assert_eq!(config.sweep_interval, Duration::from_secs(86_400));
        assert_eq!(config.sweep_guard, SweepGuard::Legacy);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DEFAULT_FROM_EMAIL", "library@example.com"),
            ("SMTP_HOST", "mail.example.com"),
            ("SMTP_PORT", "2525"),
            ("SMTP_USERNAME", "library"),
            ("SMTP_PASSWORD", "secret"),
            ("OVERDUE_SWEEP_INTERVAL_SECS", "3600"),
            ("OVERDUE_SWEEP_GUARD", "corrected"),
            ("PORT", "8080"),
        ])
        .unwrap();

        assert_eq!(config.from_email.as_str(), "library@example.com");
        assert_eq!(config.smtp.host, "mail.example.com");
        assert_eq!(config.smtp.port, 2525);
        assert_eq!(config.smtp.username.as_deref(), Some("library"));
        assert_eq!(config.smtp.password.as_deref(), Some("secret"));
        assert_eq!(config.sweep_interval, Duration::from_secs(3600));
        assert_eq!(config.sweep_guard, SweepGuard::Corrected);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_sender() {
        let result = config_from(&[("DEFAULT_FROM_EMAIL", "not-an-address")]);
        assert!(matches!(result, Err(ConfigError::InvalidSender(_))));
    }

    #[test]
    fn test_invalid_numbers() {
        let result = config_from(&[("SMTP_PORT", "seventy")]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                name: "SMTP_PORT",
                ..
            })
        ));

        let result = config_from(&[("OVERDUE_SWEEP_INTERVAL_SECS", "0")]);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_invalid_guard() {
        let result = config_from(&[("OVERDUE_SWEEP_GUARD", "inverted")]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                name: "OVERDUE_SWEEP_GUARD",
                ..
            })
        ));
    }
}
