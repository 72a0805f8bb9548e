//! Server runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the services. Request
//! handlers never read environment variables. The `*_from_env_value` helpers take the raw
//! optional strings so they can be tested without touching the process environment.

use crate::constants::{DEFAULT_BIND_HOST, DEFAULT_PORT, DEFAULT_WEBHOOK_TIMEOUT_SECS};
use crate::{SubmissionError, SubmissionResult};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

/// Environment/mode flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Development,
    Production,
}

impl RunMode {
    pub fn is_production(&self) -> bool {
        matches!(self, RunMode::Production)
    }
}

impl FromStr for RunMode {
    type Err = SubmissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(RunMode::Development),
            "production" | "prod" => Ok(RunMode::Production),
            other => Err(SubmissionError::InvalidConfig(format!(
                "unknown run mode '{other}' (expected 'development' or 'production')"
            ))),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Development => f.write_str("development"),
            RunMode::Production => f.write_str("production"),
        }
    }
}

/// Server configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    bind_addr: SocketAddr,
    webhook_url: Option<String>,
    mode: RunMode,
    webhook_timeout: Duration,
}

impl ServerConfig {
    /// Create a new `ServerConfig`.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::InvalidConfig` if `webhook_url` is present but is not an
    /// absolute http(s) URL.
    pub fn new(
        bind_addr: SocketAddr,
        webhook_url: Option<String>,
        mode: RunMode,
        webhook_timeout: Duration,
    ) -> SubmissionResult<Self> {
        let webhook_url = webhook_url_from_env_value(webhook_url)?;

        Ok(Self {
            bind_addr,
            webhook_url,
            mode,
            webhook_timeout,
        })
    }

    /// Reads `WEBHOOK_URL`, `TOURDESK_BIND`, `PORT`, `TOURDESK_ENV` and
    /// `WEBHOOK_TIMEOUT_SECS`.
    pub fn from_env() -> SubmissionResult<Self> {
        let bind_addr = bind_addr_from_env_values(
            std::env::var("TOURDESK_BIND").ok(),
            std::env::var("PORT").ok(),
        )?;
        let mode = run_mode_from_env_value(std::env::var("TOURDESK_ENV").ok())?;
        let webhook_timeout =
            webhook_timeout_from_env_value(std::env::var("WEBHOOK_TIMEOUT_SECS").ok())?;

        Self::new(
            bind_addr,
            std::env::var("WEBHOOK_URL").ok(),
            mode,
            webhook_timeout,
        )
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url.as_deref()
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn webhook_timeout(&self) -> Duration {
        self.webhook_timeout
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the forwarding URL. Blank or missing means forwarding is off.
pub fn webhook_url_from_env_value(value: Option<String>) -> SubmissionResult<Option<String>> {
    let Some(raw) = non_blank(value) else {
        return Ok(None);
    };

    let url = reqwest::Url::parse(&raw)
        .map_err(|e| SubmissionError::InvalidConfig(format!("WEBHOOK_URL is not a URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SubmissionError::InvalidConfig(format!(
            "WEBHOOK_URL must use http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(Some(raw))
}

/// Parse host and port into a socket address, defaulting to `0.0.0.0:3000`.
pub fn bind_addr_from_env_values(
    host: Option<String>,
    port: Option<String>,
) -> SubmissionResult<SocketAddr> {
    let host = non_blank(host).unwrap_or_else(|| DEFAULT_BIND_HOST.to_string());
    let ip: IpAddr = host
        .parse()
        .map_err(|_| SubmissionError::InvalidConfig(format!("invalid bind host '{host}'")))?;

    let port = match non_blank(port) {
        Some(port) => port
            .parse::<u16>()
            .map_err(|_| SubmissionError::InvalidConfig(format!("invalid PORT '{port}'")))?,
        None => DEFAULT_PORT,
    };

    Ok(SocketAddr::new(ip, port))
}

/// Parse the run mode, defaulting to development.
pub fn run_mode_from_env_value(value: Option<String>) -> SubmissionResult<RunMode> {
    non_blank(value)
        .map(|v| v.parse::<RunMode>())
        .transpose()
        .map(Option::unwrap_or_default)
}

/// Parse the webhook timeout in whole seconds, defaulting to 30.
pub fn webhook_timeout_from_env_value(value: Option<String>) -> SubmissionResult<Duration> {
    let secs = match non_blank(value) {
        Some(v) => v.parse::<u64>().map_err(|_| {
            SubmissionError::InvalidConfig(format!("invalid WEBHOOK_TIMEOUT_SECS '{v}'"))
        })?,
        None => DEFAULT_WEBHOOK_TIMEOUT_SECS,
    };

    if secs == 0 {
        return Err(SubmissionError::InvalidConfig(
            "WEBHOOK_TIMEOUT_SECS must be greater than zero".into(),
        ));
    }

    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_url_blank_means_disabled() {
        assert_eq!(webhook_url_from_env_value(None).unwrap(), None);
        assert_eq!(webhook_url_from_env_value(Some("  ".into())).unwrap(), None);
    }

    #[test]
    fn test_webhook_url_requires_http_scheme() {
        assert_eq!(
            webhook_url_from_env_value(Some(" https://n8n.example.com/webhook/tour ".into()))
                .unwrap()
                .as_deref(),
            Some("https://n8n.example.com/webhook/tour")
        );
        assert!(webhook_url_from_env_value(Some("ftp://example.com".into())).is_err());
        assert!(webhook_url_from_env_value(Some("not a url".into())).is_err());
    }

    #[test]
    fn test_bind_addr_defaults_and_overrides() {
        assert_eq!(
            bind_addr_from_env_values(None, None).unwrap(),
            "0.0.0.0:3000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            bind_addr_from_env_values(Some("127.0.0.1".into()), Some("8080".into())).unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
        assert!(bind_addr_from_env_values(None, Some("99999".into())).is_err());
        assert!(bind_addr_from_env_values(Some("localhost:1".into()), None).is_err());
    }

    #[test]
    fn test_run_mode_parsing() {
        assert_eq!(run_mode_from_env_value(None).unwrap(), RunMode::Development);
        assert_eq!(
            run_mode_from_env_value(Some("Production".into())).unwrap(),
            RunMode::Production
        );
        assert!(run_mode_from_env_value(Some("staging".into())).is_err());
        assert_eq!(RunMode::Production.to_string(), "production");
    }

    #[test]
    fn test_webhook_timeout_parsing() {
        assert_eq!(
            webhook_timeout_from_env_value(None).unwrap(),
            Duration::from_secs(30)
        );
        assert_eq!(
            webhook_timeout_from_env_value(Some("5".into())).unwrap(),
            Duration::from_secs(5)
        );
        assert!(webhook_timeout_from_env_value(Some("0".into())).is_err());
        assert!(webhook_timeout_from_env_value(Some("soon".into())).is_err());
    }

    #[test]
    fn test_server_config_rejects_bad_url() {
        let result = ServerConfig::new(
            "127.0.0.1:3000".parse().unwrap(),
            Some("mailto:ops@example.com".into()),
            RunMode::Development,
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(SubmissionError::InvalidConfig(_))));
    }
}
