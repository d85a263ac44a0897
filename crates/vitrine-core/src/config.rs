//! Configuration module
//!
//! Console settings are read once from the environment and injected into the
//! API client and the access gate at construction time.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_ACCESS_FILE: &str = ".vitrine_access";

#[derive(Clone, Debug)]
pub struct ConsoleConfig {
    /// Base URL every persistence and upload path is joined onto
    pub api_url: String,
    /// Request timeout; `None` keeps the transport default
    pub request_timeout: Option<Duration>,
    /// Passcode unlocking the console; `None` leaves the gate open
    pub passcode: Option<String>,
    /// Where the obfuscated unlock flag is kept
    pub access_file: PathBuf,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: None,
            passcode: None,
            access_file: PathBuf::from(DEFAULT_ACCESS_FILE),
        }
    }
}

impl ConsoleConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_url(&api_url.into()),
            ..Self::default()
        }
    }

    /// Load from VITRINE_API_URL (or API_URL), VITRINE_REQUEST_TIMEOUT_SECS,
    /// VITRINE_PASSCODE and VITRINE_ACCESS_FILE. Reads a `.env` file if present.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let api_url = env::var("VITRINE_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let request_timeout = match env::var("VITRINE_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid VITRINE_REQUEST_TIMEOUT_SECS: {}", raw))?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        let passcode = env::var("VITRINE_PASSCODE")
            .ok()
            .filter(|value| !value.is_empty());

        let access_file = env::var("VITRINE_ACCESS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ACCESS_FILE));

        let config = Self {
            api_url: normalize_url(&api_url),
            request_timeout,
            passcode,
            access_file,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            bail!(
                "VITRINE_API_URL must start with http:// or https:// (got {})",
                self.api_url
            );
        }
        if self.request_timeout == Some(Duration::ZERO) {
            bail!("VITRINE_REQUEST_TIMEOUT_SECS must be greater than zero");
        }
        if self.access_file.as_os_str().is_empty() {
            bail!("VITRINE_ACCESS_FILE must not be empty");
        }
        Ok(())
    }

    pub fn with_passcode(mut self, passcode: impl Into<String>) -> Self {
        self.passcode = Some(passcode.into());
        self
    }

    pub fn with_access_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.access_file = path.into();
        self
    }
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_trailing_slash() {
        let config = ConsoleConfig::new("https://api.example.com/api/");
        assert_eq!(config.api_url, "https://api.example.com/api");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_http_url() {
        let config = ConsoleConfig::new("ftp://example.com");
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = ConsoleConfig::default();
        config.request_timeout = Some(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_leaves_gate_open() {
        let config = ConsoleConfig::default();
        assert!(config.passcode.is_none());
        assert!(config.request_timeout.is_none());
    }
}
