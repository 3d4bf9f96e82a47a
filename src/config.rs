use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://restapi.spypoint.com/api/v3";

#[derive(Deserialize, Serialize, Clone)]
pub struct Config {
    pub username: String,
    pub password: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Config {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Config {
            username: username.into(),
            password: password.into(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let username = env::var("SPYPOINT_USERNAME").context("SPYPOINT_USERNAME is not set")?;
        let password = env::var("SPYPOINT_PASSWORD").context("SPYPOINT_PASSWORD is not set")?;
        let base_url = env::var("SPYPOINT_BASE_URL").unwrap_or_else(|_| default_base_url());

        let request_timeout_secs = get_env_var_u64("REQUEST_TIMEOUT_SECS", default_request_timeout_secs());
        let poll_interval_secs = get_env_var_u64("POLL_INTERVAL_SECS", default_poll_interval_secs());

        Config {
            username,
            password,
            base_url,
            request_timeout_secs,
            poll_interval_secs,
        }
        .validate()
    }

    fn get_config_file_path() -> PathBuf {
        let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(config_dir).join("spypoint_config.json")
    }

    pub fn load_from_file() -> Result<Self> {
        let config_file_path = Self::get_config_file_path();
        let contents = fs::read_to_string(&config_file_path)
            .with_context(|| format!("reading {}", config_file_path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", config_file_path.display()))?;
        config.validate()
    }

    /// Rejects intervals the HTTP client and poll timer cannot run with.
    pub fn validate(self) -> Result<Self> {
        ensure!(self.poll_interval_secs > 0, "poll_interval_secs must be at least 1");
        ensure!(self.request_timeout_secs > 0, "request_timeout_secs must be at least 1");
        Ok(self)
    }
}

// Keeps the password out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &"***")
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_secs() -> u64 {
    300
}

fn get_env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|val| val.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_defaults() {
        let config: Config = serde_json::from_str(r#"{"username": "u", "password": "p"}"#).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.poll_interval_secs, 300);
    }

    #[test]
    fn test_zero_intervals_are_rejected() {
        let config: Config =
            serde_json::from_str(r#"{"username": "u", "password": "p", "poll_interval_secs": 0}"#).unwrap();
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("poll_interval_secs"));

        let mut config = Config::new("u", "p");
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        assert!(Config::new("u", "p").validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", Config::new("user", "hunter2"));
        assert!(rendered.contains("user"));
        assert!(!rendered.contains("hunter2"));
    }
}
