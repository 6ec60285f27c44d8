//! Connection configuration for a node's JSON-RPC interface.

mod loader;

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use url::Url;

use crate::rpc::RpcError;

pub use loader::{get_default_config, init_config, load_configuration, load_configuration_with_env, write_config_to};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Matches the node's default `-rpcworkqueue`.
pub const DEFAULT_QUEUE_SIZE: usize = 16;

/// Where and how to reach the node. Immutable once a client is built from it.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    pub url: Url,
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Extra headers sent with every request. Names keep their case when read
    /// from the file; environment overrides arrive lowercased.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_queue_size() -> usize {
    DEFAULT_QUEUE_SIZE
}

impl ClientConfig {
    pub fn new(url: Url, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            url,
            username: username.into(),
            password: password.into(),
            headers: HashMap::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            queue_size: DEFAULT_QUEUE_SIZE,
            accept_invalid_certs: false,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), RpcError> {
        if !matches!(self.url.scheme(), "http" | "https") {
            return Err(RpcError::Config(format!(
                "unsupported url scheme '{}', expected http or https",
                self.url.scheme()
            )));
        }
        if self.username.trim().is_empty() {
            return Err(RpcError::Config("username must not be empty".to_string()));
        }
        if self.queue_size == 0 {
            return Err(RpcError::Config("queue_size must be at least 1".to_string()));
        }
        if self.queue_size > Semaphore::MAX_PERMITS {
            return Err(RpcError::Config(format!(
                "queue_size must be at most {}, got {}",
                Semaphore::MAX_PERMITS,
                self.queue_size
            )));
        }
        if self.timeout_secs == 0 {
            return Err(RpcError::Config("timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url.as_str())
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("timeout_secs", &self.timeout_secs)
            .field("queue_size", &self.queue_size)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new("http://127.0.0.1:8766".parse().unwrap(), "raven", "hunter2")
    }

    #[test]
    fn defaults() {
        let config = config();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.queue_size, 16);
        assert!(!config.accept_invalid_certs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn debug_hides_password() {
        let mut config = config();
        config.headers.insert("X-Api-Key".to_string(), "secret-value".to_string());
        let printed = format!("{config:?}");
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("secret-value"));
        assert!(printed.contains("<REDACTED>"));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut bad = config();
        bad.queue_size = 0;
        assert!(matches!(bad.validate(), Err(RpcError::Config(_))));

        let mut bad = config();
        bad.queue_size = usize::MAX;
        assert!(matches!(bad.validate(), Err(RpcError::Config(ref msg)) if msg.contains("queue_size")));

        let mut largest = config();
        largest.queue_size = Semaphore::MAX_PERMITS;
        assert!(largest.validate().is_ok());

        let mut bad = config();
        bad.username = " ".to_string();
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.url = "ftp://127.0.0.1".parse().unwrap();
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.timeout_secs = 0;
        assert!(bad.validate().is_err());
    }
}
