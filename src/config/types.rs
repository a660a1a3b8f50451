//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::{
    default_ident, default_max_line_len, default_nick, default_port, default_realname,
    default_retry_backoff_secs, default_status_poll_millis,
};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Client configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Identity used for every server unless overridden.
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Connection engine tuning.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Output formatting.
    #[serde(default)]
    pub display: DisplayConfig,
    /// One entry per server connection.
    #[serde(default, rename = "server")]
    pub servers: Vec<ServerEntry>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve every `[[server]]` entry against the identity defaults.
    pub fn connections(&self) -> Vec<ConnectionConfig> {
        self.servers
            .iter()
            .map(|server| server.resolve(&self.identity))
            .collect()
    }
}

/// Registration identity (NICK / USER parameters).
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_nick")]
    pub nick: String,
    #[serde(default = "default_ident")]
    pub ident: String,
    #[serde(default = "default_realname")]
    pub realname: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            nick: default_nick(),
            ident: default_ident(),
            realname: default_realname(),
        }
    }
}

/// A `[[server]]` block.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerEntry {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub nick: Option<String>,
    pub ident: Option<String>,
    pub realname: Option<String>,
}

impl ServerEntry {
    fn resolve(&self, identity: &IdentityConfig) -> ConnectionConfig {
        ConnectionConfig {
            host: self.host.clone(),
            port: self.port,
            nick: self.nick.clone().unwrap_or_else(|| identity.nick.clone()),
            ident: self.ident.clone().unwrap_or_else(|| identity.ident.clone()),
            realname: self
                .realname
                .clone()
                .unwrap_or_else(|| identity.realname.clone()),
        }
    }
}

/// Everything one engine needs to reach and register with a server.
///
/// Built once before the engine starts and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub nick: String,
    pub ident: String,
    pub realname: String,
}

impl ConnectionConfig {
    /// Connection to `host` on the default port with the default identity.
    pub fn new(host: impl Into<String>) -> Self {
        let identity = IdentityConfig::default();
        Self {
            host: host.into(),
            port: default_port(),
            nick: identity.nick,
            ident: identity.ident,
            realname: identity.realname,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_identity(
        mut self,
        nick: impl Into<String>,
        ident: impl Into<String>,
        realname: impl Into<String>,
    ) -> Self {
        self.nick = nick.into();
        self.ident = ident.into();
        self.realname = realname.into();
        self
    }
}

/// Connection engine timing and recovery policy.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Seconds to wait between failed connection attempts (default: 5).
    #[serde(default = "default_retry_backoff_secs")]
    pub retry_backoff_secs: u64,

    /// Milliseconds between state machine ticks (default: 1000).
    #[serde(default = "default_status_poll_millis")]
    pub status_poll_millis: u64,

    /// Give up after this many failed attempts. Unbounded when unset.
    #[serde(default)]
    pub max_connect_attempts: Option<u32>,

    /// Reconnect when an established connection faults (default: false).
    ///
    /// When false the engine stops after reporting the fault.
    #[serde(default)]
    pub reconnect_on_fault: bool,

    /// Longest accepted server line in bytes (default: 512).
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,

    /// Abort a single connection attempt after this many seconds.
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retry_backoff_secs: default_retry_backoff_secs(),
            status_poll_millis: default_status_poll_millis(),
            max_connect_attempts: None,
            reconnect_on_fault: false,
            max_line_len: default_max_line_len(),
            connect_timeout_secs: None,
        }
    }
}

impl EngineConfig {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_secs(self.retry_backoff_secs)
    }

    pub fn status_poll(&self) -> Duration {
        Duration::from_millis(self.status_poll_millis)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }
}

/// Output formatting for the terminal front end.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    /// Prefix each displayed line with a local `HH:MM:SS` stamp.
    #[serde(default)]
    pub timestamps: bool,
}
