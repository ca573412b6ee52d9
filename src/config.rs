//! Client configuration.
//!
//! [`ClientConfig`] is an immutable value handed to the client at
//! construction. It can be built in code or loaded from TOML:
//!
//! ```toml
//! connection_timeout = 30   # seconds
//! callback_timeout = 60     # seconds without a line before an idle callback
//! verbose_log = true
//! log_raw_sockets = false
//! ctcp_version_reply = "mybot 1.0"
//! accept_invalid_certs = false
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Reply sent for CTCP VERSION unless configured otherwise.
pub const DEFAULT_VERSION_REPLY: &str =
    concat!("slirc-client ", env!("CARGO_PKG_VERSION"), " :: https://github.com/sid3xyz/slirc-client");

fn default_connection_timeout() -> u64 {
    30
}

fn default_callback_timeout() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_version_reply() -> String {
    DEFAULT_VERSION_REPLY.to_string()
}

/// Options recognized by the client.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Deadline for TCP connect plus TLS handshake, in seconds.
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
    /// Seconds without an inbound line before the handler gets an idle call.
    #[serde(default = "default_callback_timeout")]
    pub callback_timeout: u64,
    /// Emit lifecycle logs (connect, registration, CTCP, disconnect).
    #[serde(default = "default_true")]
    pub verbose_log: bool,
    /// Echo every wire line in both directions.
    #[serde(default)]
    pub log_raw_sockets: bool,
    /// Text sent in reply to CTCP VERSION.
    #[serde(default = "default_version_reply")]
    pub ctcp_version_reply: String,
    /// Skip TLS certificate verification (self-signed servers).
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connection_timeout: default_connection_timeout(),
            callback_timeout: default_callback_timeout(),
            verbose_log: true,
            log_raw_sockets: false,
            ctcp_version_reply: default_version_reply(),
            accept_invalid_certs: false,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde can't reject on its own.
    ///
    /// Both timeouts must be at least one second: a zero connect deadline
    /// fails every dial, and a zero callback timeout spins the idle handler.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connection_timeout == 0 {
            return Err(ConfigError::ZeroTimeout("connection_timeout"));
        }
        if self.callback_timeout == 0 {
            return Err(ConfigError::ZeroTimeout("callback_timeout"));
        }
        Ok(())
    }

    /// Connect deadline as a [`Duration`].
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout)
    }

    /// Idle read timeout as a [`Duration`].
    pub fn callback_timeout(&self) -> Duration {
        Duration::from_secs(self.callback_timeout)
    }
}

/// Who the client registers as.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ClientIdentity {
    /// Nickname.
    pub nick: String,
    /// Username (ident).
    pub ident: String,
    /// Real name / GECOS.
    pub gecos: String,
}

impl ClientIdentity {
    /// Create an identity from its three parts.
    pub fn new(nick: impl Into<String>, ident: impl Into<String>, gecos: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            ident: ident.into(),
            gecos: gecos.into(),
        }
    }
}
