//! Error types for the IRC client.
//!
//! This module defines the error types for configuration problems,
//! connection failures, wire-format parse failures and session I/O.

use std::time::Duration;

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Errors in the configuration handed to the client.
///
/// These are fatal: a client that fails configuration never connects.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The connection URI does not have a `scheme://host:port` shape.
    #[error("malformed URI: {0}")]
    MalformedUri(String),

    /// The `host:port` segment did not split into exactly two tokens.
    #[error("malformed host:port segment: {0}")]
    MalformedHostPort(String),

    /// The port token was empty, non-numeric or out of range.
    #[error("invalid port: {0}")]
    InvalidPort(String),

    /// A timeout option was set to zero seconds.
    #[error("{0} must be at least one second")]
    ZeroTimeout(&'static str),

    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`ClientConfig`](crate::ClientConfig).
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors opening the connection to the server.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConnectError {
    /// TCP connect (and TLS handshake) did not finish in time.
    #[error("connection to {addr} timed out after {timeout:?}")]
    Timeout {
        /// The `host:port` that was dialed.
        addr: String,
        /// The configured connect deadline.
        timeout: Duration,
    },

    /// The TCP connection could not be established.
    #[error("failed to connect to {addr}: {source}")]
    Io {
        /// The `host:port` that was dialed.
        addr: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The host is not usable as a TLS server name.
    #[error("invalid TLS server name: {0}")]
    InvalidServerName(String),

    /// The TLS handshake failed.
    #[error("TLS handshake with {addr} failed: {source}")]
    Tls {
        /// The `host:port` that was dialed.
        addr: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the registration lines failed.
    #[error("failed to send registration: {0}")]
    Register(#[source] ProtocolError),
}

/// Errors during an established session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors encountered when decoding an inbound IRC line.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// The line was empty once the terminator was removed.
    #[error("empty message")]
    EmptyMessage,

    /// Fewer than a prefix, a command and one parameter were found.
    #[error("malformed message: expected at least 3 tokens, got {got}")]
    Malformed {
        /// Number of tokens actually found.
        got: usize,
    },
}
