//! Connection URI parsing.
//!
//! An IRC URI names the server, whether to use TLS, and the channels to
//! join once registration completes:
//!
//! ```text
//! irc://host:[+]port[/chan1,chan2,...]
//! ```
//!
//! A `+` before the port selects TLS. Channel tokens are bare names; the
//! `#` prefix is implied.
//!
//! # Example
//!
//! ```
//! use slirc_client::EndpointDescriptor;
//!
//! let ep: EndpointDescriptor = "irc://irc.example.net:+6697/foo,bar".parse().unwrap();
//! assert_eq!(ep.host, "irc.example.net");
//! assert_eq!(ep.port, 6697);
//! assert!(ep.use_tls);
//! assert_eq!(ep.initial_channels, vec!["#foo", "#bar"]);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Where to connect and what to join.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointDescriptor {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Whether the connection is wrapped in TLS.
    pub use_tls: bool,
    /// Channels to join after registration, `#`-prefixed, in URI order.
    pub initial_channels: Vec<String>,
}

impl EndpointDescriptor {
    /// Parse a connection URI.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the URI has no `host:port` segment, the
    /// segment does not split into exactly two tokens, or the port is not a
    /// valid number.
    pub fn parse(uri: &str) -> Result<Self, ConfigError> {
        let segments: Vec<&str> = uri.split('/').collect();
        if segments.len() < 3 {
            return Err(ConfigError::MalformedUri(uri.to_owned()));
        }

        let host_port = segments[2];
        let (host, port) = match host_port.split(':').collect::<Vec<_>>()[..] {
            [host, port] if !host.is_empty() => (host, port),
            _ => return Err(ConfigError::MalformedHostPort(host_port.to_owned())),
        };

        let (port, use_tls) = match port.strip_prefix('+') {
            Some(rest) => (rest, true),
            None => (port, false),
        };
        let port = port
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(port.to_owned()))?;

        let initial_channels = segments
            .get(3)
            .map(|list| {
                list.split(',')
                    .filter(|chan| !chan.is_empty())
                    .map(|chan| format!("#{}", chan))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: host.to_owned(),
            port,
            use_tls,
            initial_channels,
        })
    }

    /// The `host:port` string used for dialing.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromStr for EndpointDescriptor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EndpointDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tls = if self.use_tls { "+" } else { "" };
        write!(f, "irc://{}:{}{}", self.host, tls, self.port)?;
        if !self.initial_channels.is_empty() {
            let names: Vec<&str> = self
                .initial_channels
                .iter()
                .map(|chan| chan.strip_prefix('#').unwrap_or(chan))
                .collect();
            write!(f, "/{}", names.join(","))?;
        }
        Ok(())
    }
}
