//! # slirc-client
//!
//! A minimal IRC client: one TCP or TLS connection, the NICK/USER
//! registration handshake, automatic replies to server `PING` and CTCP
//! `VERSION`/`PING`, and a handler that receives every message once
//! registered.
//!
//! ## Features
//!
//! - `irc://host:[+]port[/chan,...]` connection URIs
//! - Lenient line decoding that keeps colons inside trailing parameters
//! - Outbound lines bounded to the 512-byte protocol limit
//! - Sans-IO registration tracking, testable without a socket
//! - Optional Tokio integration (default `tokio` feature) for the
//!   transport and the connection driver
//!
//! ## Quick Start
//!
//! ### Decoding lines
//!
//! ```rust
//! use slirc_client::Message;
//!
//! let msg = Message::decode(":nick!user@host PRIVMSG #channel :Hello!\r\n", "irc.example.net")
//!     .expect("valid IRC line");
//! assert_eq!(msg.nick(), "nick");
//! assert_eq!(msg.parameters, vec!["#channel", "Hello!"]);
//! ```
//!
//! ### Running a client
//!
//! See [`client`] for a complete handler example.

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod ctcp;
pub mod encode;
pub mod endpoint;
pub mod error;
pub mod message;
pub mod prefix;
pub mod responder;
pub mod state;

#[cfg(feature = "tokio")]
pub mod client;
#[cfg(feature = "tokio")]
pub mod line;
#[cfg(feature = "tokio")]
pub mod logging;
#[cfg(feature = "tokio")]
pub mod transport;

pub use self::config::{ClientConfig, ClientIdentity};
pub use self::ctcp::Ctcp;
pub use self::encode::{encode_line, WireLine};
pub use self::endpoint::EndpointDescriptor;
pub use self::error::{ConfigError, ConnectError, MessageParseError, ProtocolError};
pub use self::message::Message;
pub use self::prefix::Prefix;
pub use self::responder::{respond, AutoReply};
pub use self::state::{ChannelSet, Phase, RegistrationAction, RegistrationMachine};

#[cfg(feature = "tokio")]
pub use self::client::{Client, Commands, MessageHandler, Session};
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
#[cfg(feature = "tokio")]
pub use self::transport::Transport;

#[cfg(feature = "tokio")]
pub use async_trait::async_trait;
