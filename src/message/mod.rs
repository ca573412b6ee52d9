//! Inbound IRC messages.

mod parse;
mod types;

pub use self::parse::strip_terminator;
pub use self::types::Message;
