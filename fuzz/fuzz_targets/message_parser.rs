//! Fuzz target for inbound line handling.
//!
//! Feeds arbitrary input to the line decoder, the CTCP parser, the
//! automatic responder and the URI parser; none of them may panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_client::{encode_line, respond, Ctcp, EndpointDescriptor, Message};
use std::str;

fuzz_target!(|data: &[u8]| {
    // Only fuzz valid UTF-8; the transport decodes lossily before this point.
    if let Ok(input) = str::from_utf8(data) {
        if input.len() > 1024 {
            return;
        }

        if let Ok(msg) = Message::decode(input, "irc.example.net") {
            let _ = respond(&msg, "fuzz 0.0");
            for param in &msg.parameters {
                if let Some(ctcp) = Ctcp::parse(param) {
                    let _ = (ctcp.command(), ctcp.params());
                }
            }
        }

        let _ = EndpointDescriptor::parse(input);

        let line = encode_line(input);
        assert!(line.as_bytes().len() <= 512);
    }
});
