//! Property-based tests for line decoding and outbound bounding.
//!
//! Uses proptest to generate IRC components and check that:
//! 1. Decoding never panics, whatever the input
//! 2. Lines assembled from valid parts decode back into those parts
//! 3. Outbound lines never exceed 512 bytes and stay valid UTF-8
//! 4. Each outbound line carries exactly one terminator

use proptest::prelude::*;
use slirc_client::{encode_line, EndpointDescriptor, Message, Prefix};

// =============================================================================
// STRATEGIES
// =============================================================================

fn nickname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z\\[\\]\\\\^_`{|}][a-zA-Z0-9\\-\\[\\]\\\\^_`{|}]{0,8}")
        .expect("valid regex")
}

fn username_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("~?[a-zA-Z][a-zA-Z0-9]{0,9}").expect("valid regex")
}

fn hostname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]+(\\.[a-z0-9]+)*").expect("valid regex")
}

/// A middle parameter: no spaces, never starts with `:`.
fn middle_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[#&a-zA-Z0-9+\\-][^ \r\n\0]{0,20}").expect("valid regex")
}

/// Trailing text: anything but line breaks and NUL.
fn trailing_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^\r\n\0]{0,400}").expect("valid regex")
}

fn command_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[A-Z]{3,10}").expect("valid regex"),
        prop::string::string_regex("[0-9]{3}").expect("valid regex"),
    ]
}

fn prefix_strategy() -> impl Strategy<Value = Prefix> {
    prop_oneof![
        prop::string::string_regex("[a-z]+\\.[a-z]+\\.[a-z]+")
            .expect("valid regex")
            .prop_map(Prefix::Name),
        (nickname_strategy(), username_strategy(), hostname_strategy())
            .prop_map(|(nick, user, host)| Prefix::Nickname(nick, user, host)),
    ]
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn decode_never_panics(line in "\\PC{0,600}") {
        let _ = Message::decode(&line, "irc.example.net");
    }

    #[test]
    fn uri_parse_never_panics(uri in "\\PC{0,100}") {
        let _ = EndpointDescriptor::parse(&uri);
    }

    #[test]
    fn assembled_lines_decode_into_their_parts(
        prefix in prefix_strategy(),
        command in command_strategy(),
        middles in prop::collection::vec(middle_strategy(), 0..4),
        trailing in prop::option::of(trailing_strategy()),
    ) {
        // At least one parameter is required.
        prop_assume!(!middles.is_empty() || trailing.is_some());

        let mut line = format!(":{} {}", prefix, command);
        for middle in &middles {
            line.push(' ');
            line.push_str(middle);
        }
        if let Some(trailing) = &trailing {
            line.push_str(" :");
            line.push_str(trailing);
        }
        line.push_str("\r\n");

        let msg = Message::decode(&line, "irc.example.net").unwrap();

        let mut expected = middles.clone();
        expected.extend(trailing.clone());
        prop_assert_eq!(&msg.prefix, &prefix);
        prop_assert_eq!(&msg.command, &command);
        prop_assert_eq!(&msg.parameters, &expected);
        prop_assert_eq!(&msg.raw, &line);
    }

    #[test]
    fn prefixless_lines_name_the_server(
        command in command_strategy(),
        trailing in trailing_strategy(),
    ) {
        let line = format!("{} :{}\r\n", command, trailing);
        let msg = Message::decode(&line, "irc.example.net").unwrap();
        prop_assert_eq!(msg.nick(), "irc.example.net");
        prop_assert_eq!(msg.parameters, vec![trailing]);
    }

    #[test]
    fn outbound_lines_are_bounded(text in "\\PC{0,1200}") {
        let line = encode_line(&text);
        prop_assert!(line.as_bytes().len() <= 512);
        prop_assert!(line.as_str().ends_with("\r\n"));
        prop_assert!(text.starts_with(line.body()));
        prop_assert_eq!(line.was_truncated(), text.len() > 510);
    }

    #[test]
    fn outbound_lines_have_a_single_terminator(text in "[a-zA-Z :#\\r\\n\\x00]{0,700}") {
        let line = encode_line(&text);
        let wire = line.as_str();
        prop_assert!(wire.ends_with("\r\n"));
        prop_assert_eq!(wire.matches('\r').count(), 1);
        prop_assert_eq!(wire.matches('\n').count(), 1);
        prop_assert!(!wire.contains('\0'));
        prop_assert_eq!(line.was_sanitized(), text.contains(['\r', '\n', '\0']));
    }
}
