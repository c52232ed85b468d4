/**
 * WebSocket Frame Vocabulary
 *
 * Text frames on the session socket are tiny: a client heartbeat is the word
 * `ping` in any letter case and the server answers `pong`. Any other text is
 * echoed back with an `echo: ` prefix.
 *
 * This module also carries the RFC 6455 close-code table used when the server
 * ends a session.
 */

/// Client heartbeat sentinel, compared case-insensitively
pub const HEARTBEAT_SENTINEL: &str = "ping";

/// Server reply to a heartbeat
pub const HEARTBEAT_ACK: &str = "pong";

/// Prefix of the reply to any non-heartbeat text frame
pub const ECHO_PREFIX: &str = "echo: ";

/// Close reason sent when the heartbeat window lapses
pub const TIMEOUT_REASON: &str = "Timeout due to inactivity";

/// What an inbound text frame means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundFrame<'a> {
    Heartbeat,
    Data(&'a str),
}

/// Sort an inbound text frame into heartbeat or payload
pub fn classify(text: &str) -> InboundFrame<'_> {
    if text.eq_ignore_ascii_case(HEARTBEAT_SENTINEL) {
        InboundFrame::Heartbeat
    } else {
        InboundFrame::Data(text)
    }
}

/// Reply text for a payload frame
pub fn echo(text: &str) -> String {
    format!("{ECHO_PREFIX}{text}")
}

/// WebSocket close codes (RFC 6455 section 7.4.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum WsCloseCode {
    Normal = 1000,
    GoingAway = 1001,
    ProtocolError = 1002,
    UnsupportedData = 1003,
    Reserved = 1004,
    NoStatusReceived = 1005,
    AbnormalClosure = 1006,
    InvalidPayloadData = 1007,
    PolicyViolation = 1008,
    MessageTooBig = 1009,
    MandatoryExtension = 1010,
    InternalServerError = 1011,
    ServiceRestart = 1012,
    TryAgainLater = 1013,
    BadGateway = 1014,
    TlsHandshakeFailure = 1015,
}

impl WsCloseCode {
    pub const ALL: [WsCloseCode; 16] = [
        Self::Normal,
        Self::GoingAway,
        Self::ProtocolError,
        Self::UnsupportedData,
        Self::Reserved,
        Self::NoStatusReceived,
        Self::AbnormalClosure,
        Self::InvalidPayloadData,
        Self::PolicyViolation,
        Self::MessageTooBig,
        Self::MandatoryExtension,
        Self::InternalServerError,
        Self::ServiceRestart,
        Self::TryAgainLater,
        Self::BadGateway,
        Self::TlsHandshakeFailure,
    ];

    pub const fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Normal => "The connection successfully closed",
            Self::GoingAway => "The server or client is going away",
            Self::ProtocolError => "The connection was closed due to a protocol error",
            Self::UnsupportedData => "The endpoint does not support the data type",
            Self::Reserved => "Reserved",
            Self::NoStatusReceived => "The connection was closed without a close status",
            Self::AbnormalClosure => "The connection was closed abnormally",
            Self::InvalidPayloadData => "The payload was not consistent with the message type",
            Self::PolicyViolation => "The connection was closed due to a policy violation",
            Self::MessageTooBig => "The message was too large to process",
            Self::MandatoryExtension => "The client requires an extension the server did not negotiate",
            Self::InternalServerError => "The server hit an unexpected condition",
            Self::ServiceRestart => "The server is restarting",
            Self::TryAgainLater => "The server is overloaded, try again later",
            Self::BadGateway => "An upstream server returned an invalid response",
            Self::TlsHandshakeFailure => "The TLS handshake failed",
        }
    }
}

impl std::fmt::Display for WsCloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code(), self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn heartbeat_is_case_insensitive() {
        assert_eq!(classify("ping"), InboundFrame::Heartbeat);
        assert_eq!(classify("PING"), InboundFrame::Heartbeat);
        assert_eq!(classify("PiNg"), InboundFrame::Heartbeat);
        assert_eq!(classify(" ping"), InboundFrame::Data(" ping"));
        assert_eq!(classify("pong"), InboundFrame::Data("pong"));
    }

    #[test]
    fn echo_prefixes_payload() {
        assert_eq!(echo("hello"), "echo: hello");
        assert_eq!(echo(""), "echo: ");
    }

    #[test]
    fn close_code_table_is_contiguous() {
        for (offset, code) in WsCloseCode::ALL.iter().enumerate() {
            assert_eq!(code.code(), 1000 + offset as u16);
            assert_eq!(WsCloseCode::from_code(code.code()), Some(*code));
        }
        assert_eq!(WsCloseCode::from_code(999), None);
        assert_eq!(WsCloseCode::from_code(1016), None);
        assert_eq!(WsCloseCode::PolicyViolation.code(), 1008);
    }

    proptest! {
        #[test]
        fn non_sentinel_text_is_echoed(text in "\\PC*") {
            prop_assume!(!text.eq_ignore_ascii_case(HEARTBEAT_SENTINEL));
            prop_assert_eq!(classify(&text), InboundFrame::Data(text.as_str()));
            prop_assert_eq!(echo(&text), format!("echo: {}", text));
        }

        #[test]
        fn any_casing_of_ping_is_a_heartbeat(mask in proptest::collection::vec(any::<bool>(), 4)) {
            let word: String = "ping"
                .chars()
                .zip(mask)
                .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c })
                .collect();
            prop_assert_eq!(classify(&word), InboundFrame::Heartbeat);
        }
    }
}
