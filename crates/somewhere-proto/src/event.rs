//! Decoded forms of server lines and user input.

use std::fmt;

/// A server line after translation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    /// `PING <token>`; the token is everything after `"PING "`.
    Ping {
        /// Token to echo back in the PONG.
        token: String,
    },
    /// A chat message to a channel or user.
    PrivMsg {
        /// Nickname part of the sender prefix.
        sender_nick: String,
        /// Message target as sent by the server.
        channel: String,
        /// Message body with the trailing-parameter `:` removed.
        text: String,
    },
    /// Numeric 001, registration accepted.
    Registered {
        /// Final parameter of the welcome line.
        assigned_identity: String,
    },
    /// Anything else, kept verbatim.
    Other {
        /// The line as received.
        raw_line: String,
    },
}

/// A user input line after translation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundCommand {
    /// `/quit [reason]`.
    Quit {
        /// Words following `/quit`, if any.
        reason: Option<String>,
    },
    /// Forwarded to the server unchanged.
    Raw {
        /// The line exactly as typed.
        text: String,
    },
}

impl InboundEvent {
    /// Short label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ping { .. } => "ping",
            Self::PrivMsg { .. } => "privmsg",
            Self::Registered { .. } => "registered",
            Self::Other { .. } => "other",
        }
    }
}

impl OutboundCommand {
    /// Short label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Quit { .. } => "quit",
            Self::Raw { .. } => "raw",
        }
    }
}

/// Wire form, see [`crate::codec::encode_outbound`].
impl fmt::Display for OutboundCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quit { reason: Some(reason) } => write!(f, "QUIT {}", reason),
            Self::Quit { reason: None } => f.write_str("QUIT"),
            Self::Raw { text } => f.write_str(text),
        }
    }
}
