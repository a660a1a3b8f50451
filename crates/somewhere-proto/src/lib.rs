//! # somewhere-proto
//!
//! The protocol half of the SomewhereIRC client: a lenient translator between
//! raw IRC lines and typed events, plus a newline framer for tokio streams.
//!
//! ```rust
//! use somewhere_proto::{decode_inbound, pong_for, InboundEvent};
//!
//! match decode_inbound("PING :irc.example.net") {
//!     InboundEvent::Ping { token } => assert_eq!(pong_for(&token), "PONG :irc.example.net"),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```
//!
//! Only the commands the client acts on are understood (PING, PRIVMSG,
//! numeric 001 inbound; `/quit` from the user). Everything else passes through
//! as raw text.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod event;
#[cfg(feature = "tokio")]
pub mod line;

pub use self::codec::{
    decode_inbound, decode_user_line, encode_outbound, nick_from_prefix, nick_line, pong_for,
    render_inbound, user_line,
};
pub use self::error::ProtocolError;
pub use self::event::{InboundEvent, OutboundCommand};
#[cfg(feature = "tokio")]
pub use self::line::{LineFramer, DEFAULT_MAX_LINE_LEN};
