//! Translation between raw IRC lines and [`InboundEvent`] / [`OutboundCommand`].
//!
//! Lines are tokenized by splitting on single spaces, so runs of spaces inside
//! a message body survive a decode/render cycle. Nothing here fails: a line
//! that does not match a known shape becomes [`InboundEvent::Other`].

use std::borrow::Cow;

use crate::event::{InboundEvent, OutboundCommand};

const PING_PREFIX: &str = "PING ";
const QUIT_PREFIX: &str = "/quit";

/// Decode one server line.
pub fn decode_inbound(raw: &str) -> InboundEvent {
    if let Some(token) = raw.strip_prefix(PING_PREFIX) {
        return InboundEvent::Ping {
            token: token.to_string(),
        };
    }

    let tokens: Vec<&str> = raw.split(' ').collect();
    if tokens.len() < 2 {
        return other(raw);
    }

    match tokens[1] {
        "PRIVMSG" if tokens.len() >= 3 => InboundEvent::PrivMsg {
            sender_nick: nick_from_prefix(tokens[0]).to_string(),
            channel: tokens[2].to_string(),
            text: trailing_text(&tokens[3..]),
        },
        "001" => InboundEvent::Registered {
            // len >= 2 here, so last() is always present
            assigned_identity: tokens.last().copied().unwrap_or_default().to_string(),
        },
        _ => other(raw),
    }
}

/// Human-readable form of a decoded server line.
///
/// Chat messages render as `<nick> (<channel>) <text>`; every other event is
/// shown as the raw line it came from.
pub fn render_inbound<'a>(event: &'a InboundEvent, raw: &'a str) -> Cow<'a, str> {
    match event {
        InboundEvent::PrivMsg {
            sender_nick,
            channel,
            text,
        } if text.is_empty() => Cow::Owned(format!("{} ({})", sender_nick, channel)),
        InboundEvent::PrivMsg {
            sender_nick,
            channel,
            text,
        } => Cow::Owned(format!("{} ({}) {}", sender_nick, channel, text)),
        InboundEvent::Other { raw_line } => Cow::Borrowed(raw_line),
        InboundEvent::Ping { .. } | InboundEvent::Registered { .. } => Cow::Borrowed(raw),
    }
}

/// Decode one line typed by the user.
///
/// Only `/quit` (any case) is interpreted; everything else is passed through
/// to the server untouched.
pub fn decode_user_line(line: &str) -> OutboundCommand {
    let is_quit = line
        .get(..QUIT_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(QUIT_PREFIX));

    if !is_quit {
        return OutboundCommand::Raw {
            text: line.to_string(),
        };
    }

    let reason = line
        .split_once(' ')
        .map(|(_, rest)| rest)
        .filter(|rest| !rest.is_empty())
        .map(str::to_string);

    OutboundCommand::Quit { reason }
}

/// Wire form of a user command.
pub fn encode_outbound(cmd: &OutboundCommand) -> String {
    cmd.to_string()
}

/// PONG reply for a PING token.
pub fn pong_for(ping_token: &str) -> String {
    format!("PONG {}", ping_token)
}

/// `NICK` registration line.
pub fn nick_line(nick: &str) -> String {
    format!("NICK {}", nick)
}

/// `USER` registration line (mode 8, unused `*`).
pub fn user_line(ident: &str, realname: &str) -> String {
    format!("USER {} 8 * :{}", ident, realname)
}

/// Nickname part of a `:nick!user@host` prefix.
pub fn nick_from_prefix(prefix: &str) -> &str {
    let prefix = prefix.strip_prefix(':').unwrap_or(prefix);
    match prefix.split_once('!') {
        Some((nick, _)) => nick,
        None => prefix,
    }
}

fn trailing_text(params: &[&str]) -> String {
    let Some((first, rest)) = params.split_first() else {
        return String::new();
    };
    let mut text = first.strip_prefix(':').unwrap_or(first).to_string();
    for token in rest {
        text.push(' ');
        text.push_str(token);
    }
    text
}

fn other(raw: &str) -> InboundEvent {
    InboundEvent::Other {
        raw_line: raw.to_string(),
    }
}
