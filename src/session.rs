//! Registration handshake on a fresh connection.
//!
//! Sends `NICK` then `USER` and returns without waiting for a reply; the
//! numeric 001 that confirms registration is picked up later by the engine's
//! main loop.

use somewhere_proto::{encode_outbound, nick_line, user_line, OutboundCommand};
use tracing::debug;

use crate::config::ConnectionConfig;
use crate::display::DisplaySink;
use crate::error::WriteError;
use crate::transport::LineStream;

/// The registration lines for `config`, in the order they are sent.
pub fn registration_lines(config: &ConnectionConfig) -> [OutboundCommand; 2] {
    [
        OutboundCommand::Raw {
            text: nick_line(&config.nick),
        },
        OutboundCommand::Raw {
            text: user_line(&config.ident, &config.realname),
        },
    ]
}

/// Register with the server, echoing each sent line to `sink`.
///
/// Stops at the first write failure; whether to reconnect is the caller's call.
pub async fn register<S, D>(
    stream: &mut S,
    config: &ConnectionConfig,
    sink: &D,
) -> Result<(), WriteError>
where
    S: LineStream + ?Sized,
    D: DisplaySink + ?Sized,
{
    for cmd in registration_lines(config) {
        let line = encode_outbound(&cmd);
        debug!(line = %line, "Sending registration");
        stream.write_line(&line).await?;
        sink.display(&line);
    }
    Ok(())
}
