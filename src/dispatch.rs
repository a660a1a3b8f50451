//! Maps decoded events to the client action they call for.
//!
//! Pure functions; the engine performs the resulting I/O.

use somewhere_proto::{InboundEvent, OutboundCommand};

/// What the engine should do in response to one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientAction {
    /// Answer a PING with this token.
    SendPong { original_ping: String },
    /// Stop the engine after the current line.
    Terminate,
    None,
}

/// Action for a server line.
///
/// Registration confirmation is displayed but needs no reply; the engine
/// captures the identity itself.
pub fn resolve_inbound(event: &InboundEvent) -> ClientAction {
    match event {
        InboundEvent::Ping { token } => ClientAction::SendPong {
            original_ping: token.clone(),
        },
        InboundEvent::PrivMsg { .. } | InboundEvent::Registered { .. } | InboundEvent::Other { .. } => {
            ClientAction::None
        }
    }
}

/// Action for a user line.
pub fn resolve_user_command(cmd: &OutboundCommand) -> ClientAction {
    match cmd {
        OutboundCommand::Quit { .. } => ClientAction::Terminate,
        OutboundCommand::Raw { .. } => ClientAction::None,
    }
}
