//! Steady-state loop of a connected engine.
//!
//! Server lines are read as they arrive. When a user line is waiting, lines
//! the transport has already buffered are handled first, then exactly one user
//! line, then the loop goes back to waiting on both sources.

use somewhere_proto::{
    decode_inbound, decode_user_line, encode_outbound, pong_for, render_inbound, InboundEvent,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::handle::shutdown_requested;
use super::ConnectionEngine;
use crate::dispatch::{resolve_inbound, resolve_user_command, ClientAction};
use crate::display::DisplaySink;
use crate::error::{ReadError, WriteError};
use crate::transport::{LineStream, Transport};

/// Why the connected loop returned.
pub(super) enum LoopExit {
    /// Running flag cleared by `/quit` or shutdown.
    Stopped,
    /// The stream is unusable.
    Fault(String),
}

/// A stream failure while connected, worded for the user.
#[derive(Debug, Error)]
enum Fault {
    #[error("ERROR: Runtime I/O error ({0}).")]
    Read(#[from] ReadError),

    #[error("ERROR: Could not send message [{line}] ({source}).")]
    Write {
        line: String,
        #[source]
        source: WriteError,
    },
}

async fn send<S: LineStream>(stream: &mut S, line: &str) -> Result<(), Fault> {
    debug!(line = %line, "Sending line");
    stream.write_line(line).await.map_err(|source| Fault::Write {
        line: line.to_string(),
        source,
    })
}

impl<T, D> ConnectionEngine<T, D>
where
    T: Transport + 'static,
    D: DisplaySink + 'static,
{
    pub(super) async fn event_loop(&mut self, stream: &mut T::Stream) -> LoopExit {
        info!("Entering connected loop");

        while self.running {
            let step = tokio::select! {
                biased;

                _ = shutdown_requested(&mut self.shutdown_rx) => {
                    info!("Shutdown requested");
                    self.running = false;
                    Ok(())
                }

                Some(line) = self.user_rx.recv() => self.user_turn(stream, line).await,

                result = stream.read_line() => match result {
                    Ok(raw) => self.handle_server_line(stream, &raw).await,
                    Err(e) => Err(Fault::Read(e)),
                },
            };

            if let Err(fault) = step {
                warn!(error = ?fault, "Connection fault");
                let message = fault.to_string();
                self.sink.error(&message);
                return LoopExit::Fault(message);
            }
        }

        LoopExit::Stopped
    }

    /// Flush already-buffered server lines, then process one user line.
    async fn user_turn(&mut self, stream: &mut T::Stream, line: String) -> Result<(), Fault> {
        while stream.has_pending_line() {
            let raw = stream.read_line().await?;
            self.handle_server_line(stream, &raw).await?;
        }
        self.handle_user_line(stream, &line).await
    }

    async fn handle_server_line(&mut self, stream: &mut T::Stream, raw: &str) -> Result<(), Fault> {
        let event = decode_inbound(raw);
        debug!(kind = event.kind(), raw = %raw, "Received line");

        self.sink.display(&render_inbound(&event, raw));

        if let InboundEvent::Registered { assigned_identity } = &event {
            let mut captured = false;
            self.identity_tx
                .send_modify(|identity| captured = identity.capture(assigned_identity));
            if captured {
                info!(identity = %assigned_identity, "Registration confirmed");
            }
        }

        self.execute(stream, resolve_inbound(&event)).await
    }

    async fn handle_user_line(&mut self, stream: &mut T::Stream, line: &str) -> Result<(), Fault> {
        let cmd = decode_user_line(line);
        debug!(kind = cmd.kind(), "User input");

        self.execute(stream, resolve_user_command(&cmd)).await?;

        // Forwarded whatever the local action was
        let wire = encode_outbound(&cmd);
        send(stream, &wire).await?;
        self.sink.display(&wire);
        Ok(())
    }

    async fn execute(&mut self, stream: &mut T::Stream, action: ClientAction) -> Result<(), Fault> {
        match action {
            ClientAction::SendPong { original_ping } => send(stream, &pong_for(&original_ping)).await,
            ClientAction::Terminate => {
                info!("Quit requested");
                self.running = false;
                Ok(())
            }
            ClientAction::None => Ok(()),
        }
    }
}
