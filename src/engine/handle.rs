//! Handle given to whoever owns an engine (the front end).

use tokio::sync::{broadcast, mpsc, watch};

use super::status::{ConnectionStatus, SessionIdentity};
use crate::error::EngineStopped;

/// Control surface of a running engine. Cheap to clone.
#[derive(Clone, Debug)]
pub struct EngineHandle {
    pub(super) user_tx: mpsc::UnboundedSender<String>,
    pub(super) status_rx: watch::Receiver<ConnectionStatus>,
    pub(super) identity_rx: watch::Receiver<SessionIdentity>,
    pub(super) shutdown_tx: broadcast::Sender<()>,
}

impl EngineHandle {
    /// Queue one line of user input. Lines are processed in submission order.
    pub fn submit_user_line(&self, text: impl Into<String>) -> Result<(), EngineStopped> {
        self.user_tx.send(text.into()).map_err(|_| EngineStopped)
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.status_rx.borrow()
    }

    /// Receiver that sees every status change.
    pub fn subscribe_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_rx.clone()
    }

    /// Identity confirmed by the server for the current connection, if any.
    pub fn identity(&self) -> Option<String> {
        self.identity_rx.borrow().get().map(str::to_string)
    }

    /// Ask the engine to disconnect, interrupting any wait in progress.
    pub fn shutdown(&self) {
        // No receiver means the engine already finished
        let _ = self.shutdown_tx.send(());
    }
}

/// Resolves once shutdown has been requested; never resolves if every
/// handle is gone without asking.
pub(super) async fn shutdown_requested(rx: &mut broadcast::Receiver<()>) {
    match rx.recv().await {
        Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {}
        Err(broadcast::error::RecvError::Closed) => std::future::pending::<()>().await,
    }
}
