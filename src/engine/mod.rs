//! Connection engine - drives one server connection.
//!
//! Each engine runs in its own Tokio task and owns its transport stream,
//! status and identity. The lifecycle:
//!
//! ```text
//!  Disconnected ──▶ Connecting ──(connect ok + NICK/USER)──▶ Connected
//!       ▲              │  ▲                                      │
//!       │              └──┘ connect failed: error, backoff       │ /quit, shutdown,
//!       │                                                        │ or stream fault
//!       └──────────────────── Disconnecting ◀────────────────────┘
//! ```
//!
//! While connected, [`event_loop`] multiplexes user input and server lines.

mod event_loop;
mod handle;
mod status;

pub use handle::EngineHandle;
pub use status::{ConnectionStatus, SessionIdentity};

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::config::{ConnectionConfig, EngineConfig};
use crate::display::DisplaySink;
use crate::error::EngineError;
use crate::session;
use crate::transport::{LineStream, Transport};
use event_loop::LoopExit;
use handle::shutdown_requested;

/// One connection's state machine.
pub struct ConnectionEngine<T: Transport, D: DisplaySink> {
    config: ConnectionConfig,
    settings: EngineConfig,
    transport: T,
    sink: D,
    user_rx: mpsc::UnboundedReceiver<String>,
    status_tx: watch::Sender<ConnectionStatus>,
    identity_tx: watch::Sender<SessionIdentity>,
    shutdown_rx: broadcast::Receiver<()>,
    running: bool,
}

impl<T, D> ConnectionEngine<T, D>
where
    T: Transport + 'static,
    D: DisplaySink + 'static,
{
    /// Create an engine and the handle that controls it. Nothing connects
    /// until [`run`](Self::run) is awaited.
    pub fn new(
        config: ConnectionConfig,
        settings: EngineConfig,
        transport: T,
        sink: D,
    ) -> (Self, EngineHandle) {
        let (user_tx, user_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Disconnected);
        let (identity_tx, identity_rx) = watch::channel(SessionIdentity::default());
        let (shutdown_tx, shutdown_rx) = broadcast::channel(4);

        let engine = Self {
            config,
            settings,
            transport,
            sink,
            user_rx,
            status_tx,
            identity_tx,
            shutdown_rx,
            running: true,
        };
        let handle = EngineHandle {
            user_tx,
            status_rx,
            identity_rx,
            shutdown_tx,
        };
        (engine, handle)
    }

    /// Run the engine on its own task.
    pub fn spawn(self) -> JoinHandle<Result<(), EngineError>> {
        tokio::spawn(self.run())
    }

    /// Drive the connection until the user quits, shutdown is requested,
    /// or recovery is given up.
    #[instrument(skip(self), fields(host = %self.config.host, port = self.config.port), name = "engine")]
    pub async fn run(mut self) -> Result<(), EngineError> {
        info!(nick = %self.config.nick, ident = %self.config.ident, "Engine starting");

        let mut stream: Option<T::Stream> = None;
        let mut outcome = Ok(());

        while self.running {
            let status = *self.status_tx.borrow();
            debug!(%status, "Engine tick");

            let exit = match stream.as_mut() {
                Some(active) if status == ConnectionStatus::Connected => {
                    Some(self.event_loop(active).await)
                }
                _ => None,
            };

            match exit {
                Some(LoopExit::Stopped) => {}
                Some(LoopExit::Fault(reason)) => {
                    self.disconnect(&mut stream).await;
                    if self.settings.reconnect_on_fault {
                        info!(%reason, "Reconnecting after fault");
                    } else {
                        warn!(%reason, "Connection lost; not reconnecting");
                        outcome = Err(EngineError::Fault(reason));
                        self.running = false;
                    }
                }
                None => match self.establish().await {
                    Ok(Some(active)) => stream = Some(active),
                    Ok(None) => self.running = false,
                    Err(e) => {
                        outcome = Err(e);
                        self.running = false;
                    }
                },
            }

            if self.running {
                tokio::select! {
                    _ = tokio::time::sleep(self.settings.status_poll()) => {}
                    _ = shutdown_requested(&mut self.shutdown_rx) => self.running = false,
                }
            }
        }

        self.disconnect(&mut stream).await;
        match &outcome {
            Ok(()) => info!("Engine stopped"),
            Err(e) => warn!(error = %e, code = e.error_code(), "Engine stopped"),
        }
        outcome
    }

    /// Connect with retry, then register.
    ///
    /// Returns `Ok(None)` when shutdown was requested while waiting.
    async fn establish(&mut self) -> Result<Option<T::Stream>, EngineError> {
        self.identity_tx.send_modify(SessionIdentity::clear);
        let host = self.config.host.clone();
        let port = self.config.port;
        let mut failures: u32 = 0;

        loop {
            self.set_status(ConnectionStatus::Connecting);

            let connected = tokio::select! {
                result = self.transport.connect(&host, port) => Some(result),
                _ = shutdown_requested(&mut self.shutdown_rx) => None,
            };
            let Some(result) = connected else {
                self.set_status(ConnectionStatus::Disconnected);
                return Ok(None);
            };

            match result {
                Ok(mut stream) => {
                    self.sink
                        .display(&format!("Connected to {} on port {}.", host, port));
                    if let Err(e) = session::register(&mut stream, &self.config, &self.sink).await {
                        // Registration is best effort; a dead socket shows up in the main loop
                        warn!(error = %e, "Registration write failed");
                        self.sink
                            .error(&format!("ERROR: Could not complete registration ({}).", e));
                    }
                    self.set_status(ConnectionStatus::Connected);
                    return Ok(Some(stream));
                }
                Err(e) => {
                    failures += 1;
                    warn!(attempt = failures, error = %e, "Connection attempt failed");
                    self.sink.error(&format!(
                        "ERROR: Client could not connect to {} on port {}.",
                        host, port
                    ));

                    if self
                        .settings
                        .max_connect_attempts
                        .is_some_and(|max| failures >= max)
                    {
                        self.set_status(ConnectionStatus::Disconnected);
                        return Err(EngineError::RetriesExhausted {
                            host,
                            port,
                            attempts: failures,
                        });
                    }

                    let backoff = self.settings.retry_backoff();
                    self.sink.display(&format!(
                        "Retrying connection in {} seconds...",
                        backoff.as_secs()
                    ));
                    tokio::select! {
                        _ = tokio::time::sleep(backoff) => {}
                        _ = shutdown_requested(&mut self.shutdown_rx) => {
                            self.set_status(ConnectionStatus::Disconnected);
                            return Ok(None);
                        }
                    }
                }
            }
        }
    }

    /// Connected/Disconnecting → Disconnected, closing the stream if one is open.
    async fn disconnect(&mut self, stream: &mut Option<T::Stream>) {
        if let Some(mut active) = stream.take() {
            self.set_status(ConnectionStatus::Disconnecting);
            active.close().await;
        }
        self.set_status(ConnectionStatus::Disconnected);
    }

    fn set_status(&self, next: ConnectionStatus) {
        let prev = self.status_tx.send_replace(next);
        if prev != next {
            info!(from = %prev, to = %next, "Status changed");
        }
    }
}
