//! Integration test common infrastructure.
//!
//! Provides a scripted in-memory transport, a minimal fake IRC server on a
//! real socket, and helpers for waiting on engine output.

pub mod server;
pub mod transport;

use std::time::Duration;

use somewhere_irc::config::{ConnectionConfig, EngineConfig};
use somewhere_irc::display::{ChannelSink, DisplayEvent};
use somewhere_irc::engine::{ConnectionEngine, ConnectionStatus, EngineHandle};
use somewhere_irc::error::EngineError;
use somewhere_irc::transport::Transport;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

#[allow(unused_imports)]
pub use server::FakeServer;
#[allow(unused_imports)]
pub use transport::{Acceptor, ScriptedTransport, ServerEnd};

/// Upper bound for any single wait; generous because paused clocks jump.
pub const WAIT: Duration = Duration::from_secs(120);

/// A spawned engine plus everything a test observes it through.
pub struct TestEngine {
    pub handle: EngineHandle,
    pub display: UnboundedReceiver<DisplayEvent>,
    pub task: JoinHandle<Result<(), EngineError>>,
}

#[allow(dead_code)]
impl TestEngine {
    pub fn spawn<T: Transport + 'static>(transport: T, settings: EngineConfig) -> Self {
        Self::spawn_with(
            ConnectionConfig::new("irc.test").with_identity("tester", "tident", "Test User"),
            transport,
            settings,
        )
    }

    pub fn spawn_with<T: Transport + 'static>(
        config: ConnectionConfig,
        transport: T,
        settings: EngineConfig,
    ) -> Self {
        let (sink, display) = ChannelSink::new();
        let (engine, handle) = ConnectionEngine::new(config, settings, transport, sink);
        Self {
            handle,
            display,
            task: engine.spawn(),
        }
    }

    /// Next display event, panicking if none arrives.
    pub async fn next_event(&mut self) -> DisplayEvent {
        tokio::time::timeout(WAIT, self.display.recv())
            .await
            .expect("timed out waiting for display output")
            .expect("display channel closed")
    }

    /// Skip display events until one with exactly `text` arrives.
    pub async fn expect_text(&mut self, text: &str) -> DisplayEvent {
        loop {
            let event = self.next_event().await;
            if event.text() == text {
                return event;
            }
        }
    }

    pub async fn wait_for_status(&self, wanted: ConnectionStatus) {
        let mut rx = self.handle.subscribe_status();
        tokio::time::timeout(WAIT, rx.wait_for(|s| *s == wanted))
            .await
            .expect("timed out waiting for status")
            .expect("engine dropped its status channel");
    }

    /// Wait for the engine task to return.
    pub async fn finish(self) -> Result<(), EngineError> {
        tokio::time::timeout(WAIT, self.task)
            .await
            .expect("engine did not stop")
            .expect("engine task panicked")
    }
}

/// Engine settings with short, test-friendly timings.
#[allow(dead_code)]
pub fn settings() -> EngineConfig {
    EngineConfig {
        status_poll_millis: 10,
        ..EngineConfig::default()
    }
}
