#![allow(dead_code)]

//! Scripted in-memory transport.
//!
//! Fails a configurable number of connection attempts, then hands the test a
//! [`ServerEnd`] for every connection the engine opens. Lines pushed through
//! the server end are buffered exactly like bytes already sitting in a socket
//! read buffer, so `has_pending_line` sees them.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use somewhere_irc::error::{ConnectError, ReadError, WriteError};
use somewhere_irc::transport::{LineStream, Transport};
use tokio::sync::{mpsc, Notify};

use super::WAIT;

enum Inbound {
    Line(String),
    Eof,
    Reset,
}

#[derive(Default)]
struct Inbox {
    queue: Mutex<VecDeque<Inbound>>,
    notify: Notify,
}

impl Inbox {
    fn push(&self, item: Inbound) {
        self.queue.lock().push_back(item);
        self.notify.notify_one();
    }
}

struct Attempts {
    failures_left: u32,
    attempts: u32,
}

/// Transport whose connections are driven by the test.
#[derive(Clone)]
pub struct ScriptedTransport {
    attempts: Arc<Mutex<Attempts>>,
    accepted: mpsc::UnboundedSender<ServerEnd>,
    write_budget: Option<usize>,
}

impl ScriptedTransport {
    /// Refuse the first `fail_first` attempts, accept every later one.
    pub fn new(fail_first: u32) -> (Self, Acceptor) {
        let attempts = Arc::new(Mutex::new(Attempts {
            failures_left: fail_first,
            attempts: 0,
        }));
        let (accepted, rx) = mpsc::unbounded_channel();
        let transport = Self {
            attempts: Arc::clone(&attempts),
            accepted,
            write_budget: None,
        };
        (transport, Acceptor { rx, attempts })
    }

    /// Streams accept `writes` lines, then every write fails.
    pub fn with_write_budget(mut self, writes: usize) -> Self {
        self.write_budget = Some(writes);
        self
    }

    /// Refuse every attempt.
    #[allow(dead_code)]
    pub fn unreachable() -> (Self, Acceptor) {
        Self::new(u32::MAX)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    type Stream = ScriptedStream;

    async fn connect(&self, host: &str, port: u16) -> Result<ScriptedStream, ConnectError> {
        {
            let mut state = self.attempts.lock();
            state.attempts += 1;
            if state.failures_left > 0 {
                state.failures_left -= 1;
                return Err(ConnectError::new(host, port, "connection refused"));
            }
        }

        let inbox = Arc::new(Inbox::default());
        let closed = Arc::new(AtomicBool::new(false));
        let (written_tx, written_rx) = mpsc::unbounded_channel();

        let server = ServerEnd {
            inbox: Arc::clone(&inbox),
            written: written_rx,
            closed: Arc::clone(&closed),
        };
        self.accepted
            .send(server)
            .map_err(|_| ConnectError::new(host, port, "test harness gone"))?;

        Ok(ScriptedStream {
            inbox,
            written: written_tx,
            closed,
            writes_left: self.write_budget,
        })
    }
}

/// Test side of the transport: observes connection attempts.
pub struct Acceptor {
    rx: mpsc::UnboundedReceiver<ServerEnd>,
    attempts: Arc<Mutex<Attempts>>,
}

#[allow(dead_code)]
impl Acceptor {
    pub async fn accept(&mut self) -> ServerEnd {
        tokio::time::timeout(WAIT, self.rx.recv())
            .await
            .expect("engine never connected")
            .expect("transport dropped")
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.lock().attempts
    }
}

/// Test side of one accepted connection.
pub struct ServerEnd {
    inbox: Arc<Inbox>,
    written: mpsc::UnboundedReceiver<String>,
    closed: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl ServerEnd {
    /// Queue a line for the engine to read.
    pub fn send(&self, line: &str) {
        self.inbox.push(Inbound::Line(line.to_string()));
    }

    /// Queue an orderly end of stream.
    pub fn hang_up(&self) {
        self.inbox.push(Inbound::Eof);
    }

    /// Queue a read failure.
    pub fn reset(&self) {
        self.inbox.push(Inbound::Reset);
    }

    /// Next line the engine wrote.
    pub async fn recv(&mut self) -> String {
        tokio::time::timeout(WAIT, self.written.recv())
            .await
            .expect("timed out waiting for client line")
            .expect("client stream dropped")
    }

    /// Lines written so far, without waiting.
    pub fn drain(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(line) = self.written.try_recv() {
            lines.push(line);
        }
        lines
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Engine side of one accepted connection.
pub struct ScriptedStream {
    inbox: Arc<Inbox>,
    written: mpsc::UnboundedSender<String>,
    closed: Arc<AtomicBool>,
    writes_left: Option<usize>,
}

#[async_trait]
impl LineStream for ScriptedStream {
    async fn read_line(&mut self) -> Result<String, ReadError> {
        loop {
            let next = self.inbox.queue.lock().pop_front();
            match next {
                Some(Inbound::Line(line)) => return Ok(line),
                Some(Inbound::Eof) => return Err(ReadError::Closed),
                Some(Inbound::Reset) => {
                    return Err(ReadError::Io(std::io::Error::new(
                        std::io::ErrorKind::ConnectionReset,
                        "connection reset by peer",
                    )))
                }
                None => self.inbox.notify.notified().await,
            }
        }
    }

    fn has_pending_line(&self) -> bool {
        !self.inbox.queue.lock().is_empty()
    }

    async fn write_line(&mut self, line: &str) -> Result<(), WriteError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(WriteError::Closed);
        }
        if let Some(left) = self.writes_left.as_mut() {
            if *left == 0 {
                return Err(WriteError::Io(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "broken pipe",
                )));
            }
            *left -= 1;
        }
        self.written
            .send(line.to_string())
            .map_err(|_| WriteError::Closed)
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
