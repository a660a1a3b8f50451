//! Line transport to the server.
//!
//! [`Transport`] opens connections; the [`LineStream`] it returns moves whole
//! lines in both directions. Retrying a failed connect is the engine's job,
//! not the transport's.
//!
//! All `LineStream` futures must be cancel-safe: the engine races
//! [`LineStream::read_line`] against user input and drops whichever loses.

mod tcp;

pub use tcp::{TcpLineStream, TcpTransport};

use async_trait::async_trait;

use crate::error::{ConnectError, ReadError, WriteError};

/// Opens line streams to a server.
#[async_trait]
pub trait Transport: Send + Sync {
    type Stream: LineStream;

    async fn connect(&self, host: &str, port: u16) -> Result<Self::Stream, ConnectError>;
}

/// An open, bidirectional line stream.
#[async_trait]
pub trait LineStream: Send {
    /// Wait for the next line, without its terminator.
    async fn read_line(&mut self) -> Result<String, ReadError>;

    /// Whether a complete line is already buffered, so `read_line` would not wait.
    fn has_pending_line(&self) -> bool;

    /// Send one line; a newline is appended and the stream flushed.
    async fn write_line(&mut self, line: &str) -> Result<(), WriteError>;

    /// Release the connection. Calling it again is a no-op.
    async fn close(&mut self);
}
