//! Unified error handling for the connection engine.
//!
//! Transport faults are split by direction so the engine can tell a failed
//! connection attempt apart from a stream that died mid-session. None of them
//! is fatal to the process; the engine surfaces them through the display sink.

use somewhere_proto::ProtocolError;
use thiserror::Error;

// ============================================================================
// Transport Errors
// ============================================================================

/// Socket establishment failed (resolution, refusal, timeout).
#[derive(Debug, Error)]
#[error("could not connect to {host}:{port}: {reason}")]
pub struct ConnectError {
    pub host: String,
    pub port: u16,
    pub reason: String,
}

impl ConnectError {
    pub fn new(host: &str, port: u16, reason: impl Into<String>) -> Self {
        Self {
            host: host.to_string(),
            port,
            reason: reason.into(),
        }
    }
}

/// Reading a line from the server failed.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("connection closed by peer")]
    Closed,

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ProtocolError> for ReadError {
    fn from(e: ProtocolError) -> Self {
        match e {
            ProtocolError::Io(io) => Self::Io(io),
        }
    }
}

/// Writing a line to the server failed.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("connection is closed")]
    Closed,

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ProtocolError> for WriteError {
    fn from(e: ProtocolError) -> Self {
        match e {
            ProtocolError::Io(io) => Self::Io(io),
        }
    }
}

// ============================================================================
// Engine Errors
// ============================================================================

/// Reasons an engine run ends other than a requested quit.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("gave up connecting to {host}:{port} after {attempts} attempts")]
    RetriesExhausted {
        host: String,
        port: u16,
        attempts: u32,
    },

    #[error("connection lost: {0}")]
    Fault(String),
}

impl EngineError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::RetriesExhausted { .. } => "retries_exhausted",
            Self::Fault(_) => "fault",
        }
    }
}

/// The engine task has exited and no longer accepts input.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("engine is no longer running")]
pub struct EngineStopped;
