//! Error types for the line framer.
//!
//! Translation between raw lines and events never fails, and the framer
//! repairs bad line content instead of rejecting it, so the only error left
//! is the underlying socket failing.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Errors raised while framing a byte stream into lines.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
