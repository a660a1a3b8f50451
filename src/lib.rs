//! SomewhereIRC - a terminal IRC client.
//!
//! Each configured server gets its own [`engine::ConnectionEngine`] running on
//! a Tokio task. The engine connects (retrying with a fixed backoff), registers
//! with `NICK`/`USER`, answers `PING`, renders channel messages and forwards
//! whatever the user types.
//!
//! Wire-level framing and message classification live in the
//! `somewhere-proto` crate.

pub mod config;
pub mod console;
pub mod dispatch;
pub mod display;
pub mod engine;
pub mod error;
pub mod session;
pub mod transport;

pub use engine::{ConnectionEngine, ConnectionStatus, EngineHandle};
pub use error::{ConnectError, EngineError, ReadError, WriteError};
