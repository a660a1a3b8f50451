//! Configuration loading and management.
//!
//! - [`types`]: config structs, file loading, per-server resolution
//! - [`defaults`]: serde default functions
//! - [`validation`]: startup checks

mod defaults;
mod types;
mod validation;

pub use types::{
    Config, ConfigError, ConnectionConfig, DisplayConfig, EngineConfig, IdentityConfig,
    ServerEntry,
};
pub use validation::{validate, ValidationError};
