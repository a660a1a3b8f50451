//! Connection status and the server-confirmed identity.

use std::fmt;

/// Lifecycle state of one engine.
///
/// Only the engine task writes it; everyone else observes through
/// [`super::EngineHandle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "DISCONNECTED",
            Self::Connecting => "CONNECTING",
            Self::Connected => "CONNECTED",
            Self::Disconnecting => "DISCONNECTING",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity string from the numeric 001 welcome.
///
/// Set at most once per connection and cleared before every new attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionIdentity(Option<String>);

impl SessionIdentity {
    /// Record `identity` unless one is already held. Returns whether it was stored.
    pub fn capture(&mut self, identity: &str) -> bool {
        if self.0.is_some() {
            return false;
        }
        self.0 = Some(identity.to_string());
        true
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }
}
