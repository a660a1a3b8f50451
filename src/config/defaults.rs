//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

// =============================================================================
// Identity Defaults
// =============================================================================

pub fn default_port() -> u16 {
    6667
}

pub fn default_nick() -> String {
    "TestClient".to_string()
}

pub fn default_ident() -> String {
    "Someone".to_string()
}

pub fn default_realname() -> String {
    "Someone".to_string()
}

// =============================================================================
// Engine Defaults
// =============================================================================

pub fn default_retry_backoff_secs() -> u64 {
    5
}

pub fn default_status_poll_millis() -> u64 {
    1000
}

pub fn default_max_line_len() -> usize {
    somewhere_proto::DEFAULT_MAX_LINE_LEN
}
