//! Client configuration types.
//!
//! `ClientConfig` is the top-level `config.toml` of the client. All fields
//! have sensible defaults so an empty or missing file is valid.

use serde::{Deserialize, Serialize};

use crate::chat::ExchangeMode;

/// Base address used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Configuration for talking to the chat service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base address of the chat service (e.g. `http://localhost:8000`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whether exchanges use `/chat/stream` (true) or `/chat` (false).
    #[serde(default = "default_streaming")]
    pub streaming: bool,

    /// TCP connect timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Request timeout in seconds.
    ///
    /// `/chat` and `/health` must finish within it. A `/chat/stream` body
    /// may run longer; only the gap between two chunks is limited.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_streaming() -> bool {
    true
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    300
}

impl ClientConfig {
    /// Exchange mode implied by the `streaming` flag.
    pub fn mode(&self) -> ExchangeMode {
        if self.streaming {
            ExchangeMode::Streaming
        } else {
            ExchangeMode::SingleShot
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            streaming: default_streaming(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
