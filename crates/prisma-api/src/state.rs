//! Application state wiring configuration and the chat transport together.
//!
//! The dispatcher is generic over its transport; AppState pins it to the
//! HTTP implementation from prisma-infra.

use std::path::PathBuf;

use prisma_core::chat::dispatcher::RequestDispatcher;
use prisma_infra::config::{apply_overrides, load_client_config, resolve_config_dir};
use prisma_infra::http::HttpChatTransport;
use prisma_types::config::ClientConfig;
use tracing::debug;

/// Dispatcher pinned to the HTTP transport.
pub type ConcreteDispatcher = RequestDispatcher<HttpChatTransport>;

/// State shared by every command.
pub struct AppState {
    pub config: ClientConfig,
    pub config_dir: PathBuf,
    pub dispatcher: ConcreteDispatcher,
}

impl AppState {
    /// Load configuration, apply CLI overrides and build the transport.
    ///
    /// `base_url` is the `--base-url` / `PRISMA_BASE_URL` value, if any.
    pub async fn init(base_url: Option<String>, single_shot: bool) -> anyhow::Result<Self> {
        let config_dir = resolve_config_dir();
        let config = load_client_config(&config_dir).await;
        let config = apply_overrides(config, base_url, single_shot);

        let transport = HttpChatTransport::new(&config)?;
        debug!(
            base_url = transport.base_url(),
            mode = %config.mode(),
            "transport ready"
        );

        Ok(Self {
            config,
            config_dir,
            dispatcher: RequestDispatcher::new(transport),
        })
    }

    /// Base address of the chat service, as validated by the transport.
    pub fn base_url(&self) -> &str {
        self.dispatcher.transport().base_url()
    }
}
