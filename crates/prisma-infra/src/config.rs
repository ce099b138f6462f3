//! Client configuration loader.
//!
//! Reads `config.toml` from the config directory (`~/.prisma/` in
//! production) and deserializes it into [`ClientConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use prisma_types::config::ClientConfig;
use prisma_types::error::ChatError;

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "PRISMA_CONFIG_DIR";

/// Resolve the config directory.
///
/// `PRISMA_CONFIG_DIR` wins; otherwise `~/.prisma`, or `.prisma` in the
/// current directory when no home directory is known.
pub fn resolve_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".prisma");
    }

    PathBuf::from(".prisma")
}

/// Load client configuration from `{config_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ClientConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_client_config(config_dir: &Path) -> ClientConfig {
    let config_path = config_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// Apply command-line overrides on top of the loaded configuration.
///
/// `base_url` comes from `--base-url` or `PRISMA_BASE_URL` (clap resolves
/// that precedence); `single_shot` forces the non-streaming mode.
pub fn apply_overrides(
    mut config: ClientConfig,
    base_url: Option<String>,
    single_shot: bool,
) -> ClientConfig {
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    if single_shot {
        config.streaming = false;
    }
    config
}

/// Check that `raw` is an absolute http(s) URL and strip trailing slashes.
pub fn validate_base_url(raw: &str) -> Result<String, ChatError> {
    let trimmed = raw.trim().trim_end_matches('/');

    let url = reqwest::Url::parse(trimmed)
        .map_err(|e| ChatError::Config(format!("invalid base URL '{raw}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(ChatError::Config(format!(
            "invalid base URL '{raw}': unsupported scheme '{other}'"
        ))),
    }
}
