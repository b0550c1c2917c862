use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub rollback: RollbackConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    400
}

/// Rollback policy for remote failures after an optimistic local change.
///
/// Create and tag-add always roll back. Tag-remove and delete historically
/// did not; these switches make that behavior explicit and reversible.
#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct RollbackConfig {
    #[serde(default)]
    pub remove_tag: bool,
    #[serde(default)]
    pub delete: bool,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate store
    if !config.store.base_url.starts_with("http://") && !config.store.base_url.starts_with("https://")
    {
        anyhow::bail!(
            "store.base_url must start with http:// or https://, got '{}'",
            config.store.base_url
        );
    }
    if config.store.timeout_secs == 0 {
        anyhow::bail!("store.timeout_secs must be > 0");
    }

    // Trailing slashes would double up when joining API paths.
    while config.store.base_url.ends_with('/') {
        config.store.base_url.pop();
    }

    Ok(config)
}
