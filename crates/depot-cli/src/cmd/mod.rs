pub mod config;
pub mod equipment;
pub mod init;
pub mod movements;
pub mod serve;
pub mod supplier;

use anyhow::Context;
use depot_core::backend::HttpBackend;
use depot_core::config::Config;
use std::path::Path;

/// Load config for `root`, then apply `DEPOT_API_URL` and `--api-url` in that order.
pub fn load_config(root: &Path, api_url: Option<&str>) -> anyhow::Result<Config> {
    let mut config = Config::load_with_env(root).context("failed to load config")?;
    if let Some(url) = api_url {
        config.api.base_url = url.to_string();
    }
    Ok(config)
}

pub fn connect(config: &Config) -> anyhow::Result<HttpBackend> {
    let backend = HttpBackend::new(&config.api).context("failed to build HTTP client")?;
    tracing::debug!(base_url = backend.base_url(), "using inventory API");
    Ok(backend)
}
