use anyhow::Context;
use depot_core::{config::Config, paths};
use std::path::Path;

pub fn run(root: &Path, api_url: Option<&str>) -> anyhow::Result<()> {
    println!("Initializing depot in: {}", root.display());

    let config_path = paths::config_path(root);
    if config_path.exists() {
        println!("  exists:  {}", paths::CONFIG_FILE);
        return Ok(());
    }

    let mut cfg = Config::default();
    if let Some(url) = api_url {
        cfg.api.base_url = url.to_string();
    }
    cfg.save(root)
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    println!("  created: {}", paths::CONFIG_FILE);
    Ok(())
}
