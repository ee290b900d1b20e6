use super::load_config;
use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use depot_core::config::{Config, WarnLevel};
use depot_core::DepotError;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration (token redacted)
    Show,

    /// Validate the config for common mistakes
    Validate,
}

pub fn run(
    root: &Path,
    api_url: Option<&str>,
    subcmd: ConfigSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, api_url, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, api_url: Option<&str>, json: bool) -> anyhow::Result<()> {
    let mut config = load_config(root, api_url)?;
    let token_set = config.api.token.take().is_some();

    if json {
        let mut value = serde_json::to_value(&config)?;
        value["api"]["token_set"] = serde_json::Value::Bool(token_set);
        return print_json(&value);
    }

    println!("api.base_url:      {}", config.api.base_url);
    println!("api.timeout_secs:  {}", config.api.timeout_secs);
    println!("api.token:         {}", if token_set { "(set)" } else { "(none)" });
    let hidden: Vec<&str> = config
        .dashboard
        .hidden_columns
        .iter()
        .map(|c| c.as_str())
        .collect();
    println!(
        "hidden columns:    {}",
        if hidden.is_empty() {
            "(none)".to_string()
        } else {
            hidden.join(", ")
        }
    );
    println!(
        "movement date:     {}",
        serde_json::to_value(config.dashboard.movement_date_on_transition)?
            .as_str()
            .unwrap_or_default()
    );
    println!("server.port:       {}", config.server.port);
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    if !Config::exists(root) {
        return Err(DepotError::NotInitialized.into());
    }
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);
    if has_errors {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}
