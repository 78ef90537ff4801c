//! Config command handler

use anyhow::{Context, Result};

use markstash_core::Config;

/// Show the effective configuration
pub fn show(config: &Config, json: bool) -> Result<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(config).context("Failed to serialize config")?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("{}", config.to_toml()?.trim_end());
    println!();
    println!("Config file: {}", Config::config_file_path().display());
    println!("Database:    {}", config.database_path().display());

    Ok(())
}
