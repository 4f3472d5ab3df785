//! The `config` command: show, init, and validate.

use crate::config::Config;
use anyhow::Result;
use console::style;
use std::path::Path;

/// Print the fully resolved configuration.
pub fn config_show(config: &Config) -> Result<()> {
    println!("project_dir = {}", config.project_dir.display());
    println!("base_url    = {}", config.base_url);
    println!("model       = {}", config.model);
    println!("output_dir  = {}", config.output_dir.display());
    println!(
        "folders     = [{}]",
        config
            .folders
            .iter()
            .map(|f| format!("\"{f}\""))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("hosted.api_base  = {}", config.hosted_api_base);
    println!("hosted.token_url = {}", config.hosted_token_url);
    Ok(())
}

/// Write a default `distill.toml` into the project directory.
pub fn config_init(project_dir: &Path) -> Result<()> {
    let path = Config::init_file(project_dir)?;
    println!(
        "{} wrote {}",
        style("Created:").green().bold(),
        path.display()
    );
    Ok(())
}

/// Confirm the configuration file parses and resolves.
///
/// `Config::load` has already run by the time we get here, so reaching
/// this point means validation passed.
pub fn config_validate(config: &Config) -> Result<()> {
    println!(
        "{} configuration for {} is valid",
        style("OK:").green().bold(),
        config.project_dir.display()
    );
    Ok(())
}
