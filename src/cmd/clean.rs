//! The `clean` command: sanitize summaries already on disk.

use crate::config::Config;
use crate::sink::clean_summaries;
use anyhow::Result;
use console::style;

pub fn clean(config: &Config) -> Result<()> {
    let stats = clean_summaries(config)?;
    println!(
        "{} {} summaries scanned, {} rewritten",
        style("Clean:").green().bold(),
        stats.scanned,
        stats.rewritten
    );
    Ok(())
}
