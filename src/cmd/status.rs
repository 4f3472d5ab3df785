//! The `status` and `models` commands.

use crate::config::Config;
use crate::discover::discover_documents;
use crate::oracle::OllamaClient;
use crate::sink::SUMMARY_SUFFIX;
use anyhow::Result;
use console::style;

/// Print project configuration, server reachability, and how much work
/// is pending.
pub async fn status(config: &Config) -> Result<()> {
    println!("{}", style("Project").bold().underlined());
    println!("  directory:  {}", config.project_dir.display());
    println!("  output dir: {}", config.output_dir.display());
    if config.folders.is_empty() {
        println!("  folders:    (entire project)");
    } else {
        println!("  folders:    {}", config.folders.join(", "));
    }

    println!();
    println!("{}", style("Server").bold().underlined());
    println!("  base url: {}", config.base_url);
    println!("  model:    {}", config.model);

    let client = OllamaClient::new(&config.base_url, &config.model);
    match client.list_models().await {
        Ok(available) => {
            let model_present = available.iter().any(|name| name == &config.model);
            println!("  status:   {}", style("reachable").green());
            if !model_present {
                println!(
                    "  warning:  model '{}' not installed on server",
                    config.model
                );
            }
        }
        Err(e) => {
            println!("  status:   {} ({})", style("unreachable").red(), e);
        }
    }

    let pending = discover_documents(config)?;
    let existing = count_summaries(config);
    println!();
    println!("{}", style("Documents").bold().underlined());
    println!("  pending:    {}", pending.len());
    println!("  summarized: {existing}");
    Ok(())
}

/// List the model names the completion server reports.
pub async fn models(config: &Config) -> Result<()> {
    let client = OllamaClient::new(&config.base_url, &config.model);
    let available = client.list_models().await?;

    if available.is_empty() {
        println!("No models installed on {}", config.base_url);
        return Ok(());
    }
    for name in &available {
        if name == &config.model {
            println!("{} {}", style("*").green().bold(), name);
        } else {
            println!("  {name}");
        }
    }
    Ok(())
}

fn count_summaries(config: &Config) -> usize {
    if !config.output_dir.exists() {
        return 0;
    }
    walkdir::WalkDir::new(&config.output_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(SUMMARY_SUFFIX))
        })
        .count()
}
