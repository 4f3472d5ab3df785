//! The `run` and `summarize` commands: batch and single-document
//! summarization.

use crate::config::Config;
use crate::discover::discover_documents;
use crate::estimate::estimate_units;
use crate::oracle::{OllamaClient, SamplingOptions};
use crate::pipeline::summarize_document;
use crate::sink::write_summary;
use crate::source::{SourceKind, read_document};
use crate::strategy::select_strategy;
use crate::ui::SummarizeUi;
use anyhow::{Context, Result, bail};
use console::style;
use std::path::Path;

/// Summarize every discovered document that does not yet have a summary.
///
/// Per-document failures skip that document; the batch always runs to
/// completion. Only setup failures (unreachable server, missing model)
/// abort the command.
pub async fn run(config: &Config) -> Result<()> {
    let client = OllamaClient::new(&config.base_url, &config.model);
    preflight(&client).await?;

    let documents = discover_documents(config)?;
    if documents.is_empty() {
        println!("{} nothing to summarize", style("Done:").green().bold());
        return Ok(());
    }

    let session = if documents
        .iter()
        .any(|p| SourceKind::from_path(p) == Some(SourceKind::HostedDoc))
    {
        super::try_hosted_session(config).await
    } else {
        None
    };

    let ui = SummarizeUi::new(documents.len() as u64, config.verbose);
    let mut summarized = 0;
    let mut skipped = 0;

    for document in &documents {
        let name = display_name(config, document);

        let text = match read_document(document, session.as_ref()).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                ui.document_skipped(&name, "document is empty");
                skipped += 1;
                continue;
            }
            Err(e) => {
                tracing::warn!(document = %name, error = %e, "Skipping unreadable document");
                ui.document_skipped(&name, &e.to_string());
                skipped += 1;
                continue;
            }
        };

        let units = estimate_units(&text);
        let strategy = select_strategy(units);
        ui.start_document(&name, strategy.tier.name(), units);

        match summarize_document(&client, &text, &SamplingOptions::default(), &ui).await {
            Ok(summary) => match write_summary(config, document, &summary) {
                Ok(_) => {
                    ui.document_done(&name);
                    summarized += 1;
                }
                Err(e) => {
                    tracing::warn!(document = %name, error = %e, "Failed to write summary");
                    ui.document_skipped(&name, &e.to_string());
                    skipped += 1;
                }
            },
            Err(e) => {
                tracing::warn!(document = %name, error = %e, "Summarization failed");
                ui.document_skipped(&name, &e.to_string());
                skipped += 1;
            }
        }
    }

    ui.finish(summarized, skipped);

    // Post-batch sanitation over everything now on disk, new and old.
    let stats = crate::sink::clean_summaries(config)?;
    tracing::debug!(
        scanned = stats.scanned,
        rewritten = stats.rewritten,
        "Cleanup pass complete"
    );
    Ok(())
}

/// Summarize a single file; with `to_stdout` the summary goes to stdout
/// instead of the output directory.
pub async fn summarize_one(config: &Config, file: &Path, to_stdout: bool) -> Result<()> {
    let client = OllamaClient::new(&config.base_url, &config.model);
    preflight(&client).await?;

    let file = file
        .canonicalize()
        .with_context(|| format!("File not found: {}", file.display()))?;

    let session = if SourceKind::from_path(&file) == Some(SourceKind::HostedDoc) {
        super::try_hosted_session(config).await
    } else {
        None
    };

    let text = read_document(&file, session.as_ref())
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    if text.trim().is_empty() {
        bail!("{} is empty", file.display());
    }

    let ui = if to_stdout {
        SummarizeUi::hidden()
    } else {
        SummarizeUi::new(1, config.verbose)
    };
    let units = estimate_units(&text);
    let strategy = select_strategy(units);
    ui.start_document(&display_name(config, &file), strategy.tier.name(), units);

    let summary = summarize_document(&client, &text, &SamplingOptions::default(), &ui).await?;

    if to_stdout {
        println!("{summary}");
    } else {
        let path = write_summary(config, &file, &summary)?;
        ui.document_done(&display_name(config, &file));
        ui.finish(1, 0);
        println!("Summary written to {}", path.display());
    }
    Ok(())
}

/// Verify the server is reachable and the configured model is present
/// before touching any document.
async fn preflight(client: &OllamaClient) -> Result<()> {
    let available = client
        .list_models()
        .await
        .with_context(|| format!("Completion server unreachable at {}", client.base_url()))?;

    if !available.iter().any(|name| name == client.model()) {
        bail!(
            "Model '{}' not found on the server. Available: {}",
            client.model(),
            if available.is_empty() {
                "(none)".to_string()
            } else {
                available.join(", ")
            }
        );
    }
    Ok(())
}

fn display_name(config: &Config, path: &Path) -> String {
    path.strip_prefix(&config.project_dir)
        .unwrap_or(path)
        .display()
        .to_string()
}
