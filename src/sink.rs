//! Summary output: path mapping, writing, and the cleanup pass.
//!
//! Summaries mirror the source tree under the output directory, so
//! `docs/q3/report.txt` lands at `<output_dir>/docs/q3/report_summary.txt`.
//! The mapping is the single source of truth for both writing and the
//! "already summarized" check during discovery.

use crate::config::Config;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Suffix appended to a document's file stem to name its summary.
pub const SUMMARY_SUFFIX: &str = "_summary.txt";

/// Characters stripped by the cleanup pass. Keeps word characters, basic
/// punctuation, and whitespace; drops markdown artifacts and control
/// characters the oracle sometimes emits.
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9.,!?\s]").expect("pattern is a valid static regex"));

/// Compute the summary path for `source` under the output directory.
///
/// Sources outside the project dir (which discovery never yields) fall
/// back to a flat layout directly under the output dir.
pub fn summary_path_for(config: &Config, source: &Path) -> PathBuf {
    let relative = source
        .strip_prefix(&config.project_dir)
        .unwrap_or_else(|_| Path::new(source.file_name().unwrap_or_default()));

    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let file_name = format!("{stem}{SUMMARY_SUFFIX}");

    match relative.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            config.output_dir.join(parent).join(file_name)
        }
        _ => config.output_dir.join(file_name),
    }
}

/// Write `summary` for `source`, creating parent directories as needed.
pub fn write_summary(config: &Config, source: &Path, summary: &str) -> Result<PathBuf> {
    let path = summary_path_for(config, source);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, summary)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = summary.len(), "Wrote summary");
    Ok(path)
}

/// Strip disallowed characters from oracle output.
pub fn sanitize(text: &str) -> String {
    DISALLOWED.replace_all(text, "").into_owned()
}

/// Result of a cleanup pass over the output directory.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub scanned: usize,
    pub rewritten: usize,
}

/// Sanitize every summary file in place. Files already clean are left
/// untouched so their mtimes survive.
pub fn clean_summaries(config: &Config) -> Result<CleanStats> {
    let mut stats = CleanStats::default();
    if !config.output_dir.exists() {
        return Ok(stats);
    }

    for entry in walkdir::WalkDir::new(&config.output_dir)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some("txt")
        {
            continue;
        }

        stats.scanned += 1;
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let cleaned = sanitize(&raw);
        if cleaned != raw {
            std::fs::write(path, &cleaned)
                .with_context(|| format!("Failed to rewrite {}", path.display()))?;
            tracing::debug!(path = %path.display(), "Sanitized summary");
            stats.rewritten += 1;
        }
    }

    Ok(stats)
}
