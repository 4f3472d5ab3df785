//! Incremental reduction of a chunk sequence into one summary.
//!
//! The reducer folds chunks in order, carrying a single running summary.
//! Each oracle call sees the outline, the running summary so far, and
//! one chunk, and returns a complete updated summary that *replaces* the
//! previous one — the oracle is asked for the whole summary each time,
//! never a delta. Later chunks therefore depend on earlier ones, which
//! is why the loop is strictly sequential.
//!
//! After every update a compression guard re-estimates the running
//! summary; past a fixed ceiling, one extra oracle call shrinks it back
//! before the next chunk. This bounds the context fed to every
//! subsequent call no matter how long the document is.
//!
//! Replace-then-compress means information from an earlier chunk can be
//! dropped if the oracle's update omits it. That is the documented
//! behavior of this reduction, not a bug.

use crate::chunk::Chunk;
use crate::errors::OracleError;
use crate::estimate::estimate_units;
use crate::oracle::{CompletionClient, CompletionRequest, SamplingOptions};
use crate::prompt::{compress_prompt, summary_prompt};
use crate::strategy::SummaryStrategy;
use crate::ui::SummarizeUi;

/// Ceiling on the running summary's estimated size, in units.
///
/// Independent of document tier; shares its unit scale with
/// [`estimate_units`].
pub const SUMMARY_CEILING_UNITS: usize = 8_000;

/// Fold `chunks` into a single summary string.
///
/// Any oracle failure aborts the reduction; no partial running summary
/// escapes. Retry, if ever added, belongs in the oracle client, not
/// here.
pub async fn reduce(
    client: &dyn CompletionClient,
    chunks: &[Chunk],
    outline: &str,
    strategy: &SummaryStrategy,
    options: &SamplingOptions,
    ui: &SummarizeUi,
) -> Result<String, OracleError> {
    let mut running_summary = String::new();

    for (index, chunk) in chunks.iter().enumerate() {
        ui.chunk(index + 1, chunks.len());
        tracing::debug!(
            chunk = index + 1,
            total = chunks.len(),
            chunk_bytes = chunk.len(),
            "Summarizing chunk"
        );

        let request = CompletionRequest::new(summary_prompt(
            strategy,
            outline,
            &running_summary,
            &chunk.text,
        ))
        .with_options(options.clone());
        running_summary = client.complete(&request).await?;

        if estimate_units(&running_summary) > SUMMARY_CEILING_UNITS {
            ui.compressing();
            tracing::debug!(
                units = estimate_units(&running_summary),
                ceiling = SUMMARY_CEILING_UNITS,
                "Running summary over ceiling, compressing"
            );
            let request = CompletionRequest::new(compress_prompt(&running_summary))
                .with_options(options.clone());
            running_summary = client.complete(&request).await?;
        }
    }

    Ok(running_summary)
}
