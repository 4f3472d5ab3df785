//! Structural outline pass.
//!
//! For tiers that need it, one oracle call over the whole document
//! produces an outline that every later chunk-summarization call sees as
//! shared context. The outline is the oracle's raw response, never
//! post-processed, and is read-only after creation.

use crate::errors::OracleError;
use crate::oracle::{CompletionClient, CompletionRequest, SamplingOptions};
use crate::prompt::outline_prompt;
use crate::strategy::SummaryStrategy;

/// Extract an outline for `document`, or return an empty string when the
/// strategy does not use one.
///
/// Failure of the oracle call propagates; there is no fallback outline.
pub async fn extract_outline(
    client: &dyn CompletionClient,
    document: &str,
    strategy: &SummaryStrategy,
    options: &SamplingOptions,
) -> Result<String, OracleError> {
    if !strategy.needs_outline {
        return Ok(String::new());
    }

    tracing::debug!(tier = %strategy.tier, "Extracting document outline");
    let request = CompletionRequest::new(outline_prompt(strategy, document))
        .with_options(options.clone());
    client.complete(&request).await
}
