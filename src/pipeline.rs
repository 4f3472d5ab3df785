//! The summarization pipeline, end to end for a single document.
//!
//! Control flow: estimate size → select strategy → outline pass (if the
//! tier needs one) → chunk → incremental reduce. Small documents skip
//! chunking entirely and cost exactly one oracle call. The pipeline is a
//! pure function of `(document, oracle client, sampling options)`; all
//! state lives on the stack for the duration of one call and nothing is
//! shared across documents.

use crate::chunk::chunk_text;
use crate::errors::OracleError;
use crate::estimate::{estimate_units, units_to_chars};
use crate::oracle::{CompletionClient, CompletionRequest, SamplingOptions};
use crate::outline::extract_outline;
use crate::prompt::summary_prompt;
use crate::reduce::reduce;
use crate::strategy::select_strategy;
use crate::ui::SummarizeUi;

/// Summarize one document's text into a bounded-length summary.
pub async fn summarize_document(
    client: &dyn CompletionClient,
    text: &str,
    options: &SamplingOptions,
    ui: &SummarizeUi,
) -> Result<String, OracleError> {
    let units = estimate_units(text);
    let strategy = select_strategy(units);
    tracing::info!(units, tier = %strategy.tier, "Selected summarization strategy");

    let outline = if strategy.needs_outline {
        ui.outline_pass();
        extract_outline(client, text, &strategy, options).await?
    } else {
        String::new()
    };

    if !strategy.use_incremental {
        ui.chunk(1, 1);
        let request = CompletionRequest::new(summary_prompt(&strategy, &outline, "", text))
            .with_options(options.clone());
        return client.complete(&request).await;
    }

    let chunks = chunk_text(
        text,
        units_to_chars(strategy.chunk_size),
        units_to_chars(strategy.overlap_size),
    );
    tracing::info!(chunks = chunks.len(), "Chunked document for incremental reduction");

    reduce(client, &chunks, &outline, &strategy, options, ui).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::testing::StubClient;

    async fn summarize(client: &StubClient, text: &str) -> Result<String, OracleError> {
        summarize_document(
            client,
            text,
            &SamplingOptions::deterministic(),
            &SummarizeUi::hidden(),
        )
        .await
    }

    #[tokio::test]
    async fn test_short_document_single_oracle_call() {
        // Under the short threshold: 10_000 units = 40_000 chars.
        let text = "a".repeat(20_000);
        let client = StubClient::repeating("the summary");
        let summary = summarize(&client, &text).await.unwrap();

        assert_eq!(summary, "the summary");
        assert_eq!(client.call_count(), 1);
        // No outline pass, no incremental framing.
        let prompt = &client.prompts()[0];
        assert!(!prompt.contains("DOCUMENT STRUCTURE"));
        assert!(prompt.contains("initial summary") || prompt.contains("first section"));
    }

    #[tokio::test]
    async fn test_medium_document_outline_plus_chunks() {
        // 48_000 chars = 12_000 units: detailed tier, 32_000-char windows
        // with 4_000-char overlap over 48_000 chars -> 2 chunks.
        let text = "b".repeat(48_000);
        let client = StubClient::counting("S");
        let summary = summarize(&client, &text).await.unwrap();

        // Call 1 outline, calls 2-3 the two chunks.
        assert_eq!(client.call_count(), 3);
        assert_eq!(summary, "S3");

        let prompts = client.prompts();
        assert!(prompts[0].contains("structure analyst"));
        // The outline (S1) is shared context for both chunk calls.
        assert!(prompts[1].contains("S1"));
        assert!(prompts[2].contains("S1"));
    }

    #[tokio::test]
    async fn test_large_document_uses_hierarchical_windows() {
        // 100_000 chars = 25_000 units: hierarchical tier, 40_000-char
        // windows with 6_000-char overlap -> [0,40k),[34k,74k),[68k,100k).
        let text = "c".repeat(100_000);
        let client = StubClient::counting("S");
        summarize(&client, &text).await.unwrap();

        // 1 outline + 3 chunks.
        assert_eq!(client.call_count(), 4);
    }

    #[tokio::test]
    async fn test_outline_failure_is_pipeline_fatal() {
        let text = "d".repeat(48_000);
        let client = StubClient::failing();
        let result = summarize(&client, &text).await;

        assert!(matches!(result, Err(OracleError::EmptyStream)));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_document() {
        let client = StubClient::repeating("empty summary");
        let summary = summarize(&client, "").await.unwrap();
        assert_eq!(summary, "empty summary");
        assert_eq!(client.call_count(), 1);
    }
}
