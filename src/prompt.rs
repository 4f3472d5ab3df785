//! Prompt construction for the three oracle call sites.
//!
//! Wording here is deliberately plain; the pipeline only depends on the
//! structural pieces — which context is injected (outline, running
//! summary) and how the running summary is framed ("initial" versus
//! "already covered, do not repeat").

use crate::strategy::{SummaryStrategy, SummaryTier};

/// Build the outline-extraction prompt for a whole document.
pub fn outline_prompt(strategy: &SummaryStrategy, document: &str) -> String {
    let depth = match strategy.tier {
        SummaryTier::Brief => "a simple outline of the main points",
        SummaryTier::Detailed => "a detailed outline with subsections under each main section",
        SummaryTier::Hierarchical => {
            "a comprehensive hierarchical outline down to individual arguments and evidence"
        }
    };

    let mut prompt = String::new();
    prompt.push_str(
        "You are a document structure analyst. Read the entire document below and extract \
         its organizational structure, key themes, and logical flow.\n\n",
    );
    prompt.push_str(&format!(
        "Produce {} with at most {} main sections. Use Roman numerals for main sections \
         and indented bullet points beneath them. Keep every point concise.\n\n",
        depth, strategy.max_outline_sections
    ));
    prompt.push_str("=== DOCUMENT TO ANALYZE ===\n");
    prompt.push_str(document);
    prompt
}

/// Build the summarization prompt for one chunk (or, for non-incremental
/// tiers, the whole document).
///
/// `outline` and `running_summary` are injected when non-empty. A
/// non-empty running summary flips the framing from "produce an initial
/// summary" to "update without repeating what is already covered".
pub fn summary_prompt(
    strategy: &SummaryStrategy,
    outline: &str,
    running_summary: &str,
    text: &str,
) -> String {
    let register = match strategy.tier {
        SummaryTier::Brief => {
            "Create a comprehensive summary that captures the essential information, \
             examples, and insights of the document."
        }
        SummaryTier::Detailed => {
            "Create an extensive, detailed summary that covers every section, argument, \
             and piece of evidence, preserving specific numbers, names, and terms."
        }
        SummaryTier::Hierarchical => {
            "Create an exhaustive summary that preserves the document's full scope and \
             hierarchical organization, including all technical detail and methodology."
        }
    };

    let mut prompt = String::new();
    prompt.push_str("You are a professional document summarizer. ");
    prompt.push_str(register);
    prompt.push('\n');

    if !outline.is_empty() {
        prompt.push_str("\nDOCUMENT STRUCTURE TO FOLLOW:\n");
        prompt.push_str(outline);
        prompt.push('\n');
    }

    if running_summary.is_empty() {
        prompt.push_str(
            "\nThis is the first section of the document. Produce an initial summary.\n",
        );
    } else {
        prompt.push_str("\nCONTENT ALREADY COVERED BY THE SUMMARY SO FAR:\n");
        prompt.push_str(running_summary);
        prompt.push_str(
            "\n\nIMPORTANT: Produce a complete, updated summary that keeps everything \
             above and adds the new information from the section below. Do not repeat \
             information already covered.\n",
        );
    }

    prompt.push_str("\n=== TEXT TO PROCESS ===\n");
    prompt.push_str(text);
    prompt
}

/// Build the compression prompt for an oversized running summary.
pub fn compress_prompt(running_summary: &str) -> String {
    format!(
        "Compress this summary to its most essential information while preserving key \
         details, specific figures, and conclusions:\n\n{}",
        running_summary
    )
}
