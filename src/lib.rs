//! distill — adaptive incremental summarization of long documents.
//!
//! Documents are sized, assigned a summarization tier, optionally
//! outlined, then folded chunk by chunk through a completion oracle
//! while a compression guard keeps the running summary bounded. The
//! binary wraps this library in a batch CLI that discovers documents,
//! writes summaries next to a mirrored tree, and isolates per-document
//! failures.

pub mod chunk;
pub mod cmd;
pub mod config;
pub mod discover;
pub mod errors;
pub mod estimate;
pub mod oracle;
pub mod outline;
pub mod pipeline;
pub mod prompt;
pub mod reduce;
pub mod sink;
pub mod source;
pub mod strategy;
pub mod ui;

pub use config::Config;
pub use errors::{AuthError, OracleError, SourceError};
pub use pipeline::summarize_document;
pub use strategy::{SummaryStrategy, SummaryTier, select_strategy};
