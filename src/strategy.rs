//! Size-driven strategy selection.
//!
//! A document's estimated size places it in one of three tiers, each
//! bundling the parameters the rest of the pipeline needs: section count
//! for the outline, whether an outline pass runs at all, whether the
//! document is folded incrementally, and the chunk/overlap sizes used
//! when it is. The strategy is selected once per document and never
//! changes mid-run.

use anyhow::{Result, bail};

/// Inclusive upper bound (in units) for the brief tier.
pub const SHORT_DOC_THRESHOLD: usize = 10_000;

/// Inclusive upper bound (in units) for the detailed tier.
pub const MEDIUM_DOC_THRESHOLD: usize = 15_000;

/// Summarization tier, ordered by document size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryTier {
    /// Whole document fits in one oracle call.
    Brief,
    /// Outline pass plus incremental folding, moderate windows.
    Detailed,
    /// Outline pass plus incremental folding, larger windows.
    Hierarchical,
}

impl SummaryTier {
    /// Lowercase name for display and logging.
    pub fn name(&self) -> &'static str {
        match self {
            SummaryTier::Brief => "brief",
            SummaryTier::Detailed => "detailed",
            SummaryTier::Hierarchical => "hierarchical",
        }
    }
}

impl std::fmt::Display for SummaryTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameter bundle selected once per document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryStrategy {
    pub tier: SummaryTier,
    /// Maximum number of top-level sections the outline may have.
    pub max_outline_sections: usize,
    /// Whether a structural outline pass runs before summarization.
    pub needs_outline: bool,
    /// Whether the document is folded chunk by chunk.
    pub use_incremental: bool,
    /// Window size in units.
    pub chunk_size: usize,
    /// Window overlap in units. Always strictly less than `chunk_size`.
    pub overlap_size: usize,
}

impl SummaryStrategy {
    /// Construct a strategy, validating the overlap invariant.
    ///
    /// An overlap at or above the chunk size would make the chunker's
    /// window never advance, so it is rejected here rather than looping
    /// forever downstream.
    pub fn new(
        tier: SummaryTier,
        max_outline_sections: usize,
        needs_outline: bool,
        use_incremental: bool,
        chunk_size: usize,
        overlap_size: usize,
    ) -> Result<Self> {
        if chunk_size == 0 {
            bail!("Chunk size must be positive");
        }
        if overlap_size >= chunk_size {
            bail!(
                "Overlap size {} must be smaller than chunk size {}",
                overlap_size,
                chunk_size
            );
        }
        Ok(Self {
            tier,
            max_outline_sections,
            needs_outline,
            use_incremental,
            chunk_size,
            overlap_size,
        })
    }
}

/// Map an estimated document size to a strategy.
///
/// Pure, deterministic threshold lookup. Boundary sizes resolve to the
/// lower tier: a document of exactly `SHORT_DOC_THRESHOLD` units is
/// still brief.
pub fn select_strategy(size_units: usize) -> SummaryStrategy {
    if size_units <= SHORT_DOC_THRESHOLD {
        SummaryStrategy {
            tier: SummaryTier::Brief,
            max_outline_sections: 3,
            needs_outline: false,
            use_incremental: false,
            // The whole document is one "chunk"; the chunker is bypassed.
            chunk_size: size_units.max(1),
            overlap_size: 0,
        }
    } else if size_units <= MEDIUM_DOC_THRESHOLD {
        SummaryStrategy {
            tier: SummaryTier::Detailed,
            max_outline_sections: 5,
            needs_outline: true,
            use_incremental: true,
            chunk_size: 8_000,
            overlap_size: 1_000,
        }
    } else {
        SummaryStrategy {
            tier: SummaryTier::Hierarchical,
            max_outline_sections: 8,
            needs_outline: true,
            use_incremental: true,
            chunk_size: 10_000,
            overlap_size: 1_500,
        }
    }
}
