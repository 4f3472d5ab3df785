//! Context size estimation.
//!
//! The oracle's context budget is measured in abstract units rather than
//! characters. We approximate one unit per [`CHARS_PER_UNIT`] characters;
//! the same ratio is used everywhere sizes cross between character space
//! (chunking) and unit space (strategy thresholds, the compression
//! ceiling), so the two stay consistent.

/// Characters per estimated context unit.
pub const CHARS_PER_UNIT: usize = 4;

/// Estimate the context size of a block of text, in units.
///
/// Non-negative, monotone in text length, and pure. The approximation is
/// deliberately crude; only its consistency matters.
pub fn estimate_units(text: &str) -> usize {
    text.len() / CHARS_PER_UNIT
}

/// Convert a size in units back into characters.
pub fn units_to_chars(units: usize) -> usize {
    units * CHARS_PER_UNIT
}
