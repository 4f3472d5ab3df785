//! Overlapping window chunking.
//!
//! Splits a document into an ordered sequence of character windows so
//! each fits the oracle's effective context. Consecutive windows overlap
//! so sentences straddling a boundary appear whole in at least one
//! chunk. Chunking is a pure function of its inputs: calling it twice
//! with the same arguments yields the same sequence.

/// A contiguous half-open span `[start, end)` of a document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Byte offset of the window start in the source text.
    pub start: usize,
    /// Byte offset one past the window end.
    pub end: usize,
    /// The materialized window text.
    pub text: String,
}

impl Chunk {
    /// Window length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split `text` into overlapping windows of at most `chunk_chars` bytes.
///
/// If the whole text fits in one window it is returned as the single
/// chunk. Otherwise window `i + 1` starts `overlap_chars` before the end
/// of window `i`, and iteration stops the moment a window's end reaches
/// the end of the text; the final window is emitted as-is even when
/// shorter than the nominal size.
///
/// Window edges are snapped to UTF-8 character boundaries, so actual
/// sizes can deviate from the nominal ones by a few bytes. Callers must
/// keep `overlap_chars < chunk_chars` (the strategy layer validates
/// this); the overlap is clamped here as a last resort so the window
/// always advances.
pub fn chunk_text(text: &str, chunk_chars: usize, overlap_chars: usize) -> Vec<Chunk> {
    let chunk_chars = chunk_chars.max(1);
    let overlap_chars = overlap_chars.min(chunk_chars - 1);

    if text.len() <= chunk_chars {
        return vec![Chunk {
            start: 0,
            end: text.len(),
            text: text.to_string(),
        }];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let mut end = floor_char_boundary(text, (start + chunk_chars).min(text.len()));
        if end <= start {
            // A single character wider than the window; take it whole.
            end = ceil_char_boundary(text, start + 1);
        }

        chunks.push(Chunk {
            start,
            end,
            text: text[start..end].to_string(),
        });

        if end >= text.len() {
            break;
        }
        let next_start = floor_char_boundary(text, end.saturating_sub(overlap_chars));
        // Boundary snapping can eat the whole advance when the overlap is
        // within a few bytes of the window size; force progress.
        start = if next_start > start {
            next_start
        } else {
            ceil_char_boundary(text, start + 1)
        };
    }

    chunks
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index.min(text.len())
}
