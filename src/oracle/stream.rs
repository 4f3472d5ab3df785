//! Typed decoder for the server's streamed chat responses.
//!
//! The completion server delivers its response as newline-delimited JSON
//! fragments, each carrying a slice of the generated text. The decoder
//! consumes raw transport bytes in whatever pieces they arrive, splits
//! them on line boundaries independent of the transport's framing, and
//! concatenates the fragments into the final response text.
//!
//! A fragment that fails to parse is dropped silently; a stream that
//! yields zero usable fragments is an error.

use crate::errors::OracleError;
use serde::Deserialize;

/// One line of the server's stream-JSON chat output.
#[derive(Debug, Deserialize)]
pub struct ChatFragment {
    #[serde(default)]
    pub message: Option<FragmentMessage>,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Deserialize)]
pub struct FragmentMessage {
    #[serde(default)]
    pub content: String,
}

/// Incremental NDJSON fragment accumulator.
#[derive(Debug, Default)]
pub struct FragmentDecoder {
    buffer: Vec<u8>,
    text: String,
    usable_fragments: usize,
}

impl FragmentDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a piece of the transport stream. Pieces may split JSON lines
    /// at arbitrary byte positions; incomplete tails are buffered until
    /// the rest arrives.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.decode_line(&line[..line.len() - 1]);
        }
    }

    /// Consume the decoder, flushing any final unterminated line, and
    /// return the concatenated response text.
    pub fn finish(mut self) -> Result<String, OracleError> {
        let tail = std::mem::take(&mut self.buffer);
        self.decode_line(&tail);

        if self.usable_fragments == 0 {
            return Err(OracleError::EmptyStream);
        }
        Ok(self.text)
    }

    fn decode_line(&mut self, line: &[u8]) {
        if line.iter().all(|b| b.is_ascii_whitespace()) {
            return;
        }
        match serde_json::from_slice::<ChatFragment>(line) {
            Ok(fragment) => {
                if let Some(message) = fragment.message {
                    self.usable_fragments += 1;
                    self.text.push_str(&message.content);
                }
            }
            Err(err) => {
                // Malformed fragments are skipped, not fatal.
                tracing::debug!(error = %err, "Skipping malformed stream fragment");
            }
        }
    }
}
