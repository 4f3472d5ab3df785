//! Oracle client boundary.
//!
//! Every oracle interaction in the pipeline goes through the
//! [`CompletionClient`] trait: a prompt string in, generated text out.
//! Nothing else crosses this boundary, which keeps the pipeline testable
//! with a stub client and independent of any one provider's message
//! format.

mod ollama;
mod stream;

pub use ollama::OllamaClient;
pub use stream::FragmentDecoder;

use crate::errors::OracleError;
use async_trait::async_trait;
use serde::Serialize;

/// Sampling parameters sent with every completion request.
///
/// Serialized verbatim into the server's `options` object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplingOptions {
    /// Requested context window, in model tokens.
    pub num_ctx: u32,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub min_p: f32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            num_ctx: 128_000,
            temperature: 1.0,
            top_k: 64,
            top_p: 0.95,
            min_p: 0.0,
        }
    }
}

impl SamplingOptions {
    /// Greedy decoding settings, for repeatable runs and tests.
    pub fn deterministic() -> Self {
        Self {
            num_ctx: 128_000,
            temperature: 0.0,
            top_k: 1,
            top_p: 1.0,
            min_p: 0.0,
        }
    }
}

/// One completion request: the prompt plus how to sample the response.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub options: SamplingOptions,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            options: SamplingOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SamplingOptions) -> Self {
        self.options = options;
        self
    }
}

/// The external text-completion capability.
///
/// Implementations block (asynchronously) until the full response text
/// is available; the pipeline awaits each call before issuing the next,
/// so there is never more than one request in flight per document.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, OracleError>;
}

#[cfg(test)]
pub mod testing {
    //! Scriptable stub client for pipeline tests.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    enum Script {
        /// Always return the same text.
        Repeat(String),
        /// Return `"{prefix}{n}"` with n counting up from 1.
        Counter { prefix: String, next: usize },
        /// Pop responses front to back; panics when exhausted.
        Sequence(VecDeque<String>),
        /// Always fail with an empty-stream error.
        Fail,
    }

    /// A deterministic in-memory oracle. Records every prompt it sees so
    /// tests can assert on call order and framing.
    pub struct StubClient {
        script: Mutex<Script>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubClient {
        pub fn repeating(text: impl Into<String>) -> Self {
            Self::with_script(Script::Repeat(text.into()))
        }

        pub fn counting(prefix: impl Into<String>) -> Self {
            Self::with_script(Script::Counter {
                prefix: prefix.into(),
                next: 1,
            })
        }

        pub fn sequence(responses: impl IntoIterator<Item = &'static str>) -> Self {
            Self::with_script(Script::Sequence(
                responses.into_iter().map(String::from).collect(),
            ))
        }

        pub fn failing() -> Self {
            Self::with_script(Script::Fail)
        }

        fn with_script(script: Script) -> Self {
            Self {
                script: Mutex::new(script),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// All prompts received so far, in call order.
        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionClient for StubClient {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, OracleError> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            let mut script = self.script.lock().unwrap();
            match &mut *script {
                Script::Repeat(text) => Ok(text.clone()),
                Script::Counter { prefix, next } => {
                    let response = format!("{}{}", prefix, next);
                    *next += 1;
                    Ok(response)
                }
                Script::Sequence(responses) => {
                    Ok(responses.pop_front().expect("stub script exhausted"))
                }
                Script::Fail => Err(OracleError::EmptyStream),
            }
        }
    }
}
