//! HTTP client for an Ollama-compatible completion server.

use super::stream::FragmentDecoder;
use super::{CompletionClient, CompletionRequest};
use crate::errors::OracleError;
use async_trait::async_trait;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

/// Completion client backed by an Ollama-compatible chat endpoint.
///
/// Responses are requested in streaming mode and reassembled by
/// [`FragmentDecoder`]; callers see only the final concatenated text.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

/// Request body for `POST /api/chat`.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    options: &'a super::SamplingOptions,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body for `GET /api/tags`.
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List the model names the server has available.
    ///
    /// Used as a preflight check before a batch run: an unreachable
    /// server or a missing model should fail before any document is
    /// read.
    pub async fn list_models(&self) -> Result<Vec<String>, OracleError> {
        let resp = self
            .http
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(OracleError::Status {
                status: resp.status().as_u16(),
            });
        }

        let tags: TagsResponse = resp.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl CompletionClient for OllamaClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, OracleError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You are a helpful assistant.",
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            options: &request.options,
            stream: true,
        };

        let resp = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(OracleError::Status {
                status: resp.status().as_u16(),
            });
        }

        let mut decoder = FragmentDecoder::new();
        let mut stream = resp.bytes_stream();
        while let Some(piece) = stream.next().await {
            decoder.feed(&piece?);
        }
        decoder.finish()
    }
}
