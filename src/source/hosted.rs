//! Hosted-document API access with an explicit token lifecycle.
//!
//! Sessions move through a small state machine instead of an ad-hoc
//! refresh-and-retry dance:
//!
//! ```text
//! NoToken ──────────────────────────► NeedsInteractiveConsent
//! HasExpiredToken ──► Refreshing ──┬► Authenticated
//!                                  └► NeedsInteractiveConsent
//! ```
//!
//! A cached token is loaded from `token_file`, classified by expiry, and
//! refreshed through the OAuth token endpoint when a refresh token is
//! available. A failed refresh invalidates the cache so the next attempt
//! starts from `NoToken`. Interactive consent itself is out of scope
//! here; when it is required the caller gets [`AuthError::ConsentRequired`]
//! and the affected documents are skipped.

use crate::errors::AuthError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Expire tokens slightly early so an in-flight request never carries a
/// token that dies mid-call.
const EXPIRY_SLACK_SECS: u64 = 60;

/// Where in its lifecycle the cached token currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    NoToken,
    HasExpiredToken,
    Refreshing,
    Authenticated,
    NeedsInteractiveConsent,
}

/// Token cache persisted at `token_file` between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix timestamp (seconds) after which the access token is invalid.
    #[serde(default)]
    pub expires_at: Option<u64>,
}

impl StoredToken {
    /// Classify this token (or its absence) into a lifecycle state.
    pub fn classify(token: Option<&StoredToken>, now: u64) -> TokenState {
        match token {
            None => TokenState::NoToken,
            Some(t) => match t.expires_at {
                Some(expires_at) if now + EXPIRY_SLACK_SECS >= expires_at => {
                    TokenState::HasExpiredToken
                }
                _ => TokenState::Authenticated,
            },
        }
    }
}

/// OAuth client credentials, read from `credentials.json`.
#[derive(Debug, Clone, Deserialize)]
struct Credentials {
    client_id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Something that can produce an authenticated [`HostedDocsClient`].
///
/// The production implementation is [`FileTokenSessionProvider`]; tests
/// substitute their own to exercise the fetch path without OAuth.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn session(&self) -> Result<HostedDocsClient, AuthError>;
}

/// Session provider backed by a credentials file and a token cache file.
pub struct FileTokenSessionProvider {
    http: reqwest::Client,
    api_base: String,
    token_url: String,
    credentials_file: PathBuf,
    token_file: PathBuf,
}

impl FileTokenSessionProvider {
    pub fn new(
        api_base: impl Into<String>,
        token_url: impl Into<String>,
        credentials_file: PathBuf,
        token_file: PathBuf,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token_url: token_url.into(),
            credentials_file,
            token_file,
        }
    }

    fn load_cached_token(&self) -> Option<StoredToken> {
        let raw = std::fs::read_to_string(&self.token_file).ok()?;
        match serde_json::from_str(&raw) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!(path = %self.token_file.display(), error = %e, "Ignoring unparseable token cache");
                None
            }
        }
    }

    fn load_credentials(&self) -> Result<Credentials, AuthError> {
        let raw = std::fs::read_to_string(&self.credentials_file).map_err(|_| {
            AuthError::MissingCredentials {
                path: self.credentials_file.clone(),
            }
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| AuthError::Api(format!("Malformed credentials file: {e}")))
    }

    fn persist_token(&self, token: &StoredToken) {
        match serde_json::to_string_pretty(token) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.token_file, json) {
                    tracing::warn!(path = %self.token_file.display(), error = %e, "Failed to persist token cache");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize token cache"),
        }
    }

    fn invalidate_token(&self) {
        let _ = std::fs::remove_file(&self.token_file);
    }

    async fn refresh(&self, refresh_token: &str) -> Result<StoredToken, AuthError> {
        let credentials = self.load_credentials()?;
        tracing::debug!("Refreshing hosted-document access token");

        let params = [
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        let resp = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::RefreshFailed {
                message: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(AuthError::RefreshFailed {
                message: format!("token endpoint returned HTTP {}", resp.status().as_u16()),
            });
        }

        let body: RefreshResponse = resp.json().await.map_err(|e| AuthError::RefreshFailed {
            message: e.to_string(),
        })?;

        Ok(StoredToken {
            access_token: body.access_token,
            refresh_token: Some(refresh_token.to_string()),
            expires_at: body.expires_in.map(|secs| now_secs() + secs),
        })
    }
}

#[async_trait]
impl SessionProvider for FileTokenSessionProvider {
    async fn session(&self) -> Result<HostedDocsClient, AuthError> {
        let cached = self.load_cached_token();
        let mut state = StoredToken::classify(cached.as_ref(), now_secs());

        let token = loop {
            match state {
                TokenState::Authenticated => {
                    // classify only returns Authenticated for Some(token)
                    break cached.clone().ok_or(AuthError::ConsentRequired)?;
                }
                TokenState::HasExpiredToken => {
                    state = TokenState::Refreshing;
                }
                TokenState::Refreshing => {
                    let refresh_token = cached.as_ref().and_then(|t| t.refresh_token.clone());
                    match refresh_token {
                        Some(rt) => match self.refresh(&rt).await {
                            Ok(fresh) => {
                                self.persist_token(&fresh);
                                break fresh;
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "Token refresh failed; consent required");
                                self.invalidate_token();
                                state = TokenState::NeedsInteractiveConsent;
                            }
                        },
                        None => {
                            self.invalidate_token();
                            state = TokenState::NoToken;
                        }
                    }
                }
                TokenState::NoToken => {
                    // Surface a missing credentials file as its own error
                    // so the fix is obvious.
                    self.load_credentials()?;
                    state = TokenState::NeedsInteractiveConsent;
                }
                TokenState::NeedsInteractiveConsent => {
                    return Err(AuthError::ConsentRequired);
                }
            }
        };

        Ok(HostedDocsClient::new(
            self.api_base.clone(),
            token.access_token,
        ))
    }
}

/// Authenticated client for fetching hosted-document text.
#[derive(Debug, Clone)]
pub struct HostedDocsClient {
    http: reqwest::Client,
    api_base: String,
    access_token: String,
}

/// Hosted document body, mirroring the docs API's nested JSON.
#[derive(Debug, Deserialize)]
struct HostedDocument {
    #[serde(default)]
    body: DocumentBody,
}

#[derive(Debug, Default, Deserialize)]
struct DocumentBody {
    #[serde(default)]
    content: Vec<StructuralElement>,
}

#[derive(Debug, Deserialize)]
struct StructuralElement {
    #[serde(default)]
    paragraph: Option<Paragraph>,
}

#[derive(Debug, Deserialize)]
struct Paragraph {
    #[serde(default)]
    elements: Vec<ParagraphElement>,
}

#[derive(Debug, Deserialize)]
struct ParagraphElement {
    #[serde(rename = "textRun", default)]
    text_run: Option<TextRun>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    #[serde(default)]
    content: String,
}

impl HostedDocsClient {
    pub fn new(api_base: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// Fetch a document and flatten its paragraph runs into plain text.
    pub async fn fetch_document_text(&self, doc_id: &str) -> Result<String, AuthError> {
        let resp = self
            .http
            .get(format!("{}/documents/{}", self.api_base, doc_id))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| AuthError::Api(e.to_string()))?;

        match resp.status().as_u16() {
            404 => {
                return Err(AuthError::DocumentNotFound {
                    doc_id: doc_id.to_string(),
                });
            }
            403 => {
                return Err(AuthError::PermissionDenied {
                    doc_id: doc_id.to_string(),
                });
            }
            status if !resp.status().is_success() => {
                return Err(AuthError::Api(format!(
                    "document endpoint returned HTTP {status}"
                )));
            }
            _ => {}
        }

        let document: HostedDocument = resp
            .json()
            .await
            .map_err(|e| AuthError::Api(format!("malformed document body: {e}")))?;
        Ok(flatten_document(&document))
    }
}

fn flatten_document(document: &HostedDocument) -> String {
    let mut text = String::new();
    for element in &document.body.content {
        let Some(paragraph) = &element.paragraph else {
            continue;
        };
        for piece in &paragraph.elements {
            if let Some(run) = &piece.text_run {
                text.push_str(&run.content);
            }
        }
    }
    text
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Load the hosted-document reference stored in a `.gdoc` pointer file.
///
/// The file is a small JSON object; `doc_id` (or the legacy `resource_id`
/// key) names the remote document.
pub fn parse_doc_reference(raw: &str, path: &Path) -> Result<String, crate::errors::SourceError> {
    #[derive(Deserialize)]
    struct DocReference {
        #[serde(alias = "resource_id")]
        doc_id: Option<String>,
    }

    let reference: DocReference =
        serde_json::from_str(raw).map_err(|e| crate::errors::SourceError::BadReference {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    reference
        .doc_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| crate::errors::SourceError::BadReference {
            path: path.to_path_buf(),
            message: "missing doc_id".to_string(),
        })
}
