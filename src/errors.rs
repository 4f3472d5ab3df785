//! Typed error hierarchy for the summarization pipeline.
//!
//! Three top-level enums cover the three failure domains:
//! - `SourceError` — reading a document from disk or a hosted API
//! - `AuthError` — hosted-document credential and session failures
//! - `OracleError` — transport and protocol failures talking to the
//!   completion server
//!
//! Source and auth errors are caught at the per-document boundary and
//! skip that document; oracle errors inside the reduction loop abort the
//! document but never the batch.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while obtaining a document's text.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract text from PDF {path}: {message}")]
    PdfExtract { path: PathBuf, message: String },

    #[error("Malformed hosted document reference {path}: {message}")]
    BadReference { path: PathBuf, message: String },

    #[error("Unsupported file type: {extension}")]
    UnsupportedType { extension: String },

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Errors from the hosted-document authentication flow.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No credentials file found at {path}")]
    MissingCredentials { path: PathBuf },

    #[error("Token refresh failed: {message}")]
    RefreshFailed { message: String },

    #[error("Interactive consent required; run the authorization flow and retry")]
    ConsentRequired,

    #[error("Permission denied for hosted document {doc_id}")]
    PermissionDenied { doc_id: String },

    #[error("Hosted document {doc_id} not found")]
    DocumentNotFound { doc_id: String },

    #[error("Hosted document API error: {0}")]
    Api(String),
}

/// Errors from the completion oracle.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Oracle transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Oracle returned HTTP {status}")]
    Status { status: u16 },

    #[error("Oracle response stream produced no usable fragments")]
    EmptyStream,
}
