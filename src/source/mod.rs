//! Document sources: plain text, PDF, and hosted-document references.
//!
//! A source is identified by file extension and resolved to plain text.
//! Local files are read directly; `.gdoc` files are JSON pointers to a
//! remote document fetched through an authenticated session.

pub mod hosted;

use crate::errors::{AuthError, SourceError};
use hosted::HostedDocsClient;
use std::path::Path;

/// The document types the pipeline can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    PlainText,
    Pdf,
    HostedDoc,
}

impl SourceKind {
    /// Classify a path by extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "txt" => Some(Self::PlainText),
            "pdf" => Some(Self::Pdf),
            "gdoc" => Some(Self::HostedDoc),
            _ => None,
        }
    }
}

/// Resolve `path` to the document's plain text.
///
/// `session` is only consulted for hosted-document references; batch
/// runs that contain no `.gdoc` files never authenticate.
pub async fn read_document(
    path: &Path,
    session: Option<&HostedDocsClient>,
) -> Result<String, SourceError> {
    let kind = SourceKind::from_path(path).ok_or_else(|| SourceError::UnsupportedType {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string(),
    })?;

    match kind {
        SourceKind::PlainText => {
            std::fs::read_to_string(path).map_err(|source| SourceError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
        SourceKind::Pdf => {
            tracing::debug!(path = %path.display(), "Extracting PDF text");
            pdf_extract::extract_text(path).map_err(|e| SourceError::PdfExtract {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
        SourceKind::HostedDoc => {
            let raw = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let doc_id = hosted::parse_doc_reference(&raw, path)?;

            let client = session.ok_or(SourceError::Auth(AuthError::ConsentRequired))?;
            tracing::debug!(doc_id, "Fetching hosted document");
            Ok(client.fetch_document_text(&doc_id).await?)
        }
    }
}
