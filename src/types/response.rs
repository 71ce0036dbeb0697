//! Uniform result envelope returned by every operation.

use super::DirEntry;
use crate::client::error_from_response;
use crate::errors::{ServerError, SharePointError, SharePointResult};
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::Serialize;
use std::path::Path;

/// Status code plus normalized content.
///
/// `content` is only set when the operation recognised the status as a
/// success. The raw body is kept so it can be exported verbatim or mapped to
/// a typed error.
#[derive(Debug, Clone)]
pub struct SharePointResponse<T> {
    /// HTTP status returned by the service.
    pub status: StatusCode,
    /// Normalized content.
    pub content: Option<T>,
    headers: HeaderMap,
    raw: Bytes,
}

impl<T> SharePointResponse<T> {
    pub(crate) fn new(status: StatusCode, headers: HeaderMap, raw: Bytes, content: Option<T>) -> Self {
        Self {
            status,
            content,
            headers,
            raw,
        }
    }

    /// Same status and body with different content.
    pub(crate) fn with_content<U>(self, content: Option<U>) -> SharePointResponse<U> {
        SharePointResponse {
            status: self.status,
            content,
            headers: self.headers,
            raw: self.raw,
        }
    }

    /// Numeric status code.
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns true if content is available.
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    /// Raw response body.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Maps the content, keeping status and body.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SharePointResponse<U> {
        let content = self.content.map(f);
        SharePointResponse {
            status: self.status,
            content,
            headers: self.headers,
            raw: self.raw,
        }
    }

    /// Writes the raw body to `path`.
    ///
    /// Nothing is written when the operation did not succeed; the return
    /// value reports whether a file was written.
    pub async fn save_raw(&self, path: impl AsRef<Path>) -> SharePointResult<bool> {
        if self.content.is_none() || self.raw.is_empty() {
            return Ok(false);
        }
        tokio::fs::write(path.as_ref(), &self.raw).await?;
        Ok(true)
    }

    /// Converts the envelope into its content or a typed error.
    ///
    /// A failure status is mapped from the Graph error body. A success
    /// status the operation does not accept (a 200 where only 204 is
    /// expected) is reported as an unexpected status.
    pub fn into_result(self) -> SharePointResult<T> {
        match self.content {
            Some(content) => Ok(content),
            None if self.status.is_success() => {
                Err(SharePointError::Server(ServerError::UnexpectedStatus {
                    status: self.status.as_u16(),
                    message: format!("Status {} not accepted by the operation", self.status),
                }))
            }
            None => Err(error_from_response(self.status, &self.headers, &self.raw)),
        }
    }
}

/// Outcome of one file in `download_all_files`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    /// Downloaded.
    Pass,
    /// Download failed.
    Fail,
}

/// Per-file report from `download_all_files`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadReport {
    /// Listing entry of the file.
    #[serde(flatten)]
    pub entry: DirEntry,
    /// Outcome.
    pub status: DownloadStatus,
}
