// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Tukey storage bridge.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TukeyError};

/// MIME type registered when the caller does not supply one.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Relative path of the public downloads collection in the content index.
pub const DOWNLOADS_RELATIVE_PATH: &str = "Download";

/// Correlation id attached to the tracing span of a single save call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload of a save request as it arrives from hosted content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveContent {
    /// Written as its UTF-8 bytes.
    Text(String),
    /// Decoded to raw bytes before writing.
    Base64(String),
}

/// A single logical save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub content: SaveContent,
    pub filename: String,
    pub mime_type: Option<String>,
}

impl SaveRequest {
    pub fn text(
        content: impl Into<String>,
        filename: impl Into<String>,
        mime_type: Option<String>,
    ) -> Self {
        Self {
            content: SaveContent::Text(content.into()),
            filename: filename.into(),
            mime_type,
        }
    }

    pub fn base64(
        content: impl Into<String>,
        filename: impl Into<String>,
        mime_type: Option<String>,
    ) -> Self {
        Self {
            content: SaveContent::Base64(content.into()),
            filename: filename.into(),
            mime_type,
        }
    }

    /// MIME type to register, falling back to [`DEFAULT_MIME_TYPE`].
    ///
    /// An empty string is treated the same as an absent value.
    pub fn effective_mime_type(&self) -> &str {
        match self.mime_type.as_deref() {
            Some(m) if !m.trim().is_empty() => m,
            _ => DEFAULT_MIME_TYPE,
        }
    }

    /// Check the filename before any strategy touches storage.
    ///
    /// Rejects empty names and anything that could escape the downloads
    /// directory when joined onto it.
    pub fn validate(&self) -> Result<()> {
        validate_filename(&self.filename)
    }
}

/// Reject filenames that are empty or are not a single path component.
pub fn validate_filename(filename: &str) -> Result<()> {
    if filename.trim().is_empty() {
        return Err(TukeyError::InvalidRequest("filename is empty".into()));
    }
    if filename.contains(['/', '\\', '\0']) {
        return Err(TukeyError::InvalidRequest(format!(
            "filename must not contain path separators: {filename:?}"
        )));
    }
    if filename == "." || filename == ".." {
        return Err(TukeyError::InvalidRequest(format!(
            "filename is not a file: {filename:?}"
        )));
    }
    Ok(())
}

/// Outcome of a save call as reported back to hosted content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResult {
    pub success: bool,
    pub resolved_location: Option<String>,
    pub error_message: Option<String>,
}

impl SaveResult {
    pub fn saved(location: impl Into<String>) -> Self {
        Self {
            success: true,
            resolved_location: Some(location.into()),
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            resolved_location: None,
            error_message: Some(message.into()),
        }
    }
}

/// Which write strategy the platform supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageCapability {
    /// A content index with a public downloads collection (Android 10+).
    IndexedDownloads,
    /// Only direct filesystem access to the public downloads directory.
    LegacyFilesystem,
}

impl std::fmt::Display for StorageCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexedDownloads => write!(f, "indexed-downloads"),
            Self::LegacyFilesystem => write!(f, "legacy-filesystem"),
        }
    }
}

/// How long a toast stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToastDuration {
    Short,
    Long,
}

/// Metadata for a new entry in the downloads collection of a content index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadEntry {
    pub display_name: String,
    pub mime_type: String,
    pub relative_path: String,
}

impl DownloadEntry {
    pub fn for_request(request: &SaveRequest) -> Self {
        Self {
            display_name: request.filename.clone(),
            mime_type: request.effective_mime_type().to_owned(),
            relative_path: DOWNLOADS_RELATIVE_PATH.to_owned(),
        }
    }
}

/// Opaque reference to a registered content-index entry (e.g. `content://…`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentUri(pub String);

impl std::fmt::Display for ContentUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_mime_defaults_to_octet_stream() {
        let req = SaveRequest::text("x", "a.bin", None);
        assert_eq!(req.effective_mime_type(), DEFAULT_MIME_TYPE);

        let req = SaveRequest::text("x", "a.bin", Some(String::new()));
        assert_eq!(req.effective_mime_type(), DEFAULT_MIME_TYPE);

        let req = SaveRequest::text("x", "a.txt", Some("text/plain".into()));
        assert_eq!(req.effective_mime_type(), "text/plain");
    }

    #[test]
    fn empty_filename_rejected() {
        let req = SaveRequest::text("x", "", None);
        assert!(matches!(req.validate(), Err(TukeyError::InvalidRequest(_))));
        assert!(validate_filename("   ").is_err());
    }

    #[test]
    fn traversal_filenames_rejected() {
        for name in ["../evil.txt", "a/b.txt", "..\\x", "..", ".", "nul\0.txt"] {
            assert!(validate_filename(name).is_err(), "{name:?} must be rejected");
        }
    }

    #[test]
    fn plain_filenames_accepted() {
        for name in ["note.txt", "EPhone-Backup-2026-01-01.json", "..hidden", "a..b"] {
            assert!(validate_filename(name).is_ok(), "{name:?} must be accepted");
        }
    }

    #[test]
    fn download_entry_uses_downloads_collection() {
        let req = SaveRequest::base64("aGk=", "hi.txt", None);
        let entry = DownloadEntry::for_request(&req);
        assert_eq!(entry.display_name, "hi.txt");
        assert_eq!(entry.mime_type, DEFAULT_MIME_TYPE);
        assert_eq!(entry.relative_path, DOWNLOADS_RELATIVE_PATH);
    }

    #[test]
    fn save_result_serializes_camel_case() {
        let json = serde_json::to_value(SaveResult::saved("/tmp/x")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["resolvedLocation"], "/tmp/x");
        assert!(json["errorMessage"].is_null());
    }
}
