// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User-facing toast texts.
//
// Toasts are short, so each error is reduced to one line. The full error
// (with its source) goes to the log instead.

use crate::error::TukeyError;

/// Toast shown after a successful write through the content index.
pub fn saved_to_downloads(display_name: &str) -> String {
    format!("Saved to Downloads: {display_name}")
}

/// Toast shown after a successful direct filesystem write.
pub fn saved_to_path(path: &str) -> String {
    format!("Saved to: {path}")
}

/// Toast shown when a save call fails.
pub fn save_failed(err: &TukeyError) -> String {
    format!("Save failed: {}", summarize(err))
}

pub const FILE_CHOOSER_UNAVAILABLE: &str = "Cannot open file chooser";

pub const DOWNLOAD_UNAVAILABLE: &str = "Cannot download file";

/// One-line summary of an error for display.
pub fn summarize(err: &TukeyError) -> String {
    match err {
        TukeyError::InvalidRequest(detail) => detail.clone(),
        TukeyError::Decode(_) => "file content is not valid base64".into(),
        TukeyError::Registration(_) => "could not create file".into(),
        TukeyError::Handle(_) => "could not open output stream".into(),
        TukeyError::Io(e) => match e.kind() {
            std::io::ErrorKind::PermissionDenied => "permission denied".into(),
            std::io::ErrorKind::NotFound => "folder not found".into(),
            std::io::ErrorKind::StorageFull => "storage is full".into(),
            _ => e.to_string(),
        },
        TukeyError::Serialization(e) => e.to_string(),
        TukeyError::Bridge(detail) => detail.clone(),
    }
}
