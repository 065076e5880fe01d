// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Tukey.

use thiserror::Error;

/// Top-level error type for all Tukey operations.
///
/// Save failures never cross the bridge boundary as this type; the storage
/// bridge collapses them into a `SaveResult` plus a toast.
#[derive(Debug, Error)]
pub enum TukeyError {
    // -- Save request errors --
    #[error("invalid save request: {0}")]
    InvalidRequest(String),

    #[error("base64 decode failed: {0}")]
    Decode(String),

    // -- Content index errors --
    #[error("content index refused to create entry: {0}")]
    Registration(String),

    #[error("could not open output stream: {0}")]
    Handle(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TukeyError>;
