// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tukey_core::error::Result;
use tukey_core::types::{ContentUri, DownloadEntry, StorageCapability, ToastDuration};

/// Unified bridge that groups the native capabilities the shell relies on.
pub trait PlatformBridge: NativeToast + Send + Sync {
    /// Human-readable platform name (e.g. "Android 14", "Desktop (stub)").
    fn platform_name(&self) -> &str;

    /// Which write strategy this device supports.
    fn storage_capability(&self) -> StorageCapability;

    /// Absolute path of the user-visible downloads directory.
    fn public_downloads_dir(&self) -> Result<PathBuf>;

    /// Content index for the indexed write strategy, if the platform has one.
    fn content_index(&self) -> Option<Arc<dyn ContentIndex>>;
}

/// Show transient notifications.
///
/// Implementations may assume they are called from the UI-owning thread.
pub trait NativeToast: Send + Sync {
    fn show_toast(&self, message: &str, duration: ToastDuration) -> Result<()>;
}

/// A content index with a public downloads collection (Android MediaStore).
pub trait ContentIndex: Send + Sync {
    /// Register a new downloads entry.
    ///
    /// Returns `Ok(None)` when the index declined to create the entry.
    fn insert_download(&self, entry: &DownloadEntry) -> Result<Option<ContentUri>>;

    /// Open a writable stream for a registered entry.
    ///
    /// Returns `Ok(None)` when the entry exists but no stream is available.
    fn open_writer(&self, uri: &ContentUri) -> Result<Option<Box<dyn Write + Send>>>;
}
