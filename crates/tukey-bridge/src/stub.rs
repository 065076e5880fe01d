// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where the Android APIs are unavailable.
//
// Desktop has no content index, so saves always take the direct filesystem
// path. Toasts are written to the log.

use std::path::PathBuf;
use std::sync::Arc;

use tukey_core::error::{Result, TukeyError};
use tukey_core::types::{StorageCapability, ToastDuration};

use crate::traits::*;

/// Bridge returned on non-Android platforms.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }

    fn storage_capability(&self) -> StorageCapability {
        StorageCapability::LegacyFilesystem
    }

    fn public_downloads_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = dirs::download_dir() {
            return Ok(dir);
        }
        dirs::home_dir()
            .map(|home| home.join("Downloads"))
            .ok_or_else(|| TukeyError::Bridge("no home directory for downloads".into()))
    }

    fn content_index(&self) -> Option<Arc<dyn ContentIndex>> {
        None
    }
}

impl NativeToast for StubBridge {
    fn show_toast(&self, message: &str, duration: ToastDuration) -> Result<()> {
        tracing::info!(?duration, "toast: {message}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_is_legacy_without_index() {
        let bridge = StubBridge;
        assert_eq!(bridge.storage_capability(), StorageCapability::LegacyFilesystem);
        assert!(bridge.content_index().is_none());
    }

    #[test]
    fn stub_toast_never_fails() {
        assert!(StubBridge.show_toast("hello", ToastDuration::Short).is_ok());
    }
}
