// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Write strategies.
//
// A save ends in exactly one of these. The choice is made once, from the
// platform's storage capability, when the bridge is built; a failing
// strategy is never retried through the other one.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;
use tukey_bridge::traits::ContentIndex;
use tukey_core::error::{Result, TukeyError};
use tukey_core::messages;
use tukey_core::types::{ContentUri, DownloadEntry, SaveRequest, StorageCapability};

/// Where a payload ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedLocation {
    /// An entry in the content index's downloads collection.
    Indexed {
        display_name: String,
        uri: ContentUri,
    },
    /// A plain file on disk.
    File(PathBuf),
}

impl SavedLocation {
    /// Location string reported back to the caller: the entry's URI for
    /// indexed saves, since display names are not unique there.
    pub fn resolved(&self) -> String {
        match self {
            Self::Indexed { uri, .. } => uri.0.clone(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// Toast text announcing the save.
    pub fn toast_message(&self) -> String {
        match self {
            Self::Indexed { display_name, .. } => messages::saved_to_downloads(display_name),
            Self::File(path) => messages::saved_to_path(&path.display().to_string()),
        }
    }
}

/// Persist a full payload for one save request.
pub trait WriteStrategy: Send + Sync {
    /// The capability this strategy serves.
    fn capability(&self) -> StorageCapability;

    /// Write `bytes` in one pass for `request`.
    fn write(&self, request: &SaveRequest, bytes: &[u8]) -> Result<SavedLocation>;
}

// ---------------------------------------------------------------------------
// Strategy A — content index insert
// ---------------------------------------------------------------------------

/// Registers a downloads entry in the content index and streams into it.
pub struct IndexedInsert {
    index: Arc<dyn ContentIndex>,
}

impl IndexedInsert {
    pub fn new(index: Arc<dyn ContentIndex>) -> Self {
        Self { index }
    }
}

impl WriteStrategy for IndexedInsert {
    fn capability(&self) -> StorageCapability {
        StorageCapability::IndexedDownloads
    }

    fn write(&self, request: &SaveRequest, bytes: &[u8]) -> Result<SavedLocation> {
        let entry = DownloadEntry::for_request(request);

        let uri = self.index.insert_download(&entry)?.ok_or_else(|| {
            TukeyError::Registration(format!("no entry created for {}", entry.display_name))
        })?;
        debug!(%uri, mime = %entry.mime_type, "registered downloads entry");

        let mut writer = self
            .index
            .open_writer(&uri)?
            .ok_or_else(|| TukeyError::Handle(format!("no output stream for {uri}")))?;

        writer.write_all(bytes)?;
        writer.flush()?;
        drop(writer);

        Ok(SavedLocation::Indexed {
            display_name: entry.display_name,
            uri,
        })
    }
}

// ---------------------------------------------------------------------------
// Strategy B — direct filesystem
// ---------------------------------------------------------------------------

/// Writes straight into the public downloads directory. MIME type is unused.
pub struct DirectFilesystem {
    downloads_dir: PathBuf,
}

impl DirectFilesystem {
    pub fn new(downloads_dir: impl Into<PathBuf>) -> Self {
        Self {
            downloads_dir: downloads_dir.into(),
        }
    }
}

impl WriteStrategy for DirectFilesystem {
    fn capability(&self) -> StorageCapability {
        StorageCapability::LegacyFilesystem
    }

    fn write(&self, request: &SaveRequest, bytes: &[u8]) -> Result<SavedLocation> {
        if !self.downloads_dir.exists() {
            debug!(dir = %self.downloads_dir.display(), "creating downloads directory");
            std::fs::create_dir_all(&self.downloads_dir)?;
        }

        let path = self.downloads_dir.join(&request.filename);
        let mut file = std::fs::File::create(&path)?;
        file.write_all(bytes)?;
        file.flush()?;
        drop(file);

        let path = std::path::absolute(&path).unwrap_or(path);
        Ok(SavedLocation::File(path))
    }
}
