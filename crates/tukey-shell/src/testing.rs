// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory platform fakes for unit tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tukey_bridge::traits::{ContentIndex, NativeToast};
use tukey_core::error::{Result, TukeyError};
use tukey_core::types::{ContentUri, DownloadEntry, ToastDuration};

/// Records every toast instead of showing it.
#[derive(Default)]
pub struct RecordingToast {
    shown: Mutex<Vec<(String, ToastDuration)>>,
}

impl RecordingToast {
    pub fn shown(&self) -> Vec<(String, ToastDuration)> {
        self.shown.lock().unwrap().clone()
    }
}

impl NativeToast for RecordingToast {
    fn show_toast(&self, message: &str, duration: ToastDuration) -> Result<()> {
        self.shown.lock().unwrap().push((message.to_string(), duration));
        Ok(())
    }
}

/// A registered entry and the bytes written to it.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    pub entry: DownloadEntry,
    pub uri: ContentUri,
    pub data: Vec<u8>,
}

/// Content index that keeps entries in memory.
///
/// Like MediaStore, inserting the same display name twice creates two
/// entries.
#[derive(Default)]
pub struct MemoryIndex {
    pub stored: Arc<Mutex<Vec<StoredEntry>>>,
    pub refuse_insert: bool,
    pub refuse_stream: bool,
    pub fail_writes: bool,
}

impl MemoryIndex {
    pub fn entries(&self) -> Vec<StoredEntry> {
        self.stored.lock().unwrap().clone()
    }

    pub fn find(&self, display_name: &str) -> Option<StoredEntry> {
        self.entries()
            .into_iter()
            .find(|e| e.entry.display_name == display_name)
    }
}

impl ContentIndex for MemoryIndex {
    fn insert_download(&self, entry: &DownloadEntry) -> Result<Option<ContentUri>> {
        if self.refuse_insert {
            return Ok(None);
        }
        let mut entries = self.stored.lock().unwrap();
        let uri = ContentUri(format!("content://memory/downloads/{}", entries.len() + 1));
        entries.push(StoredEntry {
            entry: entry.clone(),
            uri: uri.clone(),
            data: Vec::new(),
        });
        Ok(Some(uri))
    }

    fn open_writer(&self, uri: &ContentUri) -> Result<Option<Box<dyn Write + Send>>> {
        if self.refuse_stream {
            return Ok(None);
        }
        if !self.stored.lock().unwrap().iter().any(|e| &e.uri == uri) {
            return Err(TukeyError::Handle(format!("unknown uri {uri}")));
        }
        Ok(Some(Box::new(MemoryWriter {
            entries: self.stored.clone(),
            uri: uri.clone(),
            fail: self.fail_writes,
        })))
    }
}

struct MemoryWriter {
    entries: Arc<Mutex<Vec<StoredEntry>>>,
    uri: ContentUri,
    fail: bool,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail {
            return Err(io::Error::from(io::ErrorKind::StorageFull));
        }
        let mut entries = self.entries.lock().unwrap();
        let stored = entries
            .iter_mut()
            .find(|e| e.uri == self.uri)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        stored.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
