// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shell configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File name of the persisted configuration inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Persistent shell settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Page the host loads into the web view.
    pub entry_url: String,
    /// Global name under which the bridge is visible to hosted scripts.
    pub bridge_name: String,
    /// Override for the public downloads directory used by direct writes.
    pub downloads_dir: Option<PathBuf>,
    /// Use direct filesystem writes even where a content index exists.
    pub force_legacy_storage: bool,
    /// Prefix of the file name given to intercepted blob downloads.
    pub backup_filename_prefix: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            entry_url: "file:///android_asset/index.html".into(),
            bridge_name: "AndroidApp".into(),
            downloads_dir: None,
            force_legacy_storage: false,
            backup_filename_prefix: "EPhone-Backup-".into(),
        }
    }
}

impl ShellConfig {
    /// Load `config.json` from `data_dir`, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(CONFIG_FILE);
        let data = match std::fs::read_to_string(&path) {
            Ok(d) => d,
            Err(_) => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str(&data) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    /// Like [`load`](Self::load), but writes the defaults out when no config
    /// file exists yet so there is something to edit. An unreadable file is
    /// left alone.
    pub fn load_or_init(data_dir: &Path) -> Self {
        let config = Self::load(data_dir);
        if !data_dir.join(CONFIG_FILE).exists() {
            match config.persist(data_dir) {
                Ok(()) => tracing::info!(dir = %data_dir.display(), "wrote default config"),
                Err(e) => tracing::warn!(error = %e, "could not write default config"),
            }
        }
        config
    }

    /// Write this configuration to `data_dir/config.json`.
    pub fn persist(&self, data_dir: &Path) -> Result<()> {
        let path = data_dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(())
    }
}
