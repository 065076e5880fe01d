// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::PathBuf;

/// Return the shell's data directory (where `config.json` lives), creating
/// it if needed.
///
/// `TUKEY_DATA_DIR` wins; otherwise `<platform data dir>/tukey`, then the temp
/// dir. On Android the host passes its files dir to `nativeInit` instead.
pub fn data_dir() -> PathBuf {
    let dir = std::env::var_os("TUKEY_DATA_DIR")
        .map(PathBuf::from)
        .or_else(|| dirs::data_dir().map(|base| base.join("tukey")))
        .unwrap_or_else(|| std::env::temp_dir().join("tukey"));
    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!(path = %dir.display(), error = %e, "could not create data dir");
    }
    dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_is_created() {
        let dir = data_dir();
        assert!(dir.is_dir());
    }
}
