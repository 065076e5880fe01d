// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Tukey — shell host.
//!
//! Builds the shell services once and exposes them to the host: the desktop
//! binary speaks JSON lines on stdio, the Android build is loaded by the
//! hosting Activity as a `cdylib` and called through JNI.

pub mod services;

#[cfg(target_os = "android")]
mod jni_exports;

pub use services::shell::Shell;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins; otherwise `info`. Output goes to stderr so stdout stays
/// free for bridge replies. Repeated calls are ignored.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
