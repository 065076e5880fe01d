// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Tukey — Native platform bridge abstractions.
//!
//! Defines the traits the storage bridge needs from the host OS (content
//! index, toasts, downloads directory) and picks the implementation for the
//! target at compile time.

pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod stub;

/// Retrieves the bridge implementation for the target operating system.
pub fn platform_bridge() -> Box<dyn traits::PlatformBridge> {
    #[cfg(target_os = "android")]
    {
        // Android: `jni-rs` calls into the hosting Activity.
        Box::new(android::AndroidBridge::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        // Desktop/CI: plain filesystem, toasts go to the log.
        Box::new(stub::StubBridge)
    }
}
