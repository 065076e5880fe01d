// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tukey — storage bridge and host glue for hosted web content.

pub mod calls;
pub mod chooser;
pub mod download;
pub mod storage;
pub mod strategy;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;

pub use storage::StorageBridge;
pub use ui::{ui_queue, UiEvent, UiEvents, UiHandle};
