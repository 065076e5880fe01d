// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — wires the platform bridge, storage bridge, and host glue
// together for whichever host (desktop stdio, Android JNI) is running.

pub mod data_dir;
pub mod shell;
