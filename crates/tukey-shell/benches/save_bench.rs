// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the save path of the tukey-shell storage bridge.

use base64::Engine as _;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use tukey_shell::storage::decode_base64;
use tukey_shell::strategy::DirectFilesystem;
use tukey_shell::{StorageBridge, ui_queue};

const SIZES: &[(&str, usize)] = &[
    ("1 KiB", 1024),
    ("100 KiB", 100 * 1024),
    ("1 MiB", 1024 * 1024),
];

/// Base64 decoding of page-exported backups, with the line breaks some
/// encoders insert every 76 characters.
fn bench_decode_base64(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_base64");
    for &(label, size) in SIZES {
        let encoded = base64::engine::general_purpose::STANDARD.encode(vec![0x5Au8; size]);
        let wrapped: String = encoded
            .as_bytes()
            .chunks(76)
            .map(|line| format!("{}\n", String::from_utf8_lossy(line)))
            .collect();

        group.bench_function(label, |b| {
            b.iter(|| black_box(decode_base64(black_box(&wrapped)).expect("decode failed")));
        });
    }
    group.finish();
}

/// Full `saveBase64File` through the direct filesystem strategy into a
/// temporary directory.
fn bench_save_base64_direct(c: &mut Criterion) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let (ui, mut events) = ui_queue();
    let bridge = StorageBridge::new(Box::new(DirectFilesystem::new(tmp.path())), ui);

    let mut group = c.benchmark_group("save_base64_direct");
    for &(label, size) in SIZES {
        let encoded = base64::engine::general_purpose::STANDARD.encode(vec![0xA5u8; size]);
        group.bench_function(label, |b| {
            b.iter(|| {
                let result = bridge.save_base64(black_box(&encoded), "bench.bin", None);
                assert!(result.success);
                while events.try_next().is_some() {}
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode_base64, bench_save_base64_direct);
criterion_main!(benches);
