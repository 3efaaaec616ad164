// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for printer lookup, job bookkeeping, and identity
// derivation in the pressroom-print crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use pressroom_core::config::SystemConfig;
use pressroom_core::types::PrinterId;
use pressroom_print::{Collaborators, JobRequest, JobTaxonomy, System, SystemIdentity, get_random32};

const DRIVER: &str = "pwg_common-300dpi-srgb_8";

// ---------------------------------------------------------------------------
// Helper: a system with `count` printers
// ---------------------------------------------------------------------------

fn populated_system(count: usize) -> System {
    let system = System::new(SystemConfig::default(), Collaborators::default());
    for i in 0..count {
        system
            .create_printer(&format!("Printer{i:03}"), DRIVER, "file:///dev/null", None)
            .expect("create printer");
    }
    system
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Resource lookup for the last printer in name order (worst case scan).
fn bench_find_by_resource(c: &mut Criterion) {
    let system = populated_system(100);

    c.bench_function("find_printer (resource, 100 printers)", |b| {
        b.iter(|| {
            let found = system.find_printer(black_box(Some("/ipp/print/Printer099/jobs/7")), None);
            assert!(found.is_some());
        });
    });
}

/// Default-printer lookup through a numeric sub-path.
fn bench_find_default(c: &mut Criterion) {
    let system = populated_system(100);

    c.bench_function("find_printer (default path, 100 printers)", |b| {
        b.iter(|| {
            let found = system.find_printer(black_box(Some("/ipp/print/1")), None);
            assert!(found.is_some());
        });
    });
}

fn bench_find_by_id(c: &mut Criterion) {
    let system = populated_system(100);

    c.bench_function("find_printer (id, 100 printers)", |b| {
        b.iter(|| {
            let found = system.find_printer(None, black_box(Some(PrinterId(50))));
            assert!(found.is_some());
        });
    });
}

/// Insert 1000 jobs and complete every other one.
fn bench_job_taxonomy(c: &mut Criterion) {
    let identity = SystemIdentity::new("bench-host", 631);

    c.bench_function("job_taxonomy (1000 inserts, 500 completions)", |b| {
        b.iter(|| {
            let mut jobs = JobTaxonomy::new();
            for _ in 0..1000 {
                let id = jobs.insert(JobRequest::default(), |id| identity.job_uuid("Bench", id, 0));
                if id.0 % 2 == 0 {
                    jobs.complete(id).expect("active job");
                }
            }
            black_box(jobs.active_count());
        });
    });
}

fn bench_printer_uuid(c: &mut Criterion) {
    let identity = SystemIdentity::new("bench-host", 631);

    c.bench_function("printer_uuid (sha256 digest)", |b| {
        b.iter(|| black_box(identity.printer_uuid(black_box("LabelPrinter"))));
    });
}

fn bench_random32(c: &mut Criterion) {
    c.bench_function("get_random32", |b| {
        b.iter(|| black_box(get_random32()));
    });
}

criterion_group!(
    benches,
    bench_find_by_resource,
    bench_find_default,
    bench_find_by_id,
    bench_job_taxonomy,
    bench_printer_uuid,
    bench_random32,
);
criterion_main!(benches);
