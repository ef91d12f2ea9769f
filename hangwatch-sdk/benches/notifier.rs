use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hangwatch_sdk::{probe, EventLoop, Notifier, Severity};

/// Benchmark show + clear (hot path when stalls repeat)
fn bench_show_clear(c: &mut Criterion) {
    // Expiry timers are spawned on this runtime and finish after 1ms.
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let _guard = runtime.enter();
    let notifier = Notifier::new(Duration::from_millis(1));

    c.bench_function("notifier_show_clear", |b| {
        b.iter(|| {
            notifier.show(black_box(Severity::Warning), "Potential App Hang (> 100ms)");
            notifier.clear();
        });
    });
}

/// Benchmark reading the current alert
fn bench_current(c: &mut Criterion) {
    let notifier = Notifier::new(Duration::from_secs(3600));
    notifier.show(Severity::Critical, "App Hang Detected (> 250ms)");

    c.bench_function("notifier_current", |b| {
        b.iter(|| black_box(notifier.current()));
    });
}

/// Benchmark a full probe round trip against an idle event loop
fn bench_probe_round_trip(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (handle, event_loop) = EventLoop::new();
    let thread = event_loop.spawn("bench-loop").unwrap();

    c.bench_function("probe_round_trip", |b| {
        b.iter(|| {
            runtime.block_on(probe(
                &handle,
                Duration::from_millis(300),
                Duration::from_millis(100),
            ))
        });
    });

    handle.quit();
    thread.join().unwrap();
}

criterion_group!(benches, bench_show_clear, bench_current, bench_probe_round_trip);
criterion_main!(benches);
