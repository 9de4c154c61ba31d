//! Benchmarks for timer registry operations and shell event throughput.

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use pocket_core::DeviceShell;
use pocket_core::input::{HardwareEvent, PointerRegion};
use pocket_core::timer::TimerRegistry;
use pocket_platform::{FixedClock, MemoryStore, SystemTime};
use pocket_types::config::ShellConfig;

fn bench_arm(c: &mut Criterion) {
    let mut group = c.benchmark_group("timer_arm");

    for n in [10u32, 100, 1_000] {
        let label = format!("{n}");

        group.bench_function(BenchmarkId::new("arm", &label), |b| {
            b.iter(|| {
                let mut reg: TimerRegistry<u32, u32> = TimerRegistry::new();
                for i in 0..n {
                    reg.arm(i, u64::from(i % 50) * 100, i);
                }
                reg
            });
        });
    }

    group.finish();
}

fn bench_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("timer_drain");

    for n in [10u32, 100, 1_000] {
        let label = format!("{n}");

        group.bench_function(BenchmarkId::new("pop_due", &label), |b| {
            b.iter_batched(
                || {
                    let mut reg: TimerRegistry<u32, u32> = TimerRegistry::new();
                    for i in 0..n {
                        reg.arm(i, u64::from(i) * 7 % 5000, i);
                    }
                    reg
                },
                |mut reg| {
                    let mut fired = 0;
                    while reg.pop_due(5000).is_some() {
                        fired += 1;
                    }
                    fired
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn shell() -> DeviceShell {
    let clock = FixedClock(SystemTime {
        year: 2024,
        month: 1,
        day: 1,
        hour: 12,
        minute: 0,
        second: 0,
    });
    DeviceShell::new(
        ShellConfig::default(),
        Box::new(MemoryStore::new()),
        Box::new(clock),
    )
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("shell_session");

    group.bench_function("boot_unlock_browse", |b| {
        b.iter_batched(
            shell,
            |mut s| {
                s.boot();
                s.advance(3000);
                s.handle_event(HardwareEvent::PointerDown {
                    x: 5,
                    y: 5,
                    region: PointerRegion::Background,
                });
                s.handle_event(HardwareEvent::PointerUp { x: 5, y: 5 });
                for i in 0..50 {
                    s.show_app(&format!("app{i}"));
                    s.handle_event(HardwareEvent::VolumeUp);
                    s.advance(250);
                }
                s
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_arm, bench_drain, bench_session);
criterion_main!(benches);
