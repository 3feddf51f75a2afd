//! Benchmarks for argument parsing and retry schedules.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shellkit::args::{ArgParser, MapEnvironment};
use shellkit::retry::RetryPolicy;

fn command_line() -> Vec<String> {
    let mut args = vec![
        "--verbose".to_string(),
        "--output=build/out.tar".to_string(),
        "--host".to_string(),
        "example.org".to_string(),
        "-xvf".to_string(),
        "--".to_string(),
    ];
    args.extend((0..32).map(|i| format!("file-{i}.txt")));
    args
}

fn parse_benchmark(c: &mut Criterion) {
    let args = command_line();
    let mut parser = ArgParser::with_environment(MapEnvironment::new().with_var("RETRIES", "4"));
    parser
        .register_flags(["verbose", "dry-run"])
        .register_values(["output", "host"]);

    c.bench_function("parse_mixed_args", |b| {
        b.iter(|| black_box(parser.parse(black_box(&args)).positionals.len()));
    });

    c.bench_function("get_value_env_fallback", |b| {
        b.iter(|| black_box(parser.get_value(black_box("retries"), None)));
    });
}

fn schedule_benchmark(c: &mut Criterion) {
    let policy = RetryPolicy::Backoff {
        max_attempts: 64,
        initial_delay: std::time::Duration::from_millis(10),
        max_delay: std::time::Duration::from_secs(300),
    };

    c.bench_function("backoff_planned_delays", |b| {
        b.iter(|| black_box(black_box(&policy).planned_delays()));
    });
}

criterion_group!(benches, parse_benchmark, schedule_benchmark);
criterion_main!(benches);
