//! Benchmarks for action execution.

#![allow(clippy::expect_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use envflow::prelude::*;

fn action_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");

    let action = (0..32)
        .fold(Action::builder(Role::Setup), |builder, i| {
            builder.step_fn(format!("step-{i}"), move |ctx| Ok(ctx.with_value("last", i)))
        })
        .build();

    c.bench_function("run_32_sync_steps", |b| {
        b.iter(|| {
            let ctx = runtime
                .block_on(action.run(black_box(EnvContext::background())))
                .expect("run");
            black_box(ctx)
        })
    });

    c.bench_function("context_lookup_depth_32", |b| {
        let ctx = (0..32_i64).fold(EnvContext::background(), |ctx, i| ctx.with_value(i, i));
        b.iter(|| black_box(ctx.value::<i64>(black_box(0_i64)).copied()))
    });
}

criterion_group!(benches, action_benchmark);
criterion_main!(benches);
