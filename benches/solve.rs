//! Solve-time benchmarks for the arbitrage LP
//!
//! ```bash
//! cargo bench --bench solve
//! cargo bench --bench solve --no-default-features --features clarabel
//! ```

use battery_arbitrage::domain::BatteryAsset;
use battery_arbitrage::optimizer::{BatteryOptimizer, Constraints};
use battery_arbitrage::simulation::{MarketDataGenerator, ScenarioParams};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_optimize(c: &mut Criterion) {
    let optimizer = BatteryOptimizer::new(Constraints::default()).unwrap();
    let asset = BatteryAsset::default();
    let mut group = c.benchmark_group("optimize");

    for intervals in [48usize, 96, 192] {
        let params = ScenarioParams {
            intervals,
            volatility: 2.5,
            ..ScenarioParams::default()
        };
        let inputs = MarketDataGenerator::new(42)
            .generate(&params)
            .unwrap()
            .to_inputs()
            .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(intervals), &inputs, |b, inputs| {
            b.iter(|| optimizer.optimize(black_box(inputs), black_box(&asset)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_optimize);
criterion_main!(benches);
