//! Query path benchmarks
//!
//! Covers each regime branch, including a trade that runs through the pivot.

use std::str::FromStr;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pmm::{BigDecimal, FeeRates, PmmEngine, Regime, ReserveSnapshot, Reserves};

fn d(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn snapshot(base: &str, quote: &str, regime: Regime) -> ReserveSnapshot {
    ReserveSnapshot::new(
        Reserves {
            base: d(base),
            quote: d(quote),
            base_target: d("1000000"),
            quote_target: d("2500000000"),
        },
        regime,
        d("2500"),
        d("0.1"),
        FeeRates {
            lp_fee_rate: d("0.003"),
            mt_fee_rate: d("0.0005"),
        },
    )
}

fn bench_sell_base(c: &mut Criterion) {
    let engine = PmmEngine::default();
    let cases = [
        ("at_pivot", snapshot("1000000", "2500000000", Regime::AtPivot)),
        ("above_pivot", snapshot("990000", "2525000000", Regime::AbovePivot)),
        ("below_pivot", snapshot("1010000", "2475000000", Regime::BelowPivot)),
    ];

    let mut group = c.benchmark_group("sell_base");
    for (name, snap) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), snap, |b, snap| {
            b.iter(|| engine.query_sell_base(black_box(&d("25000")), black_box(snap)))
        });
    }
    group.finish();
}

fn bench_sell_quote(c: &mut Criterion) {
    let engine = PmmEngine::default();
    let snap = snapshot("1010000", "2475000000", Regime::BelowPivot);
    let amount = d("30000000");

    c.bench_function("sell_quote_crossing_pivot", |b| {
        b.iter(|| engine.query_sell_quote(black_box(&amount), black_box(&snap)))
    });
}

fn bench_mid_price(c: &mut Criterion) {
    let engine = PmmEngine::default();
    let snap = snapshot("990000", "2525000000", Regime::AbovePivot);

    c.bench_function("mid_price", |b| b.iter(|| engine.mid_price(black_box(&snap))));
}

criterion_group!(benches, bench_sell_base, bench_sell_quote, bench_mid_price);
criterion_main!(benches);
