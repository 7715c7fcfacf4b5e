//! Differentiable Function Benchmarks
//!
//! This benchmark suite measures the cost of walking function trees to obtain values
//! and exact derivatives, compared against hand-written Rust implementations of the
//! same closed-form expressions.
//!
//! ## Benchmark Structure
//!
//! ### 1. Scalar Functions (`benchmark_scalar`)
//! Value and gradient of single-variable trees (polynomial, product, quotient,
//! composition) next to direct evaluation.
//!
//! ### 2. Jacobians (`benchmark_jacobian`)
//! Jacobians of affine maps, stacks and compositions of growing input dimension.
//!
//! ### 3. Batch Evaluation (`benchmark_batch`)
//! Sequential evaluation over many points against the parallel `evaluate_batch`.
//!
//! ## Usage
//!
//! Run with: `cargo bench --bench functions`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use diffprog::{ScalarFunction, VectorFunction};

/// Direct evaluation of the benchmarked expressions and their derivatives.
struct DirectEvaluator;

impl DirectEvaluator {
    /// d/dx (1 - 2x + 3x³)
    fn cubic_derivative(x: f64) -> f64 {
        -2.0 + 9.0 * x * x
    }

    /// d/dx sin(x) * exp(x)
    fn product_derivative(x: f64) -> f64 {
        x.cos() * x.exp() + x.sin() * x.exp()
    }

    /// d/dx ln(x² + 1)
    fn chain_derivative(x: f64) -> f64 {
        2.0 * x / (x * x + 1.0)
    }
}

fn scalar_cases() -> Vec<(&'static str, ScalarFunction, fn(f64) -> f64)> {
    let cubic = ScalarFunction::polynomial(&[1.0, -2.0, 0.0, 3.0]).unwrap();
    let product = ScalarFunction::product(ScalarFunction::SIN, ScalarFunction::EXP).unwrap();
    let chain = ScalarFunction::compose(
        ScalarFunction::LN,
        ScalarFunction::polynomial(&[1.0, 0.0, 1.0]).unwrap(),
    )
    .unwrap();

    vec![
        ("cubic", cubic, DirectEvaluator::cubic_derivative as fn(f64) -> f64),
        ("product", product, DirectEvaluator::product_derivative as fn(f64) -> f64),
        ("chain", chain, DirectEvaluator::chain_derivative as fn(f64) -> f64),
    ]
}

fn benchmark_scalar(c: &mut Criterion) {
    let mut group = c.benchmark_group("Scalar Derivative");

    for (name, function, direct) in scalar_cases() {
        group.bench_with_input(BenchmarkId::new("Direct", name), &1.3, |b, &x| {
            b.iter(|| direct(black_box(x)))
        });
        group.bench_with_input(BenchmarkId::new("Tree", name), &1.3, |b, &x| {
            b.iter(|| function.derivative(black_box(x)).unwrap())
        });
    }

    group.finish();
}

/// Dense affine map ℝⁿ → ℝⁿ with distinct coefficients.
fn dense_affine(n: usize) -> VectorFunction {
    let rows = (0..n)
        .map(|i| (0..=n).map(|j| (i * n + j) as f64 * 0.01).collect())
        .collect();
    VectorFunction::affine(rows).unwrap()
}

/// Stack of `sin(x_i) * exp(x_{i+1})` terms, ℝⁿ → ℝⁿ.
fn elementary_stack(n: usize) -> VectorFunction {
    let functions = (0..n)
        .map(|i| {
            ScalarFunction::product(
                ScalarFunction::sin(n, i).unwrap(),
                ScalarFunction::exp(n, (i + 1) % n).unwrap(),
            )
            .unwrap()
        })
        .collect();
    VectorFunction::stack(functions).unwrap()
}

fn benchmark_jacobian(c: &mut Criterion) {
    let mut group = c.benchmark_group("Jacobian");

    for n in [2, 8, 32] {
        let point: Vec<f64> = (0..n).map(|i| i as f64 * 0.1).collect();
        let affine = dense_affine(n);
        let stack = elementary_stack(n);
        let composed = VectorFunction::compose(stack.clone(), affine.clone()).unwrap();

        group.bench_with_input(BenchmarkId::new("Affine", n), &point, |b, x| {
            b.iter(|| affine.jacobian(black_box(x)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("Stack", n), &point, |b, x| {
            b.iter(|| stack.jacobian(black_box(x)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("Compose", n), &point, |b, x| {
            b.iter(|| composed.jacobian(black_box(x)).unwrap())
        });
    }

    group.finish();
}

fn benchmark_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("Batch Evaluation");
    let function = elementary_stack(8);

    for n_points in [100, 10_000] {
        let points: Vec<Vec<f64>> = (0..n_points)
            .map(|p| (0..8).map(|i| (p + i) as f64 * 1e-3).collect())
            .collect();

        group.bench_with_input(
            BenchmarkId::new("Sequential", n_points),
            &points,
            |b, points| {
                b.iter(|| {
                    points
                        .iter()
                        .map(|x| function.evaluate(x).unwrap())
                        .collect::<Vec<_>>()
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("Parallel", n_points),
            &points,
            |b, points| b.iter(|| function.evaluate_batch(black_box(points)).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_scalar, benchmark_jacobian, benchmark_batch);
criterion_main!(benches);
