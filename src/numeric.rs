//! Finite-difference derivative estimators and sampling helpers.
//!
//! These are approximations meant for cross-checking exact derivatives, typically in
//! tests. They are never used when evaluating a function tree.
//!
//! The step `h` trades truncation error against floating-point cancellation; `1e-4`
//! is a reasonable default for well-scaled functions.
//!
//! # Example
//!
//! ```
//! use diffprog::numeric::central_difference;
//!
//! let df = central_difference(|x| x * x, 1e-4);
//! assert!((df(3.0) - 6.0).abs() < 1e-6);
//! ```

/// Approximates `f'` with the forward difference `(f(x + h) - f(x)) / h`.
pub fn forward_difference<F>(f: F, h: f64) -> impl Fn(f64) -> f64
where
    F: Fn(f64) -> f64,
{
    move |x| (f(x + h) - f(x)) / h
}

/// Approximates `f'` with the backward difference `(f(x) - f(x - h)) / h`.
pub fn backward_difference<F>(f: F, h: f64) -> impl Fn(f64) -> f64
where
    F: Fn(f64) -> f64,
{
    move |x| (f(x) - f(x - h)) / h
}

/// Approximates `f'` with a central difference over a window of total width `h`.
///
/// The function is sampled at `x ± h/2`.
pub fn central_difference<F>(f: F, h: f64) -> impl Fn(f64) -> f64
where
    F: Fn(f64) -> f64,
{
    let step = h / 2.0;
    move |x| (f(x + step) - f(x - step)) / (2.0 * step)
}

/// Returns `num` evenly spaced values starting at `start` with spacing `(stop - start) / num`.
///
/// `stop` itself is not included. The sequence is empty if `stop < start`.
///
/// # Example
/// ```
/// # use diffprog::numeric::linspace;
/// assert_eq!(linspace(0.0, 1.0, 4), vec![0.0, 0.25, 0.5, 0.75]);
/// assert!(linspace(1.0, 0.0, 4).is_empty());
/// ```
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    if stop < start {
        return Vec::new();
    }

    let dx = (stop - start) / num as f64;
    let mut x = start;
    let mut result = Vec::with_capacity(num);
    for _ in 0..num {
        result.push(x);
        x += dx;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScalarFunction;

    struct NumericCase {
        name: &'static str,
        function: ScalarFunction,
        derivatives: [f64; 5],
    }

    const X: [f64; 5] = [-2.0, -1.0, 0.0, 1.0, 2.0];

    fn poly(coefficients: &[f64]) -> ScalarFunction {
        ScalarFunction::polynomial(coefficients).unwrap()
    }

    fn cases() -> Vec<NumericCase> {
        let x = poly(&[0.0, 1.0]);
        vec![
            NumericCase {
                name: "y=5.0",
                function: ScalarFunction::constant(5.0, 1),
                derivatives: [0.0; 5],
            },
            NumericCase {
                name: "y=5x+4",
                function: poly(&[4.0, 5.0]),
                derivatives: [5.0; 5],
            },
            NumericCase {
                name: "y=x^2+4",
                function: poly(&[4.0, 0.0, 1.0]),
                derivatives: [-4.0, -2.0, 0.0, 2.0, 4.0],
            },
            NumericCase {
                name: "y=x^2+4 (sum)",
                function: ScalarFunction::sum(
                    poly(&[0.0, 0.0, 1.0]),
                    ScalarFunction::constant(4.0, 1),
                )
                .unwrap(),
                derivatives: [-4.0, -2.0, 0.0, 2.0, 4.0],
            },
            NumericCase {
                name: "y=x^2+4 (product + sum)",
                function: ScalarFunction::sum(
                    ScalarFunction::product(x.clone(), x).unwrap(),
                    ScalarFunction::constant(4.0, 1),
                )
                .unwrap(),
                derivatives: [-4.0, -2.0, 0.0, 2.0, 4.0],
            },
        ]
    }

    #[test]
    fn test_numeric_estimators() {
        for case in cases() {
            let f = |x: f64| case.function.evaluate(&[x]).unwrap();
            let central = central_difference(f, 1e-4);
            let backward = backward_difference(f, 1e-4);
            let forward = forward_difference(f, 1e-4);

            for (&x, &expected) in X.iter().zip(&case.derivatives) {
                assert!(
                    (expected - central(x)).abs() < 2e-4,
                    "{}: central {} != {expected}",
                    case.name,
                    central(x)
                );
                assert!(
                    (expected - backward(x)).abs() < 2e-4,
                    "{}: backward {} != {expected}",
                    case.name,
                    backward(x)
                );
                assert!(
                    (expected - forward(x)).abs() < 2e-4,
                    "{}: forward {} != {expected}",
                    case.name,
                    forward(x)
                );
            }
        }
    }

    #[test]
    fn test_estimators_match_exact_derivatives() {
        for case in cases() {
            let f = |x: f64| case.function.evaluate(&[x]).unwrap();
            let central = central_difference(f, 1e-4);
            for x in linspace(-2.0, 2.0, 16) {
                let exact = case.function.derivative(x).unwrap();
                assert!((exact - central(x)).abs() < 2e-4, "{} at {x}", case.name);
            }
        }
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(-2.0, 2.0, 4), vec![-2.0, -1.0, 0.0, 1.0]);
        assert_eq!(linspace(1.0, 1.0, 3), vec![1.0, 1.0, 1.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert!(linspace(2.0, -2.0, 5).is_empty());
    }
}
