//! Dense vector/matrix helpers shared by the scalar and vector function algebras.
//!
//! Matrices are row-major `Vec<Vec<f64>>`. Length agreement between operands is an
//! invariant established when a function tree is constructed, so the helpers use
//! `zip_eq` and treat a disagreement as a bug.

use itertools::Itertools;

/// Dot product of two equally long slices.
pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip_eq(b).map(|(x, y)| x * y).sum()
}

/// Elementwise sum of two vectors.
pub(crate) fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip_eq(b).map(|(x, y)| x + y).collect()
}

/// Elementwise sum of two matrices of equal shape.
pub(crate) fn add_matrix(a: &[Vec<f64>], b: &[Vec<f64>]) -> Vec<Vec<f64>> {
    a.iter().zip_eq(b).map(|(x, y)| add(x, y)).collect()
}

/// `s·a + t·b`, used by the product and quotient rules.
pub(crate) fn combine(s: f64, a: &[f64], t: f64, b: &[f64]) -> Vec<f64> {
    a.iter().zip_eq(b).map(|(x, y)| s * x + t * y).collect()
}

/// Multiplies every entry of `a` by `s`.
pub(crate) fn scale(a: &[f64], s: f64) -> Vec<f64> {
    a.iter().map(|x| x * s).collect()
}

/// Matrix product `a · b` where `a` is k×m and `b` is m×n.
///
/// `n` is passed explicitly since `b` may have no rows.
pub(crate) fn matmul(a: &[Vec<f64>], b: &[Vec<f64>], n: usize) -> Vec<Vec<f64>> {
    a.iter()
        .map(|row| {
            let mut out = vec![0.0; n];
            for (&coef, b_row) in row.iter().zip_eq(b) {
                for (o, &v) in out.iter_mut().zip_eq(b_row) {
                    *o += coef * v;
                }
            }
            out
        })
        .collect()
}
