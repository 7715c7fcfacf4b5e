//! Vector-output differentiable functions.
//!
//! A [`VectorFunction`] represents `y = f(x₁, ..., xₙ) ∈ ℝᵏ`. Its derivative is the
//! k×n Jacobian matrix whose row `i` is the gradient of output `i`.
//!
//! # Features
//!
//! - Affine maps given as coefficient rows `[intercept, slope₁, ..., slopeₙ]`
//! - Stacking of scalar functions sharing one input dimension
//! - Elementwise sum and (Hadamard) product, and composition via the multivariate
//!   chain rule `J(x) = J_outer(inner(x)) · J_inner(x)`
//! - Jacobians written into any [`Matrix`] backend
//! - Parallel evaluation over batches of points
//!
//! # Example
//!
//! ```
//! use diffprog::VectorFunction;
//!
//! // f(x, y) = [2x + 4y, 1 + y]
//! let f = VectorFunction::affine(vec![vec![0.0, 2.0, 4.0], vec![1.0, 0.0, 1.0]]).unwrap();
//!
//! assert_eq!(f.evaluate(&[0.0, 0.0]).unwrap(), vec![0.0, 1.0]);
//! assert_eq!(
//!     f.jacobian(&[0.0, 0.0]).unwrap(),
//!     vec![vec![2.0, 4.0], vec![0.0, 1.0]]
//! );
//! ```

use std::fmt;
use std::sync::Arc;

use colored::Colorize;
use itertools::Itertools;
use rayon::prelude::*;

use crate::backends::matrix::Matrix;
use crate::backends::vector::Vector;
use crate::errors::{check_len, FunctionError};
use crate::linalg::{add, add_matrix, combine, dot, matmul};
use crate::scalar::ScalarFunction;

/// A differentiable function from ℝⁿ to ℝᵏ.
///
/// Values of this type are immutable and cheap to clone. They are `Send + Sync`, so
/// one function can be evaluated from many threads without synchronization.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorFunction {
    node: Node,
    input_dim: usize,
    output_dim: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Constant(Vec<f64>),
    /// Rows of `[intercept, slope₁, ..., slopeₙ]`
    Affine(Vec<Vec<f64>>),
    Stack(Vec<ScalarFunction>),
    Sum(Arc<VectorFunction>, Arc<VectorFunction>),
    Product(Arc<VectorFunction>, Arc<VectorFunction>),
    Compose {
        outer: Arc<VectorFunction>,
        inner: Arc<VectorFunction>,
    },
}

impl VectorFunction {
    /// Creates a function that ignores its input and always returns `values`.
    ///
    /// The Jacobian is the zero matrix of shape `values.len() × input_dim`.
    ///
    /// # Arguments
    /// * `values` - Output of the function, one entry per output
    /// * `input_dim` - Number of input coordinates the function nominally takes
    ///
    /// # Errors
    /// Returns `FunctionError::Construction` if `values` is empty.
    pub fn constant(values: Vec<f64>, input_dim: usize) -> Result<Self, FunctionError> {
        if values.is_empty() {
            return Err(FunctionError::Construction(
                "constant needs at least one output".to_string(),
            ));
        }
        Ok(Self {
            output_dim: values.len(),
            node: Node::Constant(values),
            input_dim,
        })
    }

    /// Creates the affine map `x ↦ C·[1; x]` from coefficient rows.
    ///
    /// Each row is `[intercept, slope₁, ..., slopeₙ]` and produces one output. If
    /// every row holds only an intercept the result is a constant with input
    /// dimension zero.
    ///
    /// # Errors
    /// Returns `FunctionError::Construction` if there are no rows, a row is empty, or
    /// rows have different lengths.
    ///
    /// # Example
    /// ```
    /// # use diffprog::VectorFunction;
    /// let f = VectorFunction::affine(vec![vec![5.0]]).unwrap();
    /// assert_eq!(f.kind(), "constant");
    /// assert_eq!(f.evaluate(&[1.0, 2.0]).unwrap(), vec![5.0]);
    /// ```
    pub fn affine(rows: Vec<Vec<f64>>) -> Result<Self, FunctionError> {
        let Some(width) = rows.first().map(Vec::len) else {
            return Err(FunctionError::Construction(
                "affine map needs at least one row".to_string(),
            ));
        };
        if width == 0 {
            return Err(FunctionError::Construction(
                "affine row needs an intercept column".to_string(),
            ));
        }
        if let Some((i, row)) = rows.iter().find_position(|row| row.len() != width) {
            return Err(FunctionError::Construction(format!(
                "affine row {i} has {} columns, expected {width}",
                row.len()
            )));
        }

        if width == 1 {
            let values = rows.into_iter().map(|row| row[0]).collect();
            return Self::constant(values, 0);
        }

        Ok(Self {
            input_dim: width - 1,
            output_dim: rows.len(),
            node: Node::Affine(rows),
        })
    }

    /// Stacks scalar functions into one function whose output `i` is `functions[i]`.
    ///
    /// # Arguments
    /// * `functions` - Scalar functions sharing one input dimension, one per output
    ///
    /// # Returns
    /// * `Result<VectorFunction, FunctionError>` - Function from ℝⁿ to ℝ^{functions.len()}
    ///
    /// # Errors
    /// Returns `FunctionError::Construction` if `functions` is empty and
    /// `FunctionError::ShapeMismatch` if the functions have different input dimensions.
    ///
    /// # Example
    /// ```
    /// # use diffprog::{ScalarFunction, VectorFunction};
    /// let f = VectorFunction::stack(vec![
    ///     ScalarFunction::linear(0.0, &[2.0, 4.0]),
    ///     ScalarFunction::linear(1.0, &[0.0, 1.0]),
    /// ])
    /// .unwrap();
    /// assert_eq!(f.evaluate(&[0.0, 0.0]).unwrap(), vec![0.0, 1.0]);
    /// ```
    pub fn stack(functions: Vec<ScalarFunction>) -> Result<Self, FunctionError> {
        let Some(input_dim) = functions.first().map(ScalarFunction::input_dim) else {
            return Err(FunctionError::Construction(
                "stack needs at least one function".to_string(),
            ));
        };
        if let Some(f) = functions.iter().find(|f| f.input_dim() != input_dim) {
            return Err(FunctionError::shape("stack", input_dim, f.input_dim()));
        }
        Ok(Self {
            input_dim,
            output_dim: functions.len(),
            node: Node::Stack(functions),
        })
    }

    /// Creates the elementwise sum `a + b`.
    ///
    /// # Arguments
    /// * `a` - Left operand
    /// * `b` - Right operand with the same input and output dimensions as `a`
    ///
    /// # Errors
    /// Returns `FunctionError::ShapeMismatch` unless both operands have the same input
    /// and output dimensions.
    pub fn sum(
        a: impl Into<Arc<VectorFunction>>,
        b: impl Into<Arc<VectorFunction>>,
    ) -> Result<Self, FunctionError> {
        let (a, b) = (a.into(), b.into());
        check_same_shape("sum", &a, &b)?;
        Ok(Self {
            input_dim: a.input_dim,
            output_dim: a.output_dim,
            node: Node::Sum(a, b),
        })
    }

    /// Creates the elementwise (Hadamard) product `a ⊙ b`.
    ///
    /// Row `i` of the Jacobian follows the scalar product rule
    /// `bᵢ∇aᵢ + aᵢ∇bᵢ`.
    ///
    /// # Arguments
    /// * `a` - Left operand
    /// * `b` - Right operand with the same input and output dimensions as `a`
    ///
    /// # Errors
    /// Returns `FunctionError::ShapeMismatch` unless both operands have the same input
    /// and output dimensions.
    pub fn product(
        a: impl Into<Arc<VectorFunction>>,
        b: impl Into<Arc<VectorFunction>>,
    ) -> Result<Self, FunctionError> {
        let (a, b) = (a.into(), b.into());
        check_same_shape("product", &a, &b)?;
        Ok(Self {
            input_dim: a.input_dim,
            output_dim: a.output_dim,
            node: Node::Product(a, b),
        })
    }

    /// Creates `outer ∘ inner`, i.e. `x ↦ outer(inner(x))`.
    ///
    /// The Jacobian is the matrix product `J_outer(inner(x)) · J_inner(x)`.
    ///
    /// # Arguments
    /// * `outer` - Function applied last, taking `inner.output_dim()` inputs
    /// * `inner` - Function applied first, its input becomes the composition's input
    ///
    /// # Returns
    /// * `Result<VectorFunction, FunctionError>` - Function from ℝ^{inner.input_dim()} to
    ///   ℝ^{outer.output_dim()}
    ///
    /// # Errors
    /// Returns `FunctionError::ShapeMismatch` if the input dimension of `outer` differs
    /// from the output dimension of `inner`.
    pub fn compose(
        outer: impl Into<Arc<VectorFunction>>,
        inner: impl Into<Arc<VectorFunction>>,
    ) -> Result<Self, FunctionError> {
        let (outer, inner) = (outer.into(), inner.into());
        check_len("compose", inner.output_dim, outer.input_dim)?;
        Ok(Self {
            input_dim: inner.input_dim,
            output_dim: outer.output_dim,
            node: Node::Compose { outer, inner },
        })
    }

    /// Evaluates the function at the given point.
    ///
    /// # Arguments
    /// * `x` - Point with one coordinate per input
    ///
    /// # Returns
    /// * `Result<Vec<f64>, FunctionError>` - One value per output
    ///
    /// # Errors
    /// Returns `FunctionError::ShapeMismatch` if the point does not have exactly
    /// `input_dim()` coordinates. A bare constant accepts any point.
    ///
    /// # Panics
    /// Panics if `x` is a non-contiguous `ndarray::Array1`.
    pub fn evaluate<V: Vector + ?Sized>(&self, x: &V) -> Result<Vec<f64>, FunctionError> {
        let x = x.as_slice();
        self.validate_point(x)?;
        Ok(self.value(x))
    }

    /// Evaluates the function and writes the outputs into `results`.
    ///
    /// # Arguments
    /// * `x` - Point with one coordinate per input
    /// * `results` - Output buffer with one slot per output
    ///
    /// # Errors
    /// Returns `FunctionError::ShapeMismatch` if the point or `results` has the wrong length.
    ///
    /// # Panics
    /// Panics if `x` or `results` is a non-contiguous `ndarray::Array1`.
    ///
    /// # Example
    /// ```
    /// # use diffprog::VectorFunction;
    /// let f = VectorFunction::affine(vec![vec![1.0, 1.0], vec![0.0, 3.0]]).unwrap();
    /// let mut results = [0.0; 2];
    /// f.evaluate_into(&[2.0], &mut results).unwrap();
    /// assert_eq!(results, [3.0, 6.0]);
    /// ```
    pub fn evaluate_into<V, R>(&self, x: &V, results: &mut R) -> Result<(), FunctionError>
    where
        V: Vector + ?Sized,
        R: Vector + ?Sized,
    {
        check_len("evaluate_into", self.output_dim, results.len())?;
        let values = self.evaluate(x)?;
        results.as_mut_slice().copy_from_slice(&values);
        Ok(())
    }

    /// Computes the k×n Jacobian at the given point, one row per output.
    ///
    /// # Arguments
    /// * `x` - Point with one coordinate per input
    ///
    /// # Returns
    /// * `Result<Vec<Vec<f64>>, FunctionError>` - Row `i` holds the partial derivatives
    ///   of output `i` in input order
    ///
    /// # Errors
    /// Returns `FunctionError::ShapeMismatch` if the point does not have exactly
    /// `input_dim()` coordinates. A bare constant accepts any point.
    ///
    /// # Panics
    /// Panics if `x` is a non-contiguous `ndarray::Array1`.
    pub fn jacobian<V: Vector + ?Sized>(&self, x: &V) -> Result<Vec<Vec<f64>>, FunctionError> {
        let x = x.as_slice();
        self.validate_point(x)?;
        Ok(self.value_and_jacobian(x).1)
    }

    /// Computes the Jacobian and writes it into `results`.
    ///
    /// # Arguments
    /// * `x` - Point with one coordinate per input
    /// * `results` - Matrix of shape `output_dim() × input_dim()`
    ///
    /// # Errors
    /// Returns `FunctionError::ShapeMismatch` if the point has the wrong length or
    /// `results` is not `output_dim() × input_dim()`.
    pub fn jacobian_into<V, M>(&self, x: &V, results: &mut M) -> Result<(), FunctionError>
    where
        V: Vector + ?Sized,
        M: Matrix,
    {
        let (rows, cols) = results.dims();
        check_len("jacobian_into rows", self.output_dim, rows)?;
        check_len("jacobian_into columns", self.input_dim, cols)?;
        for (i, row) in self.jacobian(x)?.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                results.set(i, j, value);
            }
        }
        Ok(())
    }

    /// Computes the Jacobian into a freshly allocated matrix of type `M`.
    ///
    /// # Example
    /// ```
    /// # use diffprog::VectorFunction;
    /// let f = VectorFunction::affine(vec![vec![0.0, 2.0, 4.0]]).unwrap();
    /// let jacobian: Vec<Vec<f64>> = f.jacobian_as(&[1.0, 1.0]).unwrap();
    /// assert_eq!(jacobian, vec![vec![2.0, 4.0]]);
    /// ```
    pub fn jacobian_as<M, V>(&self, x: &V) -> Result<M, FunctionError>
    where
        M: Matrix,
        V: Vector + ?Sized,
    {
        let mut results = M::zeros(self.output_dim, self.input_dim);
        self.jacobian_into(x, &mut results)?;
        Ok(results)
    }

    /// Computes value and Jacobian together in a single pass over the tree.
    pub fn evaluate_with_jacobian<V: Vector + ?Sized>(
        &self,
        x: &V,
    ) -> Result<(Vec<f64>, Vec<Vec<f64>>), FunctionError> {
        let x = x.as_slice();
        self.validate_point(x)?;
        Ok(self.value_and_jacobian(x))
    }

    /// Evaluates the function in parallel for many points.
    ///
    /// Points are split into chunks based on the available parallelism and
    /// distributed across the rayon thread pool. Results keep the order of `points`.
    ///
    /// # Errors
    /// Returns `FunctionError::ShapeMismatch` if any point has the wrong length.
    ///
    /// # Example
    /// ```
    /// # use diffprog::VectorFunction;
    /// let f = VectorFunction::affine(vec![vec![1.0, 2.0]]).unwrap();
    /// let points = vec![vec![0.0], vec![1.0], vec![2.0]];
    /// let results = f.evaluate_batch(&points).unwrap();
    /// assert_eq!(results, vec![vec![1.0], vec![3.0], vec![5.0]]);
    /// ```
    pub fn evaluate_batch(&self, points: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, FunctionError> {
        points
            .par_chunks(batch_chunk_size(points.len()))
            .flat_map_iter(|chunk| chunk.iter().map(|x| self.evaluate(x)))
            .collect()
    }

    /// Computes the Jacobian in parallel for many points.
    ///
    /// # Errors
    /// Returns `FunctionError::ShapeMismatch` if any point has the wrong length.
    pub fn jacobian_batch(
        &self,
        points: &[Vec<f64>],
    ) -> Result<Vec<Vec<Vec<f64>>>, FunctionError> {
        points
            .par_chunks(batch_chunk_size(points.len()))
            .flat_map_iter(|chunk| chunk.iter().map(|x| self.jacobian(x)))
            .collect()
    }

    /// Number of input coordinates.
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Number of outputs.
    pub fn output_dim(&self) -> usize {
        self.output_dim
    }

    /// Short name of the outermost node of the function tree.
    pub fn kind(&self) -> &'static str {
        match &self.node {
            Node::Constant(_) => "constant",
            Node::Affine(_) => "affine",
            Node::Stack(_) => "stack",
            Node::Sum(..) => "sum",
            Node::Product(..) => "product",
            Node::Compose { .. } => "compose",
        }
    }

    fn validate_point(&self, x: &[f64]) -> Result<(), FunctionError> {
        match self.node {
            Node::Constant(_) => Ok(()),
            _ => check_len("evaluate", self.input_dim, x.len()),
        }
    }

    fn value(&self, x: &[f64]) -> Vec<f64> {
        match &self.node {
            Node::Constant(values) => values.clone(),
            Node::Affine(rows) => rows.iter().map(|row| affine_row_value(row, x)).collect(),
            Node::Stack(functions) => functions.iter().map(|f| f.value(x)).collect(),
            Node::Sum(a, b) => add(&a.value(x), &b.value(x)),
            Node::Product(a, b) => a
                .value(x)
                .iter()
                .zip_eq(b.value(x))
                .map(|(fa, fb)| fa * fb)
                .collect(),
            Node::Compose { outer, inner } => outer.value(&inner.value(x)),
        }
    }

    fn value_and_jacobian(&self, x: &[f64]) -> (Vec<f64>, Vec<Vec<f64>>) {
        match &self.node {
            Node::Constant(values) => (
                values.clone(),
                vec![vec![0.0; self.input_dim]; self.output_dim],
            ),
            Node::Affine(rows) => (
                rows.iter().map(|row| affine_row_value(row, x)).collect(),
                rows.iter().map(|row| row[1..].to_vec()).collect(),
            ),
            Node::Stack(functions) => functions
                .iter()
                .map(|f| f.value_and_gradient(x))
                .unzip(),
            Node::Sum(a, b) => {
                let (fa, ja) = a.value_and_jacobian(x);
                let (fb, jb) = b.value_and_jacobian(x);
                (add(&fa, &fb), add_matrix(&ja, &jb))
            }
            Node::Product(a, b) => {
                // row i: d(a_i * b_i) = b_i * da_i + a_i * db_i
                let (fa, ja) = a.value_and_jacobian(x);
                let (fb, jb) = b.value_and_jacobian(x);
                fa.iter()
                    .zip_eq(&fb)
                    .zip_eq(ja.iter().zip_eq(&jb))
                    .map(|((&ai, &bi), (ga, gb))| (ai * bi, combine(bi, ga, ai, gb)))
                    .unzip()
            }
            Node::Compose { outer, inner } => {
                let (fi, ji) = inner.value_and_jacobian(x);
                let (fo, jo) = outer.value_and_jacobian(&fi);
                (fo, matmul(&jo, &ji, self.input_dim))
            }
        }
    }
}

impl From<ScalarFunction> for VectorFunction {
    /// Wraps a scalar function as a single-output vector function.
    fn from(function: ScalarFunction) -> Self {
        Self {
            input_dim: function.input_dim(),
            output_dim: 1,
            node: Node::Stack(vec![function]),
        }
    }
}

fn affine_row_value(row: &[f64], x: &[f64]) -> f64 {
    row[0] + dot(&row[1..], x)
}

fn check_same_shape(
    context: &'static str,
    a: &VectorFunction,
    b: &VectorFunction,
) -> Result<(), FunctionError> {
    check_len(context, a.input_dim, b.input_dim)?;
    check_len(context, a.output_dim, b.output_dim)
}

/// Roughly four chunks per available thread, at least one point per chunk.
fn batch_chunk_size(n_points: usize) -> usize {
    let num_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(8);
    (n_points / (num_threads * 4)).max(1)
}

impl fmt::Display for VectorFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: ℝ^{} → ℝ^{}",
            "VectorFunction".cyan(),
            self.kind(),
            self.input_dim,
            self.output_dim
        )
    }
}
