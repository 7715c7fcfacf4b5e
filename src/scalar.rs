//! Scalar-output differentiable functions.
//!
//! A [`ScalarFunction`] represents `y = f(x₁, ..., xₙ) ∈ ℝ` and can report both its
//! value and its exact gradient `[∂f/∂x₁, ..., ∂f/∂xₙ]` at any point. Functions are
//! built bottom-up from primitives and combined into trees:
//!
//! - Primitives: constants, polynomials in one variable, linear maps and elementary
//!   functions (sin, cos, exp, ln) applied to one input coordinate
//! - Combinators: sum, product, quotient and composition
//!
//! Every combinator checks the shapes of its operands when it is constructed, so an
//! assembled tree can never produce a gradient of the wrong length.
//!
//! # Differentiation rules
//! - Sum rule: ∇(f + g) = ∇f + ∇g
//! - Product rule: ∇(f * g) = g∇f + f∇g
//! - Quotient rule: ∇(f / g) = (g∇f - f∇g) / g²
//! - Chain rule: ∇(g ∘ h) = g'(h(x)) ∇h
//!
//! # Example
//!
//! ```
//! use diffprog::ScalarFunction;
//!
//! // f(x) = x² + 4
//! let f = ScalarFunction::sum(
//!     ScalarFunction::polynomial(&[0.0, 0.0, 1.0]).unwrap(),
//!     ScalarFunction::constant(4.0, 1),
//! )
//! .unwrap();
//!
//! assert_eq!(f.evaluate(&[2.0]).unwrap(), 8.0);
//! assert_eq!(f.gradient(&[2.0]).unwrap(), vec![4.0]);
//! ```

use std::fmt;
use std::sync::Arc;

use colored::Colorize;

use crate::backends::vector::Vector;
use crate::elementary::Elementary;
use crate::errors::{check_len, FunctionError};
use crate::linalg::{add, combine, dot, scale};

/// A differentiable function from ℝⁿ to ℝ.
///
/// Values of this type are immutable. Sub-functions are held behind `Arc`, so cloning
/// a function is cheap and the same function can be shared by several trees and
/// evaluated from several threads at once.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarFunction {
    node: Node,
    input_dim: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Constant(f64),
    /// Coefficients ordered c₀, c₁, ..., c_{m-1}
    Polynomial(Vec<f64>),
    Linear {
        intercept: f64,
        slopes: Vec<f64>,
    },
    Elementary {
        kind: Elementary,
        index: usize,
    },
    Sum(Arc<ScalarFunction>, Arc<ScalarFunction>),
    Product(Arc<ScalarFunction>, Arc<ScalarFunction>),
    Quotient(Arc<ScalarFunction>, Arc<ScalarFunction>),
    Compose {
        outer: Arc<ScalarFunction>,
        inner: Arc<ScalarFunction>,
    },
}

impl ScalarFunction {
    /// Sine of a single variable.
    pub const SIN: ScalarFunction = ScalarFunction::unary(Elementary::Sin);
    /// Cosine of a single variable.
    pub const COS: ScalarFunction = ScalarFunction::unary(Elementary::Cos);
    /// Exponential of a single variable.
    pub const EXP: ScalarFunction = ScalarFunction::unary(Elementary::Exp);
    /// Natural logarithm of a single variable.
    pub const LN: ScalarFunction = ScalarFunction::unary(Elementary::Ln);

    const fn unary(kind: Elementary) -> Self {
        Self {
            node: Node::Elementary { kind, index: 0 },
            input_dim: 1,
        }
    }

    /// Creates a function that ignores its input and always returns `value`.
    ///
    /// The gradient is the zero vector of length `input_dim`.
    pub fn constant(value: f64, input_dim: usize) -> Self {
        Self {
            node: Node::Constant(value),
            input_dim,
        }
    }

    /// Creates the single-variable polynomial `c₀ + c₁x + ... + c_{m-1}x^{m-1}`.
    ///
    /// # Errors
    /// Returns `FunctionError::Construction` if `coefficients` is empty.
    ///
    /// # Example
    /// ```
    /// # use diffprog::ScalarFunction;
    /// let f = ScalarFunction::polynomial(&[4.0, 5.0]).unwrap(); // 5x + 4
    /// assert_eq!(f.evaluate(&[2.0]).unwrap(), 14.0);
    /// assert_eq!(f.derivative(2.0).unwrap(), 5.0);
    /// ```
    pub fn polynomial(coefficients: &[f64]) -> Result<Self, FunctionError> {
        if coefficients.is_empty() {
            return Err(FunctionError::Construction(
                "polynomial needs at least one coefficient".to_string(),
            ));
        }
        Ok(Self {
            node: Node::Polynomial(coefficients.to_vec()),
            input_dim: 1,
        })
    }

    /// Creates the linear map `intercept + slopes · x`.
    ///
    /// The input dimension is the number of slopes.
    pub fn linear(intercept: f64, slopes: &[f64]) -> Self {
        Self {
            input_dim: slopes.len(),
            node: Node::Linear {
                intercept,
                slopes: slopes.to_vec(),
            },
        }
    }

    /// Applies an elementary function to coordinate `index` of an `input_dim`-dimensional input.
    ///
    /// # Errors
    /// Returns `FunctionError::Construction` if `index` is not a valid coordinate.
    ///
    /// # Example
    /// ```
    /// # use diffprog::{Elementary, ScalarFunction};
    /// let f = ScalarFunction::elementary(Elementary::Exp, 3, 1).unwrap();
    /// assert_eq!(f.evaluate(&[5.0, 0.0, 5.0]).unwrap(), 1.0);
    /// assert_eq!(f.gradient(&[5.0, 0.0, 5.0]).unwrap(), vec![0.0, 1.0, 0.0]);
    /// ```
    pub fn elementary(
        kind: Elementary,
        input_dim: usize,
        index: usize,
    ) -> Result<Self, FunctionError> {
        if index >= input_dim {
            return Err(FunctionError::Construction(format!(
                "{kind} applied to coordinate {index} of a {input_dim}-dimensional input"
            )));
        }
        Ok(Self {
            node: Node::Elementary { kind, index },
            input_dim,
        })
    }

    /// Sine of coordinate `index`.
    pub fn sin(input_dim: usize, index: usize) -> Result<Self, FunctionError> {
        Self::elementary(Elementary::Sin, input_dim, index)
    }

    /// Cosine of coordinate `index`.
    pub fn cos(input_dim: usize, index: usize) -> Result<Self, FunctionError> {
        Self::elementary(Elementary::Cos, input_dim, index)
    }

    /// Exponential of coordinate `index`.
    pub fn exp(input_dim: usize, index: usize) -> Result<Self, FunctionError> {
        Self::elementary(Elementary::Exp, input_dim, index)
    }

    /// Natural logarithm of coordinate `index`.
    pub fn ln(input_dim: usize, index: usize) -> Result<Self, FunctionError> {
        Self::elementary(Elementary::Ln, input_dim, index)
    }

    /// Creates `a + b`.
    ///
    /// # Arguments
    /// * `a` - Left operand
    /// * `b` - Right operand with the same input dimension as `a`
    ///
    /// # Errors
    /// Returns `FunctionError::ShapeMismatch` if the operands have different input dimensions.
    pub fn sum(
        a: impl Into<Arc<ScalarFunction>>,
        b: impl Into<Arc<ScalarFunction>>,
    ) -> Result<Self, FunctionError> {
        let (a, b) = (a.into(), b.into());
        check_len("sum", a.input_dim, b.input_dim)?;
        Ok(Self {
            input_dim: a.input_dim,
            node: Node::Sum(a, b),
        })
    }

    /// Creates `a * b`.
    ///
    /// # Arguments
    /// * `a` - Left operand
    /// * `b` - Right operand with the same input dimension as `a`
    ///
    /// # Errors
    /// Returns `FunctionError::ShapeMismatch` if the operands have different input dimensions.
    ///
    /// # Example
    /// ```
    /// # use diffprog::ScalarFunction;
    /// let x = ScalarFunction::polynomial(&[0.0, 1.0]).unwrap();
    /// let square = ScalarFunction::product(x.clone(), x).unwrap();
    /// assert_eq!(square.evaluate(&[3.0]).unwrap(), 9.0);
    /// assert_eq!(square.derivative(3.0).unwrap(), 6.0);
    /// ```
    pub fn product(
        a: impl Into<Arc<ScalarFunction>>,
        b: impl Into<Arc<ScalarFunction>>,
    ) -> Result<Self, FunctionError> {
        let (a, b) = (a.into(), b.into());
        check_len("product", a.input_dim, b.input_dim)?;
        Ok(Self {
            input_dim: a.input_dim,
            node: Node::Product(a, b),
        })
    }

    /// Creates `a / b`.
    ///
    /// Points where `b` vanishes are not intercepted; value and gradient become
    /// infinite or NaN there.
    ///
    /// # Arguments
    /// * `a` - Numerator
    /// * `b` - Denominator with the same input dimension as `a`
    ///
    /// # Errors
    /// Returns `FunctionError::ShapeMismatch` if the operands have different input dimensions.
    pub fn quotient(
        a: impl Into<Arc<ScalarFunction>>,
        b: impl Into<Arc<ScalarFunction>>,
    ) -> Result<Self, FunctionError> {
        let (a, b) = (a.into(), b.into());
        check_len("quotient", a.input_dim, b.input_dim)?;
        Ok(Self {
            input_dim: a.input_dim,
            node: Node::Quotient(a, b),
        })
    }

    /// Creates `outer ∘ inner`, i.e. `x ↦ outer(inner(x))`.
    ///
    /// `outer` must be a function of a single variable. The composition takes the
    /// input dimension of `inner`.
    ///
    /// # Arguments
    /// * `outer` - Single-variable function applied last
    /// * `inner` - Function applied first
    ///
    /// # Returns
    /// * `Result<ScalarFunction, FunctionError>` - Function taking `inner.input_dim()` inputs
    ///
    /// # Errors
    /// Returns `FunctionError::ShapeMismatch` if `outer` does not take exactly one input.
    ///
    /// # Example
    /// ```
    /// # use diffprog::ScalarFunction;
    /// // sin(x²)
    /// let inner = ScalarFunction::polynomial(&[0.0, 0.0, 1.0]).unwrap();
    /// let f = ScalarFunction::compose(ScalarFunction::SIN, inner).unwrap();
    /// assert_eq!(f.evaluate(&[0.0]).unwrap(), 0.0);
    /// assert_eq!(f.derivative(0.0).unwrap(), 0.0);
    /// ```
    pub fn compose(
        outer: impl Into<Arc<ScalarFunction>>,
        inner: impl Into<Arc<ScalarFunction>>,
    ) -> Result<Self, FunctionError> {
        let (outer, inner) = (outer.into(), inner.into());
        check_len("compose", 1, outer.input_dim)?;
        Ok(Self {
            input_dim: inner.input_dim,
            node: Node::Compose { outer, inner },
        })
    }

    /// Evaluates the function at the given point.
    ///
    /// # Arguments
    /// * `x` - Point with one coordinate per input
    ///
    /// # Returns
    /// * `Result<f64, FunctionError>` - Value of the function at `x`
    ///
    /// # Errors
    /// Returns `FunctionError::ShapeMismatch` if the point does not have exactly
    /// `input_dim()` coordinates. A bare constant accepts any point.
    ///
    /// # Panics
    /// Panics if `x` is a non-contiguous `ndarray::Array1`.
    pub fn evaluate<V: Vector + ?Sized>(&self, x: &V) -> Result<f64, FunctionError> {
        let x = x.as_slice();
        self.validate_point(x)?;
        Ok(self.value(x))
    }

    /// Computes the gradient (all first order partial derivatives) at the given point.
    ///
    /// The gradient has one entry per input coordinate, zero for coordinates the
    /// function does not depend on.
    ///
    /// # Arguments
    /// * `x` - Point with one coordinate per input
    ///
    /// # Returns
    /// * `Result<Vec<f64>, FunctionError>` - Partial derivatives in input order
    ///
    /// # Errors
    /// Returns `FunctionError::ShapeMismatch` if the point does not have exactly
    /// `input_dim()` coordinates. A bare constant accepts any point.
    ///
    /// # Panics
    /// Panics if `x` is a non-contiguous `ndarray::Array1`.
    pub fn gradient<V: Vector + ?Sized>(&self, x: &V) -> Result<Vec<f64>, FunctionError> {
        let x = x.as_slice();
        self.validate_point(x)?;
        Ok(self.value_and_gradient(x).1)
    }

    /// Computes value and gradient together in a single pass over the tree.
    pub fn evaluate_with_gradient<V: Vector + ?Sized>(
        &self,
        x: &V,
    ) -> Result<(f64, Vec<f64>), FunctionError> {
        let x = x.as_slice();
        self.validate_point(x)?;
        Ok(self.value_and_gradient(x))
    }

    /// Derivative of a single-variable function at `x`.
    ///
    /// # Errors
    /// Returns `FunctionError::ShapeMismatch` if the function does not take exactly one input.
    pub fn derivative(&self, x: f64) -> Result<f64, FunctionError> {
        check_len("derivative", 1, self.input_dim)?;
        Ok(self.value_and_gradient(&[x]).1[0])
    }

    /// Number of input coordinates.
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Number of outputs, always one.
    pub fn output_dim(&self) -> usize {
        1
    }

    /// Short name of the outermost node of the function tree.
    pub fn kind(&self) -> &'static str {
        match &self.node {
            Node::Constant(_) => "constant",
            Node::Polynomial(_) => "polynomial",
            Node::Linear { .. } => "linear",
            Node::Elementary { kind, .. } => kind.name(),
            Node::Sum(..) => "sum",
            Node::Product(..) => "product",
            Node::Quotient(..) => "quotient",
            Node::Compose { .. } => "compose",
        }
    }

    fn validate_point(&self, x: &[f64]) -> Result<(), FunctionError> {
        match self.node {
            Node::Constant(_) => Ok(()),
            _ => check_len("evaluate", self.input_dim, x.len()),
        }
    }

    /// Value of the tree at `x`. The length of `x` has already been validated.
    pub(crate) fn value(&self, x: &[f64]) -> f64 {
        match &self.node {
            Node::Constant(c) => *c,
            Node::Polynomial(coefficients) => polynomial_value(coefficients, x[0]),
            Node::Linear { intercept, slopes } => intercept + dot(slopes, x),
            Node::Elementary { kind, index } => kind.apply(x[*index]),
            Node::Sum(a, b) => a.value(x) + b.value(x),
            Node::Product(a, b) => a.value(x) * b.value(x),
            Node::Quotient(a, b) => a.value(x) / b.value(x),
            Node::Compose { outer, inner } => outer.value(&[inner.value(x)]),
        }
    }

    /// Value and gradient of the tree at `x`. The length of `x` has already been validated.
    pub(crate) fn value_and_gradient(&self, x: &[f64]) -> (f64, Vec<f64>) {
        match &self.node {
            Node::Constant(c) => (*c, vec![0.0; self.input_dim]),
            Node::Polynomial(coefficients) => (
                polynomial_value(coefficients, x[0]),
                vec![polynomial_derivative(coefficients, x[0])],
            ),
            Node::Linear { intercept, slopes } => (intercept + dot(slopes, x), slopes.clone()),
            Node::Elementary { kind, index } => {
                let mut gradient = vec![0.0; self.input_dim];
                gradient[*index] = kind.derivative(x[*index]);
                (kind.apply(x[*index]), gradient)
            }
            Node::Sum(a, b) => {
                let (fa, ga) = a.value_and_gradient(x);
                let (fb, gb) = b.value_and_gradient(x);
                (fa + fb, add(&ga, &gb))
            }
            Node::Product(a, b) => {
                // d(f * g) = g * df + f * dg
                let (fa, ga) = a.value_and_gradient(x);
                let (fb, gb) = b.value_and_gradient(x);
                (fa * fb, combine(fb, &ga, fa, &gb))
            }
            Node::Quotient(a, b) => {
                // d(f / g) = (g * df - f * dg) / g^2
                let (fa, ga) = a.value_and_gradient(x);
                let (fb, gb) = b.value_and_gradient(x);
                let numerator = combine(fb, &ga, -fa, &gb);
                (fa / fb, scale(&numerator, 1.0 / fb.powi(2)))
            }
            Node::Compose { outer, inner } => {
                let (fi, gi) = inner.value_and_gradient(x);
                let (fo, go) = outer.value_and_gradient(&[fi]);
                (fo, scale(&gi, go[0]))
            }
        }
    }
}

/// Evaluates `c₀ + c₁x + ...` accumulating powers of `x` instead of recomputing them.
fn polynomial_value(coefficients: &[f64], x: f64) -> f64 {
    let mut value = coefficients[0];
    let mut x_pow = x;
    for c in &coefficients[1..] {
        value += c * x_pow;
        x_pow *= x;
    }
    value
}

/// Evaluates `c₁ + 2c₂x + ... + (m-1)c_{m-1}x^{m-2}`.
fn polynomial_derivative(coefficients: &[f64], x: f64) -> f64 {
    match coefficients {
        [] | [_] => 0.0,
        [_, c1] => *c1,
        [_, c1, rest @ ..] => {
            let mut derivative = *c1;
            let mut x_pow = x;
            let mut i = 2.0;
            for c in rest {
                derivative += i * c * x_pow;
                x_pow *= x;
                i += 1.0;
            }
            derivative
        }
    }
}

impl fmt::Display for ScalarFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: ℝ^{} → ℝ",
            "ScalarFunction".cyan(),
            self.kind(),
            self.input_dim
        )
    }
}
