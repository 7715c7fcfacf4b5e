//! Differentiable function algebra with exact derivatives.
//!
//! This crate builds differentiable numeric functions from a small set of primitives
//! and combinators. Every function can report its value and its exact derivative
//! (gradient or Jacobian) at any point, without numeric approximation and without a
//! computation graph.
//!
//! # Features
//!
//! - Primitives: constants, single-variable polynomials, linear and affine maps,
//!   and sin/cos/exp/ln applied to one input coordinate
//! - Combinators: sum, product, quotient, composition and stacking into vector outputs
//! - Shape checking when a function is built, so derivatives always have the right size
//! - Immutable, thread-safe function values with parallel batch evaluation
//! - Optional `ndarray` and `nalgebra` containers for points and Jacobians
//!
//! # Example
//!
//! ```rust
//! use diffprog::{ScalarFunction, VectorFunction};
//!
//! // g(x) = sin(x) * x²
//! let square = ScalarFunction::polynomial(&[0.0, 0.0, 1.0]).unwrap();
//! let g = ScalarFunction::product(ScalarFunction::SIN, square).unwrap();
//! let gradient = g.gradient(&[0.0]).unwrap(); // Returns [0.0]
//!
//! // f(x, y) = [2x + 4y, 1 + y]
//! let f = VectorFunction::stack(vec![
//!     ScalarFunction::linear(0.0, &[2.0, 4.0]),
//!     ScalarFunction::linear(1.0, &[0.0, 1.0]),
//! ])
//! .unwrap();
//! let jacobian = f.jacobian(&[0.0, 0.0]).unwrap(); // Returns [[2.0, 4.0], [0.0, 1.0]]
//! ```

pub use elementary::Elementary;
pub use errors::FunctionError;
pub use scalar::ScalarFunction;
pub use vector::VectorFunction;

pub mod prelude {
    pub use crate::backends::matrix::Matrix;
    pub use crate::backends::vector::Vector;
    pub use crate::elementary::Elementary;
    pub use crate::errors::FunctionError;
    pub use crate::scalar::ScalarFunction;
    pub use crate::vector::VectorFunction;
}

/// Container backends for evaluation points and Jacobians
pub mod backends {
    pub mod matrix;
    pub mod vector;
}
/// Elementary unary functions
pub mod elementary;
/// Error types for the various failure modes
pub mod errors;
/// Finite-difference estimators for checking derivatives
pub mod numeric;
/// Scalar-output differentiable functions
pub mod scalar;
/// Vector-output differentiable functions
pub mod vector;

mod linalg;
