//! Elementary unary functions and their derivatives.
//!
//! Each [`Elementary`] kind pairs a transcendental function with its closed-form
//! derivative:
//!
//! - sin(x)  → cos(x)
//! - cos(x)  → -sin(x)
//! - exp(x)  → exp(x)
//! - ln(x)   → 1/x
//!
//! No domain checks are performed. `ln` of a non-positive number yields NaN or -Inf
//! exactly as `f64::ln` does, and its derivative at zero is +Inf.

use std::fmt;

/// An elementary unary function applied to a single input coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Elementary {
    /// Sine (argument in radians)
    Sin,
    /// Cosine (argument in radians)
    Cos,
    /// Natural exponential
    Exp,
    /// Natural logarithm
    Ln,
}

impl Elementary {
    /// Applies the function to `x`.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Elementary::Sin => x.sin(),
            Elementary::Cos => x.cos(),
            Elementary::Exp => x.exp(),
            Elementary::Ln => x.ln(),
        }
    }

    /// Lowercase name of the function.
    pub fn name(self) -> &'static str {
        match self {
            Elementary::Sin => "sin",
            Elementary::Cos => "cos",
            Elementary::Exp => "exp",
            Elementary::Ln => "ln",
        }
    }

    /// Evaluates the derivative of the function at `x`.
    pub fn derivative(self, x: f64) -> f64 {
        match self {
            Elementary::Sin => x.cos(),
            Elementary::Cos => -x.sin(),
            Elementary::Exp => x.exp(),
            Elementary::Ln => 1.0 / x,
        }
    }
}

impl fmt::Display for Elementary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_apply() {
        assert_eq!(Elementary::Sin.apply(0.0), 0.0);
        assert_eq!(Elementary::Cos.apply(0.0), 1.0);
        assert_eq!(Elementary::Exp.apply(0.0), 1.0);
        assert_eq!(Elementary::Ln.apply(1.0), 0.0);
    }

    #[test]
    fn test_derivative() {
        assert_eq!(Elementary::Sin.derivative(0.0), 1.0);
        assert_eq!(Elementary::Cos.derivative(PI / 2.0), -1.0);
        assert_eq!(Elementary::Exp.derivative(1.0), 1.0_f64.exp());
        assert_eq!(Elementary::Ln.derivative(4.0), 0.25);
    }

    #[test]
    fn test_ln_outside_domain() {
        assert!(Elementary::Ln.apply(-1.0).is_nan());
        assert_eq!(Elementary::Ln.apply(0.0), f64::NEG_INFINITY);
        assert_eq!(Elementary::Ln.derivative(0.0), f64::INFINITY);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Elementary::Sin), "sin");
        assert_eq!(format!("{}", Elementary::Ln), "ln");
    }
}
