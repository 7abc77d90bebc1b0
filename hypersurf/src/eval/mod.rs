//! Scalar functions and the adapter that compiles and validates them
//!
//! A [`ScalarFunction`] maps `(x, y, z, t)` to a value, or fails with an
//! [`EvalError`].  Functions come either from a [`Compiler`] (which turns
//! equation text into a function) or directly from a closure:
//!
//! ```
//! use hypersurf::eval::{EvalError, ScalarFunction};
//!
//! let f = |x: f64, y: f64, z: f64, _t: f64| -> Result<f64, EvalError> {
//!     Ok(x * x + y * y + z * z - 1.0)
//! };
//! assert_eq!(f.eval(1.0, 0.0, 0.0, 0.0)?, 0.0);
//! # Ok::<(), EvalError>(())
//! ```
use std::fmt;

mod adapter;
pub use adapter::{Evaluator, equation_lhs, validate};

use crate::Error;
use std::sync::Arc;

/// A time-varying scalar field `f(x, y, z, t)`
///
/// The rendered surface is the zero level set of this function.
/// Implementations must be shareable across threads, because sampling may fan
/// out over a worker pool.
pub trait ScalarFunction: Send + Sync {
    /// Evaluates the function at a single point
    fn eval(&self, x: f64, y: f64, z: f64, t: f64) -> Result<f64, EvalError>;

    /// Evaluates the function at many points sharing a time value
    ///
    /// All slices must have the same length.  On error, the contents of `out`
    /// are unspecified.
    fn eval_slice(
        &self,
        xs: &[f64],
        ys: &[f64],
        zs: &[f64],
        t: f64,
        out: &mut [f64],
    ) -> Result<(), EvalError> {
        for (((x, y), z), v) in xs.iter().zip(ys).zip(zs).zip(out) {
            *v = self.eval(*x, *y, *z, t)?;
        }
        Ok(())
    }
}

impl<F> ScalarFunction for F
where
    F: Fn(f64, f64, f64, f64) -> Result<f64, EvalError> + Send + Sync,
{
    fn eval(&self, x: f64, y: f64, z: f64, t: f64) -> Result<f64, EvalError> {
        self(x, y, z, t)
    }
}

/// Turns equation text into a [`ScalarFunction`]
///
/// The text has already been reduced to the left-hand side of `lhs = 0` (see
/// [`equation_lhs`]) by the time it reaches the compiler.
pub trait Compiler {
    /// Compiles an expression, failing with [`Error::Compile`] if the text is
    /// rejected
    fn compile(&mut self, text: &str) -> Result<Arc<dyn ScalarFunction>, Error>;
}

impl<F> Compiler for F
where
    F: FnMut(&str) -> Result<Arc<dyn ScalarFunction>, Error>,
{
    fn compile(&mut self, text: &str) -> Result<Arc<dyn ScalarFunction>, Error> {
        self(text)
    }
}

/// Failure to evaluate a scalar function
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    message: String,
    point: Option<[f64; 4]>,
}

impl EvalError {
    /// Builds an error that isn't associated with any specific point
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
            point: None,
        }
    }

    /// Builds an error at the given `(x, y, z, t)` point
    pub fn at<S: Into<String>>(message: S, point: [f64; 4]) -> Self {
        Self {
            message: message.into(),
            point: Some(point),
        }
    }

    /// Returns the human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the `(x, y, z, t)` point of failure, if known
    pub fn point(&self) -> Option<[f64; 4]> {
        self.point
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some([x, y, z, t]) = self.point {
            write!(f, " at (x = {x}, y = {y}, z = {z}, t = {t})")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn closure_slice_eval() {
        let f = |x: f64, y: f64, z: f64, t: f64| -> Result<f64, EvalError> {
            Ok(x + y + z + t)
        };
        let mut out = [0.0; 2];
        f.eval_slice(&[1.0, 2.0], &[1.0, 2.0], &[1.0, 2.0], 1.0, &mut out)
            .unwrap();
        assert_eq!(out, [4.0, 7.0]);
    }

    #[test]
    fn closure_slice_eval_stops_on_error() {
        let f = |x: f64, _y: f64, _z: f64, t: f64| {
            if x < 0.0 {
                Err(EvalError::at("negative", [x, 0.0, 0.0, t]))
            } else {
                Ok(x)
            }
        };
        let mut out = [0.0; 3];
        let err = f
            .eval_slice(&[1.0, -1.0, -2.0], &[0.0; 3], &[0.0; 3], 0.0, &mut out)
            .unwrap_err();
        assert_eq!(err.point(), Some([-1.0, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn error_display() {
        let e = EvalError::new("oops");
        assert_eq!(e.to_string(), "oops");
        let e = EvalError::at("sqrt is undefined here", [-1.0, 0.0, 0.5, 2.0]);
        assert_eq!(
            e.to_string(),
            "sqrt is undefined here at (x = -1, y = 0, z = 0.5, t = 2)"
        );
    }
}
