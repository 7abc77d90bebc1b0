//! Module containing the HyperSurf universal error type
use crate::{eval::EvalError, render::RenderError};
use thiserror::Error;

/// Universal error type for HyperSurf
#[derive(Error, Debug)]
pub enum Error {
    /// The equation text was rejected by the compiler
    #[error("compile error: {message}")]
    Compile {
        /// Human-readable description from the compiler
        message: String,
    },

    /// The scalar function failed at some point in space and time
    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvalError),

    /// The render sink failed to display a buffer
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Bounding box is empty, inverted, or not finite
    #[error("invalid bounds on the {axis} axis: [{lower}, {upper}]")]
    InvalidBounds {
        /// Axis name (`x`, `y`, or `z`)
        axis: char,
        /// Lower bound
        lower: f64,
        /// Upper bound
        upper: f64,
    },

    /// Grid resolution must be at least 2 samples per axis
    #[error("resolution must be at least 2 (got {0})")]
    InvalidResolution(usize),

    /// Time range is empty, inverted, or not finite
    #[error("invalid time range [{0}, {1}]")]
    InvalidTimeRange(f64, f64),

    /// Animation speed must be finite and positive
    #[error("invalid animation speed {0}")]
    InvalidSpeed(f64),

    /// Sampling was requested before any equation compiled successfully
    #[error("no equation has been compiled")]
    NoFunction,

    /// Worker pool could not be constructed
    #[error("could not build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[cfg(feature = "rhai")]
impl From<rhai::ParseError> for Error {
    fn from(e: rhai::ParseError) -> Self {
        Error::Compile {
            message: e.to_string(),
        }
    }
}

#[cfg(feature = "rhai")]
impl From<Box<rhai::EvalAltResult>> for Error {
    fn from(e: Box<rhai::EvalAltResult>) -> Self {
        Error::Compile {
            message: e.to_string(),
        }
    }
}
