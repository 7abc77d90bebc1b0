//! Mathematical constants available to equations
use std::f64::consts;

/// Named constants, in both the lower-case math spelling and the upper-case
/// Rust spelling
pub const CONSTANTS: &[(&str, f64)] = &[
    ("pi", consts::PI),
    ("PI", consts::PI),
    ("e", consts::E),
    ("E", consts::E),
    ("tau", consts::TAU),
    ("TAU", consts::TAU),
    ("phi", 1.618033988749895),
    ("PHI", 1.618033988749895),
];
