use crate::Error;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// An axis-aligned sampling region
///
/// Bounds are stored as lower and upper corners; construction checks that every
/// axis is finite and non-empty (`lower < upper`).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds", into = "RawBounds")]
pub struct BoundingBox {
    lower: Vector3<f64>,
    upper: Vector3<f64>,
}

impl Default for BoundingBox {
    /// By default, the bounds are the `[-5, +5]` cube
    fn default() -> Self {
        Self {
            lower: Vector3::repeat(-5.0),
            upper: Vector3::repeat(5.0),
        }
    }
}

impl BoundingBox {
    /// Builds a box from `[min, max]` ranges on each axis
    pub fn new(x: [f64; 2], y: [f64; 2], z: [f64; 2]) -> Result<Self, Error> {
        Self::from_corners(
            Vector3::new(x[0], y[0], z[0]),
            Vector3::new(x[1], y[1], z[1]),
        )
    }

    /// Builds a box from its lower and upper corners
    pub fn from_corners(
        lower: Vector3<f64>,
        upper: Vector3<f64>,
    ) -> Result<Self, Error> {
        for ((axis, lo), hi) in ['x', 'y', 'z'].into_iter().zip(&lower).zip(&upper)
        {
            if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                return Err(Error::InvalidBounds {
                    axis,
                    lower: *lo,
                    upper: *hi,
                });
            }
        }
        Ok(Self { lower, upper })
    }

    /// Builds a box from corners which are known to be valid
    pub(crate) fn from_valid(lower: Vector3<f64>, upper: Vector3<f64>) -> Self {
        debug_assert!(Self::from_corners(lower, upper).is_ok());
        Self { lower, upper }
    }

    /// Builds a cube spanning `[-size, +size]` on every axis
    pub fn cube(size: f64) -> Result<Self, Error> {
        Self::new([-size, size], [-size, size], [-size, size])
    }

    /// Returns the lower corner
    pub fn lower(&self) -> Vector3<f64> {
        self.lower
    }

    /// Returns the upper corner
    pub fn upper(&self) -> Vector3<f64> {
        self.upper
    }

    /// Returns the spacing between grid samples on each axis, for a grid with
    /// `resolution` samples per axis
    ///
    /// The first and last samples land exactly on the box faces.
    pub fn step(&self, resolution: usize) -> Vector3<f64> {
        (self.upper - self.lower) / (resolution - 1) as f64
    }
}

/// Flat form used for (de)serialization, so that invalid boxes are rejected
/// on the way in
#[derive(Serialize, Deserialize)]
struct RawBounds {
    x: [f64; 2],
    y: [f64; 2],
    z: [f64; 2],
}

impl TryFrom<RawBounds> for BoundingBox {
    type Error = Error;
    fn try_from(r: RawBounds) -> Result<Self, Error> {
        BoundingBox::new(r.x, r.y, r.z)
    }
}

impl From<BoundingBox> for RawBounds {
    fn from(b: BoundingBox) -> Self {
        RawBounds {
            x: [b.lower.x, b.upper.x],
            y: [b.lower.y, b.upper.y],
            z: [b.lower.z, b.upper.z],
        }
    }
}
