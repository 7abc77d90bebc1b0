//! Built-in example surfaces
use crate::sample::BoundingBox;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A named example field, with an equation and a box that frames it
///
/// Every preset animates over one period of `t ∈ [0, 2π]`.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Radial wave traveling outwards
    Wave,
    /// Sphere whose radius oscillates
    Pulse,
    /// Torus with a breathing tube
    Torus,
    /// Sheet rippling diagonally
    Ripple,
}

impl Preset {
    /// Returns the preset's equation, in terms of `x, y, z, t`
    pub fn equation(&self) -> &'static str {
        match self {
            Preset::Wave => "sin(sqrt(x^2 + y^2) - t) - z",
            Preset::Pulse => "x^2 + y^2 + z^2 - (2 + sin(t))^2",
            Preset::Torus => {
                "(sqrt(x^2 + y^2) - 2.5)^2 + z^2 - (0.8 + 0.3*cos(t))^2"
            }
            Preset::Ripple => "z - 0.5*sin(x + t)*cos(y + t)",
        }
    }

    /// Returns the region to sample
    pub fn bounds(&self) -> BoundingBox {
        let (xy, z) = match self {
            Preset::Wave | Preset::Ripple => (5.0, 2.0),
            Preset::Pulse => (4.0, 4.0),
            Preset::Torus => (4.0, 2.0),
        };
        BoundingBox::from_valid(
            Vector3::new(-xy, -xy, -z),
            Vector3::new(xy, xy, z),
        )
    }
}
