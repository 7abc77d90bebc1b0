//! Mapping from quality settings to concrete sampling parameters
//!
//! ```
//! use hypersurf::quality::{resolve, DeviceClass, QualityMode};
//!
//! let p = resolve(QualityMode::Auto, DeviceClass::Mobile);
//! assert_eq!(p.resolution(), 15);
//! assert_eq!(p.target_fps(), 30);
//! ```
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

/// Requested quality level
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
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
pub enum QualityMode {
    /// Pick a level based on the device class
    Auto,
    /// Coarse grid, suitable for slow devices
    Low,
    /// Balanced grid size
    #[default]
    Medium,
    /// Fine grid
    High,
}

impl QualityMode {
    /// Parses a mode, falling back to [`QualityMode::Medium`] for unknown text
    pub fn parse_or_default(s: &str) -> Self {
        Self::from_str(s.trim()).unwrap_or_default()
    }
}

/// Broad class of the host device
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
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
pub enum DeviceClass {
    /// Phones and other small or low-power devices
    Mobile,
    /// Everything else
    #[default]
    Desktop,
}

impl DeviceClass {
    /// Parses a device class, falling back to [`DeviceClass::Desktop`]
    pub fn parse_or_default(s: &str) -> Self {
        Self::from_str(s.trim()).unwrap_or_default()
    }

    /// Classifies a device from an `is_mobile` flag
    pub fn from_is_mobile(is_mobile: bool) -> Self {
        if is_mobile {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}

/// Level of lighting detail requested from the renderer
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
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ShadingDetail {
    /// Flat-ish lighting
    Basic,
    /// Default lighting
    Standard,
    /// Strong specular highlights
    High,
}

/// Concrete sampling parameters for a quality level
///
/// Profiles are selected by [`resolve`] and never modified afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityProfile {
    resolution: usize,
    target_fps: u32,
    shading: ShadingDetail,
}

impl QualityProfile {
    const LOW: Self = Self {
        resolution: 15,
        target_fps: 30,
        shading: ShadingDetail::Basic,
    };
    const MEDIUM: Self = Self {
        resolution: 30,
        target_fps: 60,
        shading: ShadingDetail::Standard,
    };
    const HIGH: Self = Self {
        resolution: 50,
        target_fps: 60,
        shading: ShadingDetail::High,
    };

    /// Samples per axis
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Target frame rate, in frames per second
    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Minimum time between animation frames, in milliseconds
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / f64::from(self.target_fps)
    }

    /// Lighting detail to pass to the renderer
    pub fn shading(&self) -> ShadingDetail {
        self.shading
    }
}

impl Default for QualityProfile {
    fn default() -> Self {
        Self::MEDIUM
    }
}

/// Picks a profile for the given mode and device
///
/// Explicit levels ignore the device class; [`QualityMode::Auto`] picks low
/// quality on mobile devices and medium quality elsewhere.
pub fn resolve(mode: QualityMode, device: DeviceClass) -> QualityProfile {
    match (mode, device) {
        (QualityMode::Auto, DeviceClass::Mobile) | (QualityMode::Low, _) => {
            QualityProfile::LOW
        }
        (QualityMode::Auto, DeviceClass::Desktop) | (QualityMode::Medium, _) => {
            QualityProfile::MEDIUM
        }
        (QualityMode::High, _) => QualityProfile::HIGH,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn table() {
        let p = resolve(QualityMode::Auto, DeviceClass::Mobile);
        assert_eq!((p.resolution(), p.target_fps()), (15, 30));
        assert_eq!(p.shading(), ShadingDetail::Basic);

        let p = resolve(QualityMode::Auto, DeviceClass::Desktop);
        assert_eq!((p.resolution(), p.target_fps()), (30, 60));
        assert_eq!(p.shading(), ShadingDetail::Standard);

        let p = resolve(QualityMode::High, DeviceClass::Mobile);
        assert_eq!((p.resolution(), p.target_fps()), (50, 60));
        assert_eq!(p.shading(), ShadingDetail::High);
    }

    #[test]
    fn explicit_levels_ignore_device() {
        for mode in QualityMode::iter().filter(|m| *m != QualityMode::Auto) {
            assert_eq!(
                resolve(mode, DeviceClass::Mobile),
                resolve(mode, DeviceClass::Desktop),
                "{mode} depends on device"
            );
        }
    }

    #[test]
    fn every_profile_is_valid() {
        for mode in QualityMode::iter() {
            for device in DeviceClass::iter() {
                let p = resolve(mode, device);
                assert!(p.resolution() >= 2);
                assert!(p.frame_interval_ms() > 0.0);
            }
        }
    }

    #[test]
    fn frame_interval() {
        let p = resolve(QualityMode::Low, DeviceClass::Desktop);
        assert_relative_eq!(p.frame_interval_ms(), 33.333, epsilon = 1e-3);
        let p = resolve(QualityMode::High, DeviceClass::Desktop);
        assert_relative_eq!(p.frame_interval_ms(), 16.667, epsilon = 1e-3);
    }

    #[test]
    fn parsing() {
        assert_eq!(QualityMode::parse_or_default("high"), QualityMode::High);
        assert_eq!(QualityMode::parse_or_default(" LOW "), QualityMode::Low);
        assert_eq!(QualityMode::parse_or_default("ultra"), QualityMode::Medium);
        assert_eq!(QualityMode::Auto.to_string(), "auto");

        assert_eq!(DeviceClass::parse_or_default("mobile"), DeviceClass::Mobile);
        assert_eq!(DeviceClass::parse_or_default("tv"), DeviceClass::Desktop);
        assert_eq!(DeviceClass::from_is_mobile(true), DeviceClass::Mobile);
        assert_eq!(ShadingDetail::Standard.to_string(), "standard");
    }
}
