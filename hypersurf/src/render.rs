//! Interface to the external renderer
//!
//! HyperSurf never draws anything itself: each sampled frame is handed to a
//! [`RenderSink`] along with a [`Style`] describing how the isosurface should
//! look.
use crate::{
    quality::{DeviceClass, ShadingDetail},
    sample::SampleBuffer,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Failure reported by a [`RenderSink`]
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("{message}")]
pub struct RenderError {
    message: String,
}

impl RenderError {
    /// Builds a new error from a message
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Something that can display sampled frames
pub trait RenderSink {
    /// Displays a buffer, taking ownership of it
    ///
    /// The call returns once the frame is on screen (or has failed); the
    /// animation scheduler doesn't ask for another frame until then.
    fn display(
        &mut self,
        buffer: SampleBuffer,
        style: &Style,
    ) -> Result<(), RenderError>;

    /// Notifies the sink that the display area changed size
    fn resize(&mut self) {}
}

/// Surface lighting coefficients
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lighting {
    /// Ambient light contribution
    pub ambient: f64,
    /// Diffuse reflection
    pub diffuse: f64,
    /// Specular reflection
    pub specular: f64,
}

impl Default for Lighting {
    fn default() -> Self {
        Self::from(ShadingDetail::Standard)
    }
}

impl From<ShadingDetail> for Lighting {
    fn from(s: ShadingDetail) -> Self {
        let (ambient, diffuse, specular) = match s {
            ShadingDetail::Basic => (0.8, 0.5, 0.0),
            ShadingDetail::Standard => (0.6, 0.7, 0.3),
            ShadingDetail::High => (0.4, 0.8, 0.6),
        };
        Self {
            ambient,
            diffuse,
            specular,
        }
    }
}

/// Presentation parameters passed to the sink with every buffer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Lower edge of the value band drawn as the surface
    pub isomin: f64,
    /// Upper edge of the value band drawn as the surface
    pub isomax: f64,
    /// Name of the color scale applied to the intensity channel
    pub colorscale: String,
    /// Whether to draw the color scale legend
    pub show_scale: bool,
    /// Whether to close the surface where it meets the box faces
    pub caps: bool,
    /// Number of nested isosurfaces to draw within the band
    pub surface_count: usize,
    /// Lighting coefficients
    pub lighting: Lighting,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            isomin: -0.01,
            isomax: 0.01,
            colorscale: "Portland".to_owned(),
            show_scale: true,
            caps: false,
            surface_count: 1,
            lighting: Lighting::default(),
        }
    }
}

impl Style {
    /// Builds the style for a shading level and device
    ///
    /// The color scale legend is hidden on mobile devices.
    pub fn new(shading: ShadingDetail, device: DeviceClass) -> Self {
        Self {
            show_scale: device == DeviceClass::Desktop,
            lighting: shading.into(),
            ..Self::default()
        }
    }
}

/// Timing information about a displayed frame
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameInfo {
    /// Time spent sampling and displaying
    pub elapsed: Duration,
    /// Samples per axis
    pub resolution: usize,
    /// Time value of the frame
    pub t: f64,
}

/// Diagnostic line, e.g. `12ms | 30³ points`
impl std::fmt::Display for FrameInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}ms | {}³ points",
            self.elapsed.as_millis(),
            self.resolution
        )
    }
}
