//! HyperSurf samples time-varying implicit surfaces and animates them at a
//! steady frame rate.
//!
//! A **time-varying implicit surface** is the zero level set of a function
//! `f(x, y, z, t)`: for each time value `t`, the surface is the set of points
//! where `f(x, y, z, t) = 0`.  HyperSurf doesn't build meshes; instead, it
//! samples the field on a dense grid and hands the samples to an external
//! renderer, which extracts and draws the isosurface.
//!
//! # Equations
//! Equations are written in conventional math notation and compiled with the
//! [Rhai](https://rhai.rs) scripting engine, in the [`rhai`] module:
//!
//! ```
//! use hypersurf::{eval::ScalarFunction, rhai};
//!
//! let f = rhai::compile("x^2 + y^2 + z^2 - (2 + sin(t))^2")?;
//! assert_eq!(f.eval(2.0, 0.0, 0.0, 0.0)?, 0.0);
//! # Ok::<(), hypersurf::Error>(())
//! ```
//!
//! Anything implementing [`ScalarFunction`](eval::ScalarFunction) can be
//! sampled, including plain closures; hosts with their own parser can plug it
//! in through the [`Compiler`](eval::Compiler) trait.
//!
//! # Sampling
//! [`sample::sample`] evaluates a function on an `N × N × N` grid spanning a
//! [`BoundingBox`](sample::BoundingBox):
//!
//! ```
//! use hypersurf::{rhai, sample::{sample, BoundingBox}};
//!
//! let f = rhai::compile("x^2 + y^2 + z^2 - 4")?;
//! let out = sample(&f, &BoundingBox::cube(4.0)?, 5, 0.0)?;
//! assert_eq!(out.buffer.values()[0], 44.0);
//! # Ok::<(), hypersurf::Error>(())
//! ```
//!
//! # Sessions and animation
//! A [`Session`] bundles the current equation with its bounds, time range,
//! and [quality settings](quality), and knows how to hand a sampled frame to a
//! [`RenderSink`](render::RenderSink).  An [`Animator`](anim::Animator) drives
//! a session from the host's frame clock, skipping frames to stay at the
//! quality profile's target frame rate.
//!
//! ```
//! use hypersurf::{
//!     Session, presets::Preset, render::{RenderError, RenderSink, Style},
//!     sample::SampleBuffer, session::SessionConfig,
//! };
//!
//! struct Count(usize);
//! impl RenderSink for Count {
//!     fn display(
//!         &mut self,
//!         buffer: SampleBuffer,
//!         _style: &Style,
//!     ) -> Result<(), RenderError> {
//!         self.0 += buffer.len();
//!         Ok(())
//!     }
//! }
//!
//! let mut session = Session::new(SessionConfig::default())?;
//! session.load_preset(Preset::Ripple)?;
//! let mut sink = Count(0);
//! let info = session.render(&mut sink)?;
//! assert_eq!(sink.0, info.resolution.pow(3));
//! # Ok::<(), hypersurf::Error>(())
//! ```
//!
//! # Feature flags
#![doc = document_features::document_features!()]
#![warn(missing_docs)]

mod error;
pub use error::Error;

pub mod anim;
pub mod eval;
pub mod presets;
pub mod quality;
pub mod render;
pub mod sample;
pub mod session;
pub mod tree;

pub use session::Session;

#[cfg(feature = "rhai")]
pub mod rhai;
