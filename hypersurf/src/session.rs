//! Explorer state: the current function, bounds, time, and quality settings
use crate::{
    Error,
    anim::TimeRange,
    eval::{Compiler, Evaluator, ScalarFunction},
    presets::Preset,
    quality::{DeviceClass, QualityMode, QualityProfile, resolve},
    render::{FrameInfo, RenderSink, Style},
    sample::{BoundingBox, SampleConfig, Sampled, Sampler},
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use web_time::Instant;

/// Initial settings for a [`Session`]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sampling region
    pub bounds: BoundingBox,
    /// Animation time range and starting time
    pub time: TimeRange,
    /// Time step per animation frame
    pub speed: f64,
    /// Requested quality level
    pub quality: QualityMode,
    /// Class of the host device
    pub device: DeviceClass,
    /// Sampler threading
    pub sample: SampleConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bounds: BoundingBox::default(),
            time: TimeRange::default(),
            speed: 0.05,
            quality: QualityMode::default(),
            device: DeviceClass::default(),
            sample: SampleConfig::default(),
        }
    }
}

/// Everything needed to sample and display the current surface
///
/// Settings are changed between frames through `&mut self` methods; the
/// quality profile is re-resolved whenever the mode or device class changes.
pub struct Session {
    evaluator: Evaluator,
    sampler: Sampler,
    bounds: BoundingBox,
    time: TimeRange,
    speed: f64,
    quality: QualityMode,
    device: DeviceClass,
    profile: QualityProfile,
}

impl Session {
    /// Builds a session using the Rhai equation compiler
    #[cfg(feature = "rhai")]
    pub fn new(config: SessionConfig) -> Result<Self, Error> {
        Self::with_compiler(crate::rhai::ScriptCompiler::new(), config)
    }

    /// Builds a session around a custom equation compiler
    pub fn with_compiler<C: Compiler + 'static>(
        compiler: C,
        config: SessionConfig,
    ) -> Result<Self, Error> {
        check_speed(config.speed)?;
        Ok(Self {
            evaluator: Evaluator::new(compiler),
            sampler: Sampler::new(config.sample)?,
            bounds: config.bounds,
            time: config.time,
            speed: config.speed,
            quality: config.quality,
            device: config.device,
            profile: resolve(config.quality, config.device),
        })
    }

    /// Compiles and validates a new equation, making it current
    ///
    /// On failure, the previous equation stays in place.
    pub fn set_equation(&mut self, equation: &str) -> Result<(), Error> {
        self.evaluator.load(equation)
    }

    /// Installs a pre-built function in place of an equation
    pub fn set_function(
        &mut self,
        f: Arc<dyn ScalarFunction>,
    ) -> Result<(), Error> {
        self.evaluator.install(f)
    }

    /// Returns the text of the current equation, if any
    pub fn equation(&self) -> Option<&str> {
        self.evaluator.source()
    }

    /// Returns the current function, if any
    pub fn function(&self) -> Option<&Arc<dyn ScalarFunction>> {
        self.evaluator.current()
    }

    /// Loads a new equation and displays it at the current time
    pub fn update<R: RenderSink + ?Sized>(
        &mut self,
        equation: &str,
        sink: &mut R,
    ) -> Result<FrameInfo, Error> {
        self.set_equation(equation)?;
        self.render(sink)
    }

    /// Loads a preset's equation and bounds
    ///
    /// Bounds only change if the equation compiles.
    pub fn load_preset(&mut self, preset: Preset) -> Result<(), Error> {
        self.set_equation(preset.equation())?;
        self.bounds = preset.bounds();
        Ok(())
    }

    /// Returns the sampling region
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Sets the sampling region
    pub fn set_bounds(&mut self, bounds: BoundingBox) {
        self.bounds = bounds;
    }

    /// Returns the animation time range
    pub fn time(&self) -> &TimeRange {
        &self.time
    }

    /// Returns the current time value
    pub fn t(&self) -> f64 {
        self.time.t()
    }

    /// Sets the current time value, clamped to the time range
    pub fn set_t(&mut self, t: f64) {
        self.time.set(t);
    }

    /// Changes the animation time range
    pub fn set_time_range(&mut self, tmin: f64, tmax: f64) -> Result<(), Error> {
        self.time.set_range(tmin, tmax)
    }

    /// Advances time by one animation step, wrapping within the time range
    pub fn advance_time(&mut self) -> f64 {
        self.time.advance(self.speed)
    }

    /// Time step per animation frame
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Sets the time step per animation frame
    ///
    /// The step must be finite and positive; otherwise, the previous speed is
    /// kept and [`Error::InvalidSpeed`] is returned.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), Error> {
        self.speed = check_speed(speed)?;
        Ok(())
    }

    /// Returns the requested quality level
    pub fn quality(&self) -> QualityMode {
        self.quality
    }

    /// Changes the quality level, re-resolving the profile
    pub fn set_quality(&mut self, mode: QualityMode) {
        self.quality = mode;
        self.reresolve();
    }

    /// Returns the device class
    pub fn device_class(&self) -> DeviceClass {
        self.device
    }

    /// Changes the device class, re-resolving the profile
    pub fn set_device_class(&mut self, device: DeviceClass) {
        self.device = device;
        self.reresolve();
    }

    /// Returns the active quality profile
    pub fn profile(&self) -> &QualityProfile {
        &self.profile
    }

    /// Returns the style passed to the render sink
    pub fn style(&self) -> Style {
        Style::new(self.profile.shading(), self.device)
    }

    /// Samples the current function at the current time
    pub fn sample(&self) -> Result<Sampled, Error> {
        let f = self.evaluator.current().ok_or(Error::NoFunction)?;
        self.sampler.sample(
            f.as_ref(),
            &self.bounds,
            self.profile.resolution(),
            self.time.t(),
        )
    }

    /// Samples the current function and hands the result to a sink
    ///
    /// The reported time covers both sampling and display.
    pub fn render<R: RenderSink + ?Sized>(
        &self,
        sink: &mut R,
    ) -> Result<FrameInfo, Error> {
        let start = Instant::now();
        let sampled = self.sample()?;
        let resolution = sampled.buffer.resolution();
        sink.display(sampled.buffer, &self.style())?;
        Ok(FrameInfo {
            elapsed: start.elapsed(),
            resolution,
            t: self.time.t(),
        })
    }

    fn reresolve(&mut self) {
        let profile = resolve(self.quality, self.device);
        if profile != self.profile {
            debug!(
                "quality profile is now {}³ at {} FPS ({})",
                profile.resolution(),
                profile.target_fps(),
                profile.shading()
            );
        }
        self.profile = profile;
    }
}

fn check_speed(speed: f64) -> Result<f64, Error> {
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(Error::InvalidSpeed(speed))
    }
}

#[cfg(all(test, feature = "rhai"))]
mod test {
    use super::*;
    use crate::{render::RenderError, sample::SampleBuffer};

    #[derive(Default)]
    struct Keep(Vec<SampleBuffer>);
    impl RenderSink for Keep {
        fn display(
            &mut self,
            buffer: SampleBuffer,
            _style: &Style,
        ) -> Result<(), RenderError> {
            self.0.push(buffer);
            Ok(())
        }
    }

    #[test]
    fn no_function() {
        let s = Session::new(SessionConfig::default()).unwrap();
        assert!(matches!(s.sample(), Err(Error::NoFunction)));
        assert!(s.equation().is_none());
    }

    #[test]
    fn update_renders() {
        let mut s = Session::new(SessionConfig {
            quality: QualityMode::Low,
            ..SessionConfig::default()
        })
        .unwrap();
        let mut sink = Keep::default();
        let info = s.update("x^2 + y^2 + z^2 - 4 = 0", &mut sink).unwrap();
        assert_eq!(info.resolution, 15);
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].len(), 15 * 15 * 15);
        assert_eq!(s.equation(), Some("x^2 + y^2 + z^2 - 4 = 0"));
    }

    #[test]
    fn bad_update_keeps_surface() {
        let mut s = Session::new(SessionConfig::default()).unwrap();
        let mut sink = Keep::default();
        s.update("z - x", &mut sink).unwrap();
        let err = s.update("sin(x +", &mut sink).unwrap_err();
        assert!(matches!(err, Error::Compile { .. }), "{err}");
        assert_eq!(s.equation(), Some("z - x"));
        assert_eq!(sink.0.len(), 1);
    }

    #[test]
    fn domain_error_is_atomic() {
        let mut s = Session::new(SessionConfig {
            bounds: BoundingBox::new([0.0, 1.0], [-1.0, 1.0], [-1.0, 1.0])
                .unwrap(),
            ..SessionConfig::default()
        })
        .unwrap();
        let mut sink = Keep::default();
        s.update("sqrt(x) - z", &mut sink).unwrap();

        s.set_bounds(BoundingBox::cube(1.0).unwrap());
        let err = s.render(&mut sink).unwrap_err();
        assert!(matches!(err, Error::Evaluation(..)), "{err}");
        assert_eq!(sink.0.len(), 1);
    }

    #[test]
    fn quality_follows_device() {
        let mut s = Session::new(SessionConfig {
            quality: QualityMode::Auto,
            device: DeviceClass::Desktop,
            ..SessionConfig::default()
        })
        .unwrap();
        assert_eq!(s.profile().resolution(), 30);
        assert!(s.style().show_scale);

        s.set_device_class(DeviceClass::Mobile);
        assert_eq!(s.profile().resolution(), 15);
        assert!(!s.style().show_scale);

        s.set_quality(QualityMode::High);
        assert_eq!(s.profile().resolution(), 50);
    }

    #[test]
    fn presets_load() {
        let mut s = Session::new(SessionConfig::default()).unwrap();
        s.load_preset(Preset::Torus).unwrap();
        assert_eq!(s.bounds(), &Preset::Torus.bounds());
        assert_eq!(s.equation(), Some(Preset::Torus.equation()));
    }

    #[test]
    fn time_controls() {
        let mut s = Session::new(SessionConfig::default()).unwrap();
        s.set_speed(1.0).unwrap();
        assert_eq!(s.advance_time(), 1.0);
        s.set_t(100.0);
        assert_eq!(s.t(), 6.28);
        assert_eq!(s.advance_time(), 0.0);
        assert!(s.set_time_range(2.0, 1.0).is_err());
    }

    #[test]
    fn bad_speed_is_rejected() {
        let mut s = Session::new(SessionConfig::default()).unwrap();
        for speed in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                s.set_speed(speed),
                Err(Error::InvalidSpeed(..))
            ));
        }
        assert_eq!(s.speed(), 0.05);
        for _ in 0..200 {
            let t = s.advance_time();
            assert!((0.0..=6.28).contains(&t), "t = {t}");
        }

        let err = Session::new(SessionConfig {
            speed: -1.0,
            ..SessionConfig::default()
        });
        assert!(matches!(err, Err(Error::InvalidSpeed(..))));
    }
}
