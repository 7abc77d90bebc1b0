use std::num::NonZeroUsize;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{info, warn};
use strum::IntoEnumIterator;

use hypersurf::{
    Session,
    anim::{Animator, FrameRequest, FrameSource, Tick},
    presets::Preset,
    quality::{DeviceClass, QualityMode},
    render::{RenderError, RenderSink, Style},
    sample::{BoundingBox, SampleBuffer, SampleConfig},
    session::SessionConfig,
};

/// Headless driver for sampling time-varying implicit surfaces
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Samples the surface once, at a single time value
    Sample {
        #[clap(flatten)]
        settings: SurfaceSettings,

        /// Time value
        #[clap(short, long, default_value_t = 0.0)]
        t: f64,
    },

    /// Animates the surface against a synthetic display clock
    Animate {
        #[clap(flatten)]
        settings: SurfaceSettings,

        /// Number of display refreshes to simulate
        #[clap(short = 'N', long, default_value_t = 240)]
        frames: usize,

        /// Display refresh rate, in Hz
        #[clap(long, default_value_t = 60.0)]
        hz: f64,

        /// Time step per rendered frame
        #[clap(long, default_value_t = 0.05)]
        speed: f64,

        /// Time range, as `tmin,tmax`
        #[clap(long, value_delimiter = ',', num_args = 2)]
        time: Option<Vec<f64>>,
    },

    /// Lists the built-in presets
    Presets,
}

#[derive(Parser)]
struct SurfaceSettings {
    /// Equation, e.g. `x^2 + y^2 + z^2 - 4 = 0`
    #[clap(short, long, conflicts_with = "preset")]
    equation: Option<String>,

    /// Built-in preset to load
    #[clap(short, long)]
    preset: Option<Preset>,

    /// Sampling region, as `xmin,xmax,ymin,ymax,zmin,zmax`
    #[clap(short, long, value_delimiter = ',', num_args = 6)]
    bounds: Option<Vec<f64>>,

    /// Quality level (`auto`, `low`, `medium`, or `high`)
    #[clap(short, long, default_value = "auto")]
    quality: String,

    /// Device class (`mobile` or `desktop`)
    #[clap(short, long, default_value = "desktop")]
    device: String,

    /// Number of sampling threads
    #[clap(long)]
    threads: Option<NonZeroUsize>,
}

impl SurfaceSettings {
    fn session(&self) -> Result<Session> {
        let quality = QualityMode::parse_or_default(&self.quality);
        if quality.to_string() != self.quality.trim().to_lowercase() {
            warn!("unknown quality `{}`, using {quality}", self.quality);
        }
        let config = SessionConfig {
            quality,
            device: DeviceClass::parse_or_default(&self.device),
            sample: SampleConfig {
                threads: self.threads.map(Into::into).unwrap_or_default(),
            },
            ..SessionConfig::default()
        };
        let mut session = Session::new(config)?;

        match (&self.equation, self.preset) {
            (Some(eq), _) => session.set_equation(eq)?,
            (None, Some(p)) => session.load_preset(p)?,
            (None, None) => bail!("must provide either --equation or --preset"),
        }
        if let Some(b) = &self.bounds {
            session.set_bounds(BoundingBox::new(
                [b[0], b[1]],
                [b[2], b[3]],
                [b[4], b[5]],
            )?);
        }
        let p = session.profile();
        info!(
            "{quality} quality on {}: {}³ grid at {} FPS ({} shading)",
            session.device_class(),
            p.resolution(),
            p.target_fps(),
            p.shading()
        );
        Ok(session)
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Sink which logs a summary of each frame
#[derive(Default)]
struct LogSink {
    frames: usize,
}

impl RenderSink for LogSink {
    fn display(
        &mut self,
        buffer: SampleBuffer,
        style: &Style,
    ) -> Result<(), RenderError> {
        let (lo, hi) = buffer
            .value_range()
            .ok_or_else(|| RenderError::new("empty buffer"))?;
        let band = buffer
            .values()
            .iter()
            .filter(|v| (style.isomin..=style.isomax).contains(*v))
            .count();
        self.frames += 1;
        info!(
            "frame {}: values in [{lo:.3}, {hi:.3}], {band} samples on the surface",
            self.frames
        );
        Ok(())
    }
}

/// Display clock refreshing at a fixed rate
struct Vsync {
    now: f64,
    period: f64,
    next: u64,
    pending: Option<FrameRequest>,
}

impl Vsync {
    fn new(hz: f64) -> Self {
        Self {
            now: 0.0,
            period: 1000.0 / hz,
            next: 0,
            pending: None,
        }
    }

    /// Advances to the next refresh, if a frame was requested
    fn refresh(&mut self) -> Option<f64> {
        self.pending.take()?;
        self.now += self.period;
        Some(self.now)
    }
}

impl FrameSource for Vsync {
    fn request_frame(&mut self) -> FrameRequest {
        self.next += 1;
        let r = FrameRequest(self.next);
        self.pending = Some(r);
        r
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .init();

    let args = Args::parse();
    match args.cmd {
        Command::Presets => {
            for p in Preset::iter() {
                let b = p.bounds();
                let (lo, hi) = (b.lower(), b.upper());
                println!(
                    "{p:>8}: {}  in [{}, {}] x [{}, {}] x [{}, {}]",
                    p.equation(),
                    lo.x,
                    hi.x,
                    lo.y,
                    hi.y,
                    lo.z,
                    hi.z
                );
            }
        }
        Command::Sample { settings, t } => {
            let mut session = settings.session()?;
            session.set_time_range(t.min(0.0), t.max(0.0) + 1.0)?;
            session.set_t(t);
            let sampled = session.sample()?;
            info!("{sampled}");
            LogSink::default().display(sampled.buffer, &session.style())?;
        }
        Command::Animate {
            settings,
            frames,
            hz,
            speed,
            time,
        } => {
            if !(hz.is_finite() && hz > 0.0) {
                bail!("refresh rate must be positive");
            }
            let mut session = settings.session()?;
            session.set_speed(speed)?;
            if let Some(t) = time {
                session.set_time_range(t[0], t[1])?;
            }

            let mut sink = LogSink::default();
            let mut animator = Animator::new(Vsync::new(hz));
            animator.start(0.0);
            let mut skipped = 0;
            for _ in 0..frames {
                let Some(now) = animator.source_mut().refresh() else {
                    break;
                };
                match animator.on_frame(now, &mut session, &mut sink) {
                    Tick::Rendered(info) => {
                        info!("t = {:.2}: {info}", info.t)
                    }
                    Tick::Skipped => skipped += 1,
                    Tick::Failed(e) => warn!("frame failed: {e}"),
                    Tick::Idle => break,
                }
            }
            animator.stop();
            info!(
                "rendered {} frames, skipped {skipped} refreshes",
                sink.frames
            );
        }
    }
    Ok(())
}
