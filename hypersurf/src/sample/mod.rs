//! Dense grid sampling of scalar fields
//!
//! The easiest way to sample something is with [`sample`], which runs in the
//! calling thread; a [`Sampler`] can also spread the work across a thread pool.
//!
//! ```
//! use hypersurf::{rhai, sample::{sample, BoundingBox}};
//!
//! let f = rhai::compile("x^2 + y^2 + z^2 - 4")?;
//! let bounds = BoundingBox::cube(4.0)?;
//! let out = sample(&f, &bounds, 5, 0.0)?;
//! assert_eq!(out.buffer.len(), 125);
//! assert_eq!(out.buffer.get(0, 0, 0), Some([-4.0, -4.0, -4.0, 44.0]));
//! assert_eq!(out.buffer.get(2, 2, 2), Some([0.0, 0.0, 0.0, -4.0]));
//! # Ok::<(), hypersurf::Error>(())
//! ```
use crate::{
    Error,
    eval::{EvalError, ScalarFunction},
};
use log::debug;
use nalgebra::Vector3;
use rayon::prelude::*;
use std::time::Duration;
use web_time::Instant;

mod bounds;
mod buffer;
mod config;

pub use bounds::BoundingBox;
pub use buffer::SampleBuffer;
pub use config::{SampleConfig, ThreadCount};

/// Output of a sampling call
#[derive(Clone, Debug)]
pub struct Sampled {
    /// Grid of samples
    pub buffer: SampleBuffer,
    /// Wall-clock time spent sampling
    pub elapsed: Duration,
}

/// Diagnostic line, e.g. `12ms | 30³ points`
impl std::fmt::Display for Sampled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}ms | {}³ points",
            self.elapsed.as_millis(),
            self.buffer.resolution()
        )
    }
}

/// Samples `f` at time `t` on a grid with `resolution` samples per axis
///
/// This is a shortcut for [`Sampler::sample`] with a single-threaded sampler.
pub fn sample<F: ScalarFunction + ?Sized>(
    f: &F,
    bounds: &BoundingBox,
    resolution: usize,
    t: f64,
) -> Result<Sampled, Error> {
    Sampler::default().sample(f, bounds, resolution, t)
}

/// Grid sampler, owning its worker pool (if any)
#[derive(Default)]
pub struct Sampler {
    config: SampleConfig,
    pool: Option<rayon::ThreadPool>,
}

impl Sampler {
    /// Builds a sampler, spawning worker threads if the config asks for them
    pub fn new(config: SampleConfig) -> Result<Self, Error> {
        let pool = match config.threads.get() {
            None => None,
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("hypersurf-sample-{i}"))
                    .build()?,
            ),
        };
        Ok(Self { config, pool })
    }

    /// Returns the configuration used to build this sampler
    pub fn config(&self) -> &SampleConfig {
        &self.config
    }

    /// Samples `f` at time `t` on a grid with `resolution` samples per axis
    ///
    /// Samples are enumerated with x as the outer loop and z as the inner
    /// loop (see [`SampleBuffer`] for the layout).  If evaluation fails at any
    /// point, the whole call fails and no buffer is returned.
    pub fn sample<F: ScalarFunction + ?Sized>(
        &self,
        f: &F,
        bounds: &BoundingBox,
        resolution: usize,
        t: f64,
    ) -> Result<Sampled, Error> {
        let start = Instant::now();
        let n = resolution;
        let total = n
            .checked_pow(3)
            .filter(|_| n >= 2)
            .ok_or(Error::InvalidResolution(n))?;

        let grid = Grid {
            lower: bounds.lower(),
            step: bounds.step(n),
            n,
            t,
        };
        let mut xs = vec![0.0; total];
        let mut ys = vec![0.0; total];
        let mut zs = vec![0.0; total];
        let mut values = vec![0.0; total];

        let slab = n * n;
        match &self.pool {
            None => {
                let slabs = xs
                    .chunks_mut(slab)
                    .zip(ys.chunks_mut(slab))
                    .zip(zs.chunks_mut(slab))
                    .zip(values.chunks_mut(slab));
                for (i, (((xs, ys), zs), vs)) in slabs.enumerate() {
                    grid.fill_slab(f, i, xs, ys, zs, vs)?;
                }
            }
            Some(pool) => pool.install(|| {
                xs.par_chunks_mut(slab)
                    .zip(ys.par_chunks_mut(slab))
                    .zip(zs.par_chunks_mut(slab))
                    .zip(values.par_chunks_mut(slab))
                    .enumerate()
                    .try_for_each(|(i, (((xs, ys), zs), vs))| {
                        grid.fill_slab(f, i, xs, ys, zs, vs)
                    })
            })?,
        }

        let buffer = SampleBuffer::from_channels(n, xs, ys, zs, values);
        let elapsed = start.elapsed();
        debug!(
            "sampled {n}³ grid at t = {t} in {elapsed:?} ({})",
            self.config.threads
        );
        Ok(Sampled { buffer, elapsed })
    }
}

/// Grid geometry shared by every slab of a sampling call
#[derive(Copy, Clone)]
struct Grid {
    lower: Vector3<f64>,
    step: Vector3<f64>,
    n: usize,
    t: f64,
}

impl Grid {
    /// Fills the coordinates and values of the `i`'th x-slab
    ///
    /// Each slab holds `n * n` samples with constant x, y-major.
    fn fill_slab<F: ScalarFunction + ?Sized>(
        &self,
        f: &F,
        i: usize,
        xs: &mut [f64],
        ys: &mut [f64],
        zs: &mut [f64],
        values: &mut [f64],
    ) -> Result<(), EvalError> {
        let n = self.n;
        xs.fill(self.lower.x + i as f64 * self.step.x);
        for (j, (ys, zs)) in
            ys.chunks_mut(n).zip(zs.chunks_mut(n)).enumerate()
        {
            ys.fill(self.lower.y + j as f64 * self.step.y);
            for (k, z) in zs.iter_mut().enumerate() {
                *z = self.lower.z + k as f64 * self.step.z;
            }
        }
        f.eval_slice(xs, ys, zs, self.t, values)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::num::NonZeroUsize;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sum(x: f64, y: f64, z: f64, t: f64) -> Result<f64, EvalError> {
        Ok(x + 10.0 * y + 100.0 * z + 1000.0 * t)
    }

    fn check_layout(buffer: &SampleBuffer, bounds: &BoundingBox, t: f64) {
        let n = buffer.resolution();
        let lower = bounds.lower();
        let step = bounds.step(n);
        assert_eq!(buffer.len(), n * n * n);
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    let p = i * n * n + j * n + k;
                    let x = lower.x + i as f64 * step.x;
                    let y = lower.y + j as f64 * step.y;
                    let z = lower.z + k as f64 * step.z;
                    assert_eq!(buffer.xs()[p], x);
                    assert_eq!(buffer.ys()[p], y);
                    assert_eq!(buffer.zs()[p], z);
                    assert_eq!(buffer.values()[p], sum(x, y, z, t).unwrap());
                }
            }
        }
        assert_eq!(buffer.intensity(), buffer.zs());
    }

    #[test]
    fn layout_is_x_major() {
        let bounds =
            BoundingBox::new([-1.0, 1.0], [0.0, 3.0], [2.0, 2.5]).unwrap();
        for n in [2, 3, 7] {
            let out = sample(&sum, &bounds, n, 0.25).unwrap();
            check_layout(&out.buffer, &bounds, 0.25);
        }
    }

    #[test]
    fn layout_is_x_major_multithreaded() {
        let cfg = SampleConfig {
            threads: NonZeroUsize::new(4).unwrap().into(),
        };
        let sampler = Sampler::new(cfg).unwrap();
        let bounds = BoundingBox::cube(2.0).unwrap();
        let out = sampler.sample(&sum, &bounds, 9, 1.0).unwrap();
        check_layout(&out.buffer, &bounds, 1.0);

        let single = sample(&sum, &bounds, 9, 1.0).unwrap();
        assert_eq!(single.buffer, out.buffer);
    }

    #[test]
    fn endpoints_are_exact() {
        let bounds =
            BoundingBox::new([-4.0, 4.0], [-4.0, 4.0], [-4.0, 4.0]).unwrap();
        let out = sample(&sum, &bounds, 5, 0.0).unwrap();
        assert_eq!(out.buffer.get(0, 0, 0).unwrap()[..3], [-4.0, -4.0, -4.0]);
        assert_eq!(out.buffer.get(4, 4, 4).unwrap()[..3], [4.0, 4.0, 4.0]);
        assert_eq!(out.buffer.get(2, 2, 2).unwrap()[..3], [0.0, 0.0, 0.0]);
        assert_eq!(out.buffer.get(5, 0, 0), None);
    }

    #[test]
    fn bad_resolution() {
        let bounds = BoundingBox::default();
        for n in [0, 1] {
            assert!(matches!(
                sample(&sum, &bounds, n, 0.0),
                Err(Error::InvalidResolution(m)) if m == n
            ));
        }
    }

    #[test]
    fn failure_is_atomic() {
        let calls = AtomicUsize::new(0);
        let f = |x: f64, y: f64, z: f64, t: f64| {
            calls.fetch_add(1, Ordering::Relaxed);
            if x > 0.5 {
                Err(EvalError::at("too far", [x, y, z, t]))
            } else {
                Ok(x)
            }
        };
        let bounds = BoundingBox::cube(1.0).unwrap();
        let err = sample(&f, &bounds, 5, 0.0).unwrap_err();
        match err {
            Error::Evaluation(e) => assert_eq!(e.point().unwrap()[0], 1.0),
            e => panic!("unexpected error {e}"),
        }
        // Four good slabs, then a failure on the first point of the last one
        assert_eq!(calls.load(Ordering::Relaxed), 4 * 5 * 5 + 1);
    }

    #[test]
    fn diagnostic_line() {
        let bounds = BoundingBox::default();
        let mut out = sample(&sum, &bounds, 3, 0.0).unwrap();
        out.elapsed = Duration::from_millis(12);
        assert_eq!(out.to_string(), "12ms | 3³ points");
    }
}
