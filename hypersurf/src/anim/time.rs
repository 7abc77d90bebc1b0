use crate::Error;
use serde::{Deserialize, Serialize};

/// Range of animation time, with the current time value
///
/// The current time stays within `[tmin, tmax]`; [`advance`](Self::advance)
/// wraps back to `tmin` once it passes `tmax`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange", into = "RawTimeRange")]
pub struct TimeRange {
    tmin: f64,
    tmax: f64,
    t: f64,
}

impl Default for TimeRange {
    /// One period of the built-in presets, `[0, 6.28]`, starting at 0
    fn default() -> Self {
        Self {
            tmin: 0.0,
            tmax: 6.28,
            t: 0.0,
        }
    }
}

impl TimeRange {
    /// Builds a new range, with the current time at `tmin`
    pub fn new(tmin: f64, tmax: f64) -> Result<Self, Error> {
        if tmin.is_finite() && tmax.is_finite() && tmin < tmax {
            Ok(Self {
                tmin,
                tmax,
                t: tmin,
            })
        } else {
            Err(Error::InvalidTimeRange(tmin, tmax))
        }
    }

    /// Lower end of the range
    pub fn tmin(&self) -> f64 {
        self.tmin
    }

    /// Upper end of the range
    pub fn tmax(&self) -> f64 {
        self.tmax
    }

    /// Current time value
    pub fn t(&self) -> f64 {
        self.t
    }

    /// Sets the current time, clamping it into the range
    pub fn set(&mut self, t: f64) {
        self.t = if t.is_nan() {
            self.tmin
        } else {
            t.clamp(self.tmin, self.tmax)
        };
    }

    /// Changes the range, keeping the current time if it still fits
    pub fn set_range(&mut self, tmin: f64, tmax: f64) -> Result<(), Error> {
        let t = self.t;
        *self = Self::new(tmin, tmax)?;
        self.set(t);
        Ok(())
    }

    /// Steps the current time forward by `speed` and returns the new value
    ///
    /// Stepping past `tmax` lands exactly on `tmin`, as does any step that
    /// would leave the range some other way (a negative or `NaN` speed).
    pub fn advance(&mut self, speed: f64) -> f64 {
        let t = self.t + speed;
        self.t = if (self.tmin..=self.tmax).contains(&t) {
            t
        } else {
            self.tmin
        };
        self.t
    }
}

#[derive(Serialize, Deserialize)]
struct RawTimeRange {
    tmin: f64,
    tmax: f64,
    t: f64,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = Error;
    fn try_from(r: RawTimeRange) -> Result<Self, Error> {
        let mut out = TimeRange::new(r.tmin, r.tmax)?;
        out.set(r.t);
        Ok(out)
    }
}

impl From<TimeRange> for RawTimeRange {
    fn from(r: TimeRange) -> Self {
        RawTimeRange {
            tmin: r.tmin,
            tmax: r.tmax,
            t: r.t,
        }
    }
}
