//! Frame-paced animation of a [`Session`]
//!
//! An [`Animator`] is driven by the host's frame clock: the host calls
//! [`Animator::on_frame`] whenever a frame it requested comes due, passing the
//! current timestamp.  Frames that arrive sooner than the session's quality
//! profile allows are skipped; otherwise, the session's time is advanced and
//! one sample-and-display cycle runs.
//!
//! Timestamps are in milliseconds, from an arbitrary origin.
use crate::{Error, Session, render::FrameInfo, render::RenderSink};
use log::{debug, info, warn};
use std::{cell::Cell, rc::Rc};

mod time;
pub use time::TimeRange;

/// Opaque identifier for a pending frame request
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// Host clock that delivers frames on request
///
/// After [`request_frame`](Self::request_frame), the host is expected to call
/// [`Animator::on_frame`] once, unless the request is cancelled first.
pub trait FrameSource {
    /// Asks for a single future frame
    fn request_frame(&mut self) -> FrameRequest;

    /// Withdraws a pending request
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Handle that can stop an [`Animator`] from outside
///
/// Stopping through a handle takes effect before the next frame request: an
/// in-flight cycle completes, but no further frame is asked for.
#[derive(Clone, Debug)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    /// Stops the animation
    pub fn stop(&self) {
        self.0.set(false);
    }

    /// Checks whether the animation is still running
    pub fn is_running(&self) -> bool {
        self.0.get()
    }
}

/// Outcome of a call to [`Animator::on_frame`]
#[derive(Debug)]
pub enum Tick {
    /// The animator isn't running, so nothing happened
    Idle,
    /// Too little time has passed since the last rendered frame
    Skipped,
    /// A frame was sampled and displayed
    Rendered(FrameInfo),
    /// The cycle failed; the animation keeps going
    Failed(Error),
}

/// Animation scheduler, either idle or running
pub struct Animator<S> {
    source: S,
    running: Rc<Cell<bool>>,
    last: f64,
    pending: Option<FrameRequest>,
}

impl<S: FrameSource> Animator<S> {
    /// Builds an idle animator around a frame source
    pub fn new(source: S) -> Self {
        Self {
            source,
            running: Rc::new(Cell::new(false)),
            last: 0.0,
            pending: None,
        }
    }

    /// Returns a handle which can stop this animator
    pub fn handle(&self) -> StopHandle {
        StopHandle(self.running.clone())
    }

    /// Checks whether the animator is running
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Borrows the frame source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutably borrows the frame source
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Starts animating, with `now` as the last tick time
    ///
    /// This is a no-op if the animator is already running.
    pub fn start(&mut self, now: f64) {
        if self.running.get() {
            return;
        }
        info!("starting animation");
        // A stop through a `StopHandle` leaves its request pending
        self.cancel_pending();
        self.running.set(true);
        self.last = now;
        self.request();
    }

    /// Stops animating and cancels any pending frame
    ///
    /// A frame still pending after a stop through a [`StopHandle`] is
    /// cancelled here, even though the animator is already idle.
    pub fn stop(&mut self) {
        if self.running.get() {
            info!("stopping animation");
            self.running.set(false);
        }
        self.cancel_pending();
    }

    /// Handles a frame delivered by the frame source
    pub fn on_frame<R: RenderSink + ?Sized>(
        &mut self,
        now: f64,
        session: &mut Session,
        sink: &mut R,
    ) -> Tick {
        self.pending = None;
        if !self.running.get() {
            return Tick::Idle;
        }

        let interval = session.profile().frame_interval_ms();
        let elapsed = now - self.last;
        if elapsed < interval {
            self.request();
            return Tick::Skipped;
        }
        self.last = now - elapsed % interval;

        let t = session.advance_time();
        let tick = match session.render(sink) {
            Ok(info) => {
                debug!("frame at t = {t:.2}: {info}");
                Tick::Rendered(info)
            }
            Err(e) => {
                warn!("frame at t = {t:.2} failed: {e}");
                Tick::Failed(e)
            }
        };

        if self.running.get() {
            self.request();
        } else {
            info!("animation stopped during frame");
        }
        tick
    }

    fn request(&mut self) {
        self.pending = Some(self.source.request_frame());
    }

    fn cancel_pending(&mut self) {
        if let Some(r) = self.pending.take() {
            self.source.cancel_frame(r);
        }
    }
}
