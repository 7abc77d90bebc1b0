//! Drives a preset through a full animation period with a synthetic clock
use hypersurf::{
    Session,
    anim::{Animator, FrameRequest, FrameSource, Tick},
    presets::Preset,
    quality::{DeviceClass, QualityMode},
    render::{RenderError, RenderSink, Style},
    sample::SampleBuffer,
    session::SessionConfig,
};

/// Display clock ticking at a fixed rate
struct Vsync {
    now: f64,
    period: f64,
    pending: Option<FrameRequest>,
    next_id: u64,
}

impl Vsync {
    fn new(period: f64) -> Self {
        Self {
            now: 0.0,
            period,
            pending: None,
            next_id: 0,
        }
    }

    /// Advances to the next vsync, returning its timestamp if a frame was due
    fn wait(&mut self) -> Option<f64> {
        self.pending.take()?;
        self.now += self.period;
        Some(self.now)
    }
}

impl FrameSource for Vsync {
    fn request_frame(&mut self) -> FrameRequest {
        assert!(self.pending.is_none(), "overlapping frame requests");
        self.next_id += 1;
        let r = FrameRequest(self.next_id);
        self.pending = Some(r);
        r
    }
    fn cancel_frame(&mut self, request: FrameRequest) {
        assert_eq!(self.pending.take(), Some(request));
    }
}

#[derive(Default)]
struct Frames {
    count: usize,
    styles: Vec<Style>,
}

impl RenderSink for Frames {
    fn display(
        &mut self,
        buffer: SampleBuffer,
        style: &Style,
    ) -> Result<(), RenderError> {
        assert_eq!(buffer.len(), 15 * 15 * 15);
        self.count += 1;
        self.styles.push(style.clone());
        Ok(())
    }
}

#[test]
fn mobile_ripple_period() {
    let mut session = Session::new(SessionConfig {
        quality: QualityMode::Auto,
        device: DeviceClass::Mobile,
        speed: 0.1,
        ..SessionConfig::default()
    })
    .unwrap();
    session.load_preset(Preset::Ripple).unwrap();
    assert_eq!(session.profile().target_fps(), 30);

    // 120 Hz display, so three out of every four vsyncs are skipped
    let mut animator = Animator::new(Vsync::new(1000.0 / 120.0));
    let mut sink = Frames::default();
    animator.start(0.0);

    let mut ts = vec![];
    let mut skipped = 0;
    while let Some(now) = animator.source_mut().wait() {
        match animator.on_frame(now, &mut session, &mut sink) {
            Tick::Rendered(info) => {
                ts.push(info.t);
                // Stop once time wraps around
                if info.t == 0.0 {
                    animator.stop();
                }
            }
            Tick::Skipped => skipped += 1,
            t => panic!("unexpected tick {t:?}"),
        }
    }

    assert!(!animator.is_running());
    assert_eq!(ts.len(), sink.count);
    assert_eq!(ts.last(), Some(&0.0));
    assert!(ts.windows(2).take(ts.len() - 2).all(|w| w[1] > w[0]));
    assert!(skipped >= 2 * ts.len());
    assert!(sink.styles.iter().all(|s| !s.show_scale));
}
