//! Fixed-timestep driver, invoked once per display refresh.

use crate::config::MAX_FRAME_MS;
use crate::session::Session;

/// What the loop drives each frame.
pub trait Frame {
    fn session(&mut self) -> &mut Session;
    fn update(&mut self);
    fn poll_paused(&mut self);
    fn render(&mut self, t: f64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub updates: u32,
    pub rendered: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MainLoop {
    last_time: Option<f64>,
}

impl MainLoop {
    pub fn new() -> Self { Self::default() }

    /// The first call only records `t`. Later calls accrue the (clamped)
    /// elapsed time, run one update per whole tick, then render exactly once.
    pub fn frame<F: Frame + ?Sized>(&mut self, t: f64, target: &mut F) -> FrameReport {
        let Some(last) = self.last_time.replace(t) else {
            return FrameReport::default();
        };

        let frame_ms = t - last;
        let session = target.session();
        session.accumulated_ms += frame_ms.clamp(0.0, MAX_FRAME_MS);
        session.record_frame_rate(frame_ms);

        if session.paused {
            target.poll_paused();
        }

        let mut updates = 0;
        loop {
            let session = target.session();
            if session.paused || session.accumulated_ms < session.tick_ms {
                break;
            }
            session.accumulated_ms -= session.tick_ms;
            target.update();
            updates += 1;
        }

        // paused time is dropped rather than replayed on resume
        let session = target.session();
        if session.paused {
            session.accumulated_ms %= session.tick_ms;
        }

        target.render(t);
        FrameReport { updates, rendered: true }
    }
}
