//! Per-session state: one `CountingSession` is constructed when the operator
//! picks a camera and torn down on stop, so nothing about a count outlives
//! it.

use std::time::{Duration, Instant};

use crate::api::StatusSnapshot;
use crate::cameras::Camera;
use crate::contain::FrameMeta;
use crate::feed::EventFeed;
use crate::line_sync::{LineSink, LineSyncController};
use crate::settings::Settings;

/// Interval gate for the polling loop: `due` answers at most once per
/// period.
pub struct PollCadence {
    every: Duration,
    last: Option<Instant>,
}

impl PollCadence {
    pub fn new(every: Duration) -> Self {
        Self { every, last: None }
    }

    pub fn due(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.every => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

pub struct CountingSession<S: LineSink> {
    pub camera: Camera,
    pub frame: FrameMeta,
    pub line: LineSyncController<S>,
    pub feed: EventFeed,
    pub status: StatusSnapshot,
    pub cadence: PollCadence,
}

impl<S: LineSink> CountingSession<S> {
    pub fn new(camera: Camera, sink: S, settings: &Settings) -> Self {
        Self {
            camera,
            frame: settings.fallback_meta(),
            line: LineSyncController::new(sink, settings.line_min_interval()),
            feed: EventFeed::new(settings.event_log_limit),
            status: StatusSnapshot::default(),
            cadence: PollCadence::new(settings.poll_interval()),
        }
    }

    /// Adopt the backend-reported frame size; `None` keeps the fallback.
    pub fn apply_meta(&mut self, meta: Option<FrameMeta>) {
        if let Some(meta) = meta {
            if !meta.is_degenerate() {
                self.frame = meta;
            }
        }
    }

    /// The paused/running flags shown in the UI follow the polled backend
    /// state, not the last button press.
    pub fn apply_status(&mut self, status: StatusSnapshot) {
        self.status = status;
    }
}
