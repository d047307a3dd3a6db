//! Counting-line position ownership and rate-limited delivery to the
//! backend. The overlay always follows the local value immediately; network
//! sends are capped at one per minimum interval, with a trailing send that
//! carries the latest value so the final position of a drag is never lost.

use std::time::{Duration, Instant};

/// Minimum spacing between two line updates on the wire.
pub const DEFAULT_MIN_SEND_INTERVAL: Duration = Duration::from_millis(100);

/// Delivery seam for line updates. Implementations must not block the
/// caller; failures are the implementation's to report.
pub trait LineSink {
    fn send(&self, y_norm: f32);
}

#[derive(Debug, Default, Clone, Copy)]
struct SyncSchedule {
    last_sent_at: Option<Instant>,
    pending: Option<Instant>,
}

/// Single-writer controller for the normalized line position.
///
/// Every method that touches the schedule takes `now` explicitly, so tests
/// drive fabricated instants and no wall-clock waits are needed.
pub struct LineSyncController<S: LineSink> {
    sink: S,
    y_norm: f32,
    min_interval: Duration,
    schedule: SyncSchedule,
    dragging: bool,
}

impl<S: LineSink> LineSyncController<S> {
    pub fn new(sink: S, min_interval: Duration) -> Self {
        Self {
            sink,
            y_norm: 0.5,
            min_interval,
            schedule: SyncSchedule::default(),
            dragging: false,
        }
    }

    pub fn position(&self) -> f32 {
        self.y_norm
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn has_pending_send(&self) -> bool {
        self.schedule.pending.is_some()
    }

    /// Update the local position. The overlay is painted from `position()`
    /// every frame, so the visual follows without touching the network.
    pub fn set_position(&mut self, y_norm: f32) {
        if !y_norm.is_finite() {
            return;
        }
        self.y_norm = y_norm.clamp(0.0, 1.0);
    }

    /// Forward the current position under the rate limit: send immediately
    /// when outside the minimum interval, otherwise arm (or re-arm) the
    /// trailing send. A pending send is replaced, never queued alongside.
    pub fn schedule_sync(&mut self, now: Instant) {
        match self.schedule.last_sent_at {
            Some(last) if now.duration_since(last) < self.min_interval => {
                self.schedule.pending = Some(last + self.min_interval);
            }
            _ => self.send_now(now),
        }
    }

    /// Fire a due trailing send. Called once per event-loop turn; the value
    /// sent is whatever the position is at fire time.
    pub fn tick(&mut self, now: Instant) {
        if let Some(due) = self.schedule.pending {
            if now >= due {
                self.send_now(now);
            }
        }
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    pub fn continue_drag(&mut self, y_norm: f32, now: Instant) {
        if !self.dragging {
            return;
        }
        self.set_position(y_norm);
        self.schedule_sync(now);
    }

    /// End the drag and make sure the released position reaches the wire,
    /// even when the release lands inside the rate-limit window.
    pub fn end_drag(&mut self, now: Instant) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.schedule_sync(now);
    }

    fn send_now(&mut self, now: Instant) {
        self.schedule.last_sent_at = Some(now);
        self.schedule.pending = None;
        self.sink.send(self.y_norm);
    }
}
