use head_count::line_sync::{LineSink, LineSyncController, DEFAULT_MIN_SEND_INTERVAL};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Clone, Default)]
struct RecordingSink {
    sent: Arc<Mutex<Vec<f32>>>,
}

impl RecordingSink {
    fn sent(&self) -> Vec<f32> {
        self.sent.lock().unwrap().clone()
    }
}

impl LineSink for RecordingSink {
    fn send(&self, y_norm: f32) {
        self.sent.lock().unwrap().push(y_norm);
    }
}

fn controller(sink: &RecordingSink) -> LineSyncController<RecordingSink> {
    LineSyncController::new(sink.clone(), DEFAULT_MIN_SEND_INTERVAL)
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn first_sync_sends_immediately() {
    let sink = RecordingSink::default();
    let mut line = controller(&sink);
    let t0 = Instant::now();

    line.set_position(0.3);
    line.schedule_sync(t0);

    assert_eq!(sink.sent(), vec![0.3]);
    assert!(!line.has_pending_send());
}

#[test]
fn spaced_syncs_all_send_immediately() {
    let sink = RecordingSink::default();
    let mut line = controller(&sink);
    let t0 = Instant::now();

    line.set_position(0.2);
    line.schedule_sync(t0);
    line.set_position(0.4);
    line.schedule_sync(t0 + ms(150));
    line.set_position(0.6);
    line.schedule_sync(t0 + ms(300));

    assert_eq!(sink.sent(), vec![0.2, 0.4, 0.6]);
}

#[test]
fn burst_coalesces_to_exactly_two_sends() {
    let sink = RecordingSink::default();
    let mut line = controller(&sink);
    let t0 = Instant::now();

    for i in 0..10u64 {
        line.set_position(0.1 + i as f32 * 0.05);
        line.schedule_sync(t0 + ms(i * 8));
    }
    assert_eq!(sink.sent().len(), 1, "only the first send goes out in-window");
    assert!(line.has_pending_send());

    // Not due yet.
    line.tick(t0 + ms(99));
    assert_eq!(sink.sent().len(), 1);

    // Due: the trailing send carries the latest value of the burst.
    line.tick(t0 + ms(100));
    let sent = sink.sent();
    assert_eq!(sent.len(), 2);
    assert!((sent[1] - 0.55).abs() < 1e-6);

    // Nothing left to fire.
    line.tick(t0 + ms(500));
    assert_eq!(sink.sent().len(), 2);
}

#[test]
fn trailing_send_wins_over_earlier_value() {
    let sink = RecordingSink::default();
    let mut line = controller(&sink);
    let t0 = Instant::now();

    line.set_position(0.3);
    line.schedule_sync(t0);
    line.set_position(0.7);
    line.schedule_sync(t0 + ms(40));

    line.tick(t0 + ms(100));
    assert_eq!(sink.sent(), vec![0.3, 0.7]);
}

#[test]
fn drag_burst_delivers_released_position() {
    let sink = RecordingSink::default();
    let mut line = controller(&sink);
    let t0 = Instant::now();

    line.begin_drag();
    // 50 move events within 80ms, walking down to 0.42.
    for i in 0..50u64 {
        let y = 0.9 - (0.48 / 49.0) * i as f32;
        line.continue_drag(y, t0 + ms(i * 80 / 49));
    }
    line.end_drag(t0 + ms(80));
    line.tick(t0 + ms(100));

    let sent = sink.sent();
    assert_eq!(sent.len(), 2, "immediate + trailing, regardless of burst size");
    assert!((sent[1] - 0.42).abs() < 1e-4);
    assert!(!line.is_dragging());
}

#[test]
fn release_outside_window_sends_at_once() {
    let sink = RecordingSink::default();
    let mut line = controller(&sink);
    let t0 = Instant::now();

    line.begin_drag();
    line.continue_drag(0.25, t0);
    line.end_drag(t0 + ms(200));

    assert_eq!(sink.sent(), vec![0.25, 0.25]);
    assert!(!line.has_pending_send());
}

#[test]
fn moves_without_begin_drag_are_ignored() {
    let sink = RecordingSink::default();
    let mut line = controller(&sink);
    let t0 = Instant::now();

    line.continue_drag(0.8, t0);
    line.end_drag(t0);

    assert!(sink.sent().is_empty());
    assert_eq!(line.position(), 0.5);
}

#[test]
fn position_is_clamped_and_rejects_non_finite() {
    let sink = RecordingSink::default();
    let mut line = controller(&sink);

    line.set_position(1.5);
    assert_eq!(line.position(), 1.0);
    line.set_position(-0.2);
    assert_eq!(line.position(), 0.0);
    line.set_position(f32::NAN);
    assert_eq!(line.position(), 0.0);
}

#[test]
fn sync_after_trailing_send_respects_new_window() {
    let sink = RecordingSink::default();
    let mut line = controller(&sink);
    let t0 = Instant::now();

    line.set_position(0.1);
    line.schedule_sync(t0);
    line.set_position(0.2);
    line.schedule_sync(t0 + ms(50));
    line.tick(t0 + ms(100));
    assert_eq!(sink.sent().len(), 2);

    // 50ms after the trailing send: still inside the fresh window.
    line.set_position(0.3);
    line.schedule_sync(t0 + ms(150));
    assert_eq!(sink.sent().len(), 2);
    line.tick(t0 + ms(200));
    assert_eq!(sink.sent(), vec![0.1, 0.2, 0.3]);
}
