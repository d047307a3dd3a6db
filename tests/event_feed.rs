use head_count::feed::{CountEvent, EventFeed, EventKind};

fn ev(id: u64, kind: EventKind) -> CountEvent {
    CountEvent { id, kind, ts: 1_700_000_000 + id as i64 }
}

#[test]
fn absorb_advances_cursor_to_max_id() {
    let mut feed = EventFeed::new(30);
    assert_eq!(feed.last_id(), 0);

    feed.absorb(vec![ev(1, EventKind::In), ev(3, EventKind::Out), ev(2, EventKind::In)]);
    assert_eq!(feed.last_id(), 3);
    assert_eq!(feed.len(), 3);
}

#[test]
fn newest_entry_is_shown_first() {
    let mut feed = EventFeed::new(30);
    feed.absorb(vec![ev(1, EventKind::In), ev(2, EventKind::Out)]);

    let ids: Vec<u64> = feed.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[test]
fn display_list_is_bounded() {
    let mut feed = EventFeed::new(5);
    feed.absorb((1..=20).map(|i| ev(i, EventKind::In)).collect());

    assert_eq!(feed.len(), 5);
    assert_eq!(feed.last_id(), 20);
    // The newest five survive.
    let ids: Vec<u64> = feed.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![20, 19, 18, 17, 16]);
}

#[test]
fn empty_batch_is_a_no_op() {
    let mut feed = EventFeed::new(30);
    feed.absorb(vec![ev(7, EventKind::Out)]);
    feed.absorb(Vec::new());

    assert_eq!(feed.last_id(), 7);
    assert_eq!(feed.len(), 1);
}

#[test]
fn kind_maps_to_count_delta() {
    assert_eq!(EventKind::In.delta(), 1);
    assert_eq!(EventKind::Out.delta(), -1);
}

#[test]
fn event_payload_deserializes_from_backend_json() {
    let payload = r#"[{"id": 12, "kind": "IN", "ts": 1723000000}, {"id": 13, "kind": "OUT", "ts": 1723000002}]"#;
    let events: Vec<CountEvent> = serde_json::from_str(payload).expect("parse events");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, EventKind::In);
    assert_eq!(events[1].kind, EventKind::Out);
}
