use head_count::cameras::{detection_classes, load_cameras, save_cameras, Camera};
use tempfile::tempdir;

fn roster() -> Vec<Camera> {
    vec![
        Camera {
            id: 1,
            name: "Barn east".into(),
            stream_url: Some("http://10.0.0.5/mjpg/video.mjpg".into()),
            rtsp_url: None,
            detection_class: "cattle".into(),
            location: Some("east gate".into()),
            is_active: true,
        },
        Camera {
            id: 2,
            name: "Pen south".into(),
            stream_url: None,
            rtsp_url: Some("rtsp://10.0.0.6:554/stream".into()),
            detection_class: "sheep".into(),
            location: None,
            is_active: true,
        },
        Camera {
            id: 3,
            name: "Old loading dock".into(),
            stream_url: None,
            rtsp_url: None,
            detection_class: "cattle".into(),
            location: None,
            is_active: false,
        },
    ]
}

#[test]
fn roster_roundtrip() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("cameras.json");
    let path = path.to_str().unwrap();

    save_cameras(path, &roster()).expect("save roster");
    let loaded = load_cameras(path).expect("load roster");

    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded[0].name, "Barn east");
    assert_eq!(loaded[1].rtsp_url.as_deref(), Some("rtsp://10.0.0.6:554/stream"));
    assert!(!loaded[2].is_active);
}

#[test]
fn missing_roster_file_means_empty_roster() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("does_not_exist.json");
    let loaded = load_cameras(path.to_str().unwrap()).expect("load");
    assert!(loaded.is_empty());
}

#[test]
fn minimal_entry_gets_defaults() {
    let loaded: Vec<Camera> =
        serde_json::from_str(r#"[{"id": 9, "name": "Gate cam"}]"#).expect("parse");
    assert!(loaded[0].is_active);
    assert!(loaded[0].detection_class.is_empty());
    assert!(loaded[0].stream_url.is_none());
}

#[test]
fn filter_hides_inactive_and_other_classes() {
    let cams = roster();

    assert!(cams[0].matches_filter(""));
    assert!(cams[0].matches_filter("cattle"));
    assert!(!cams[0].matches_filter("sheep"));
    assert!(cams[1].matches_filter("sheep"));
    // Inactive cameras never match, even with no filter.
    assert!(!cams[2].matches_filter(""));
    assert!(!cams[2].matches_filter("cattle"));
}

#[test]
fn detection_classes_are_sorted_and_distinct() {
    let classes = detection_classes(&roster());
    assert_eq!(classes, vec!["cattle".to_string(), "sheep".to_string()]);
}
