//! Camera roster loaded from `cameras.json` next to the binary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Camera {
    pub id: u64,
    pub name: String,
    /// HTTP/MJPEG stream URL, when the camera exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtsp_url: Option<String>,
    /// Animal class the camera's model is configured for, e.g. "cattle".
    #[serde(default)]
    pub detection_class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Camera {
    /// Whether the camera should appear under the given class filter. An
    /// empty filter shows every active camera.
    pub fn matches_filter(&self, filter: &str) -> bool {
        self.is_active && (filter.is_empty() || self.detection_class == filter)
    }
}

pub fn load_cameras(path: &str) -> anyhow::Result<Vec<Camera>> {
    let content = std::fs::read_to_string(path).unwrap_or_default();
    if content.is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&content)?)
}

pub fn save_cameras(path: &str, cameras: &[Camera]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(cameras)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Distinct detection classes across the roster, sorted, for the filter
/// dropdown.
pub fn detection_classes(cameras: &[Camera]) -> Vec<String> {
    let mut classes: Vec<String> = cameras
        .iter()
        .filter(|c| !c.detection_class.is_empty())
        .map(|c| c.detection_class.clone())
        .collect();
    classes.sort();
    classes.dedup();
    classes
}
