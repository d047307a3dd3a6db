use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::contain::FrameMeta;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// Base URL of the counting backend, including any mount prefix.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Interval in milliseconds between status/event polls.
    #[serde(default = "default_status_poll_ms")]
    pub status_poll_ms: u64,
    /// Minimum spacing in milliseconds between line updates on the wire.
    #[serde(default = "default_line_send_min_ms")]
    pub line_send_min_ms: u64,
    /// Maximum number of entries kept in the crossing-event log.
    #[serde(default = "default_event_log_limit")]
    pub event_log_limit: usize,
    /// Frame size assumed when the backend cannot report one.
    #[serde(default = "default_fallback_frame")]
    pub fallback_frame: (u32, u32),
    /// Enable toast notifications in the UI.
    #[serde(default = "default_toasts")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Last known window size. If absent, a default size is used.
    #[serde(default)]
    pub window_size: Option<(f32, f32)>,
}

fn default_backend_url() -> String {
    "http://127.0.0.1:8000/video-ao-vivo/".to_string()
}

fn default_status_poll_ms() -> u64 {
    700
}

fn default_line_send_min_ms() -> u64 {
    100
}

fn default_event_log_limit() -> usize {
    30
}

fn default_fallback_frame() -> (u32, u32) {
    (1920, 1080)
}

fn default_toasts() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    3.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            status_poll_ms: default_status_poll_ms(),
            line_send_min_ms: default_line_send_min_ms(),
            event_log_limit: default_event_log_limit(),
            fallback_frame: default_fallback_frame(),
            enable_toasts: default_toasts(),
            toast_duration: default_toast_duration(),
            debug_logging: false,
            window_size: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.status_poll_ms.max(1))
    }

    pub fn line_min_interval(&self) -> Duration {
        Duration::from_millis(self.line_send_min_ms.max(1))
    }

    pub fn fallback_meta(&self) -> FrameMeta {
        let (width, height) = self.fallback_frame;
        if width == 0 || height == 0 {
            return FrameMeta::default();
        }
        FrameMeta::new(width, height, 0.0)
    }
}
