//! HTTP client for the counting backend. All endpoints are narrow JSON
//! contracts; error bodies carry `{ ok: false, error }` and the error string
//! is surfaced to the caller.

use anyhow::{bail, Context, Result};
use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::contain::FrameMeta;
use crate::feed::CountEvent;

/// Counter state as reported by the status endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub paused: bool,
    #[serde(rename = "in", default)]
    pub count_in: i64,
    #[serde(rename = "out", default)]
    pub count_out: i64,
}

impl StatusSnapshot {
    pub fn balance(&self) -> i64 {
        self.count_in - self.count_out
    }
}

/// Session metadata collected when the operator finishes a count.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StopSummary {
    pub animal_type: String,
    pub batch_number: String,
    pub recipient: String,
    pub additional_notes: String,
}

#[derive(Debug, Deserialize)]
struct MetaResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    fps: f32,
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    events: Vec<CountEvent>,
}

#[derive(Debug, Deserialize)]
struct AckResponse {
    #[serde(default)]
    error: Option<String>,
}

pub struct BackendClient {
    base: Url,
    client: Client,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).context("parse backend url")?;
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("head_count console")
            .build()?;
        Ok(Self { base, client })
    }

    /// Query the true frame resolution. `None` means the backend could not
    /// answer and the caller should fall back to its configured default.
    pub fn video_meta(&self) -> Result<Option<FrameMeta>> {
        let data: MetaResponse = self.get_json(self.endpoint("api/meta/")?)?;
        if data.ok && data.width > 0 && data.height > 0 {
            Ok(Some(FrameMeta::new(data.width, data.height, data.fps.max(0.0))))
        } else {
            Ok(None)
        }
    }

    /// Persist the normalized line position. Idempotently overwritable; a
    /// failure here is non-fatal and simply corrected by the next send.
    pub fn set_line(&self, y_norm: f32) -> Result<()> {
        let body = serde_json::json!({ "line_y_norm": y_norm.clamp(0.0, 1.0) });
        let resp = self
            .client
            .post(self.endpoint("api/line/")?)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .context("send line update")?;
        let _: AckResponse = Self::parse(resp)?;
        Ok(())
    }

    pub fn status(&self) -> Result<StatusSnapshot> {
        self.get_json(self.endpoint("api/status/")?)
    }

    /// Incremental event fetch: everything with an id above `after`.
    pub fn events_after(&self, after: u64) -> Result<Vec<CountEvent>> {
        let mut url = self.endpoint("api/events/")?;
        url.query_pairs_mut()
            .append_pair("after", &after.to_string());
        let data: EventsResponse = self.get_json(url)?;
        Ok(data.events)
    }

    pub fn start(&self, camera_id: u64) -> Result<()> {
        let mut url = self.endpoint("api/start/")?;
        url.query_pairs_mut()
            .append_pair("camera_id", &camera_id.to_string());
        self.post_ack(url, None)
    }

    pub fn pause(&self) -> Result<()> {
        self.post_ack(self.endpoint("api/pause/")?, None)
    }

    pub fn resume(&self) -> Result<()> {
        self.post_ack(self.endpoint("api/resume/")?, None)
    }

    pub fn stop(&self, summary: &StopSummary) -> Result<()> {
        let body = serde_json::to_string(summary).context("encode stop summary")?;
        self.post_ack(self.endpoint("api/stop/")?, Some(body))
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("build endpoint url for {path}"))
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let resp = self.client.get(url).send().context("send request")?;
        Self::parse(resp)
    }

    fn post_ack(&self, url: Url, body: Option<String>) -> Result<()> {
        let mut req = self.client.post(url);
        if let Some(body) = body {
            req = req.header(CONTENT_TYPE, "application/json").body(body);
        }
        let resp = req.send().context("send request")?;
        let _: AckResponse = Self::parse(resp)?;
        Ok(())
    }

    fn parse<T: DeserializeOwned>(resp: Response) -> Result<T> {
        let status = resp.status();
        let body = resp.text().context("read response body")?;
        if !status.is_success() {
            let msg = serde_json::from_str::<AckResponse>(&body)
                .ok()
                .and_then(|ack| ack.error)
                .unwrap_or_else(|| format!("http status {status}"));
            bail!(msg);
        }
        serde_json::from_str(&body).context("parse response body")
    }
}
