//! Background I/O worker. The UI thread posts requests over a channel and
//! drains replies each frame, so no network call ever blocks a paint and all
//! session state keeps a single writer.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use crate::api::{BackendClient, StatusSnapshot, StopSummary};
use crate::contain::FrameMeta;
use crate::feed::CountEvent;
use crate::line_sync::LineSink;

#[derive(Debug)]
pub enum BackendRequest {
    Meta,
    Line { y_norm: f32 },
    Status,
    Events { after: u64 },
    Start { camera_id: u64 },
    Pause,
    Resume,
    Stop { summary: StopSummary },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Start,
    Pause,
    Resume,
    Stop,
}

impl ControlAction {
    pub fn label(self) -> &'static str {
        match self {
            ControlAction::Start => "start",
            ControlAction::Pause => "pause",
            ControlAction::Resume => "resume",
            ControlAction::Stop => "stop",
        }
    }
}

#[derive(Debug)]
pub enum BackendReply {
    /// `None` when the backend could not report the frame size.
    Meta(Option<FrameMeta>),
    Status(StatusSnapshot),
    Events(Vec<CountEvent>),
    LineFailed(String),
    ControlDone(ControlAction),
    ControlFailed(ControlAction, String),
}

/// UI-side handle: non-blocking request submission plus a drain of replies.
pub struct BackendHandle {
    tx: Sender<BackendRequest>,
    rx: Receiver<BackendReply>,
}

impl BackendHandle {
    pub fn request(&self, req: BackendRequest) {
        let _ = self.tx.send(req);
    }

    pub fn try_recv(&self) -> Option<BackendReply> {
        self.rx.try_recv().ok()
    }

    pub fn line_sink(&self) -> LineTx {
        LineTx {
            tx: self.tx.clone(),
        }
    }
}

/// Line-update sink backed by the worker channel; never blocks.
#[derive(Clone)]
pub struct LineTx {
    tx: Sender<BackendRequest>,
}

impl LineSink for LineTx {
    fn send(&self, y_norm: f32) {
        let _ = self.tx.send(BackendRequest::Line { y_norm });
    }
}

pub fn spawn(client: BackendClient) -> BackendHandle {
    let (req_tx, req_rx) = channel();
    let (rep_tx, rep_rx) = channel();
    thread::spawn(move || run(client, req_rx, rep_tx));
    BackendHandle {
        tx: req_tx,
        rx: rep_rx,
    }
}

fn run(
    client: BackendClient,
    req_rx: Receiver<BackendRequest>,
    rep_tx: Sender<BackendReply>,
) {
    while let Ok(req) = req_rx.recv() {
        let reply = match req {
            BackendRequest::Meta => {
                let meta = client.video_meta().unwrap_or_else(|err| {
                    tracing::warn!("video meta query failed: {err}");
                    None
                });
                Some(BackendReply::Meta(meta))
            }
            BackendRequest::Line { y_norm } => match client.set_line(y_norm) {
                Ok(()) => None,
                Err(err) => {
                    tracing::error!("line update failed: {err}");
                    Some(BackendReply::LineFailed(err.to_string()))
                }
            },
            // Poll failures are swallowed; the next tick retries anyway.
            BackendRequest::Status => match client.status() {
                Ok(status) => Some(BackendReply::Status(status)),
                Err(err) => {
                    tracing::debug!("status poll failed: {err}");
                    None
                }
            },
            BackendRequest::Events { after } => match client.events_after(after) {
                Ok(events) => Some(BackendReply::Events(events)),
                Err(err) => {
                    tracing::debug!("event poll failed: {err}");
                    None
                }
            },
            BackendRequest::Start { camera_id } => {
                control(ControlAction::Start, client.start(camera_id))
            }
            BackendRequest::Pause => control(ControlAction::Pause, client.pause()),
            BackendRequest::Resume => control(ControlAction::Resume, client.resume()),
            BackendRequest::Stop { summary } => {
                control(ControlAction::Stop, client.stop(&summary))
            }
        };

        if let Some(reply) = reply {
            if rep_tx.send(reply).is_err() {
                break;
            }
        }
    }
}

fn control(action: ControlAction, result: anyhow::Result<()>) -> Option<BackendReply> {
    match result {
        Ok(()) => Some(BackendReply::ControlDone(action)),
        Err(err) => {
            tracing::error!("{} request failed: {err}", action.label());
            Some(BackendReply::ControlFailed(action, err.to_string()))
        }
    }
}
