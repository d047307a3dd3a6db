use eframe::egui;
use egui_extras::{Column, TableBuilder};
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::time::{Duration, Instant};

use crate::api::StopSummary;
use crate::cameras::{detection_classes, Camera};
use crate::contain::{norm_to_offset, pointer_to_norm, ContainLayout, ContainerRect};
use crate::session::CountingSession;
use crate::settings::Settings;
use crate::worker::{BackendHandle, BackendReply, BackendRequest, ControlAction, LineTx};

/// Three-step operator flow: pick a camera, place the line, run the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    CameraSelection,
    LineSetup,
    Active,
}

/// Modal collecting session metadata before the stop request goes out.
#[derive(Default)]
struct StopDialog {
    open: bool,
    animal_type: String,
    batch_number: String,
    recipient: String,
    additional_notes: String,
}

impl StopDialog {
    fn open_for(&mut self, camera: &Camera) {
        self.animal_type = camera.detection_class.clone();
        self.batch_number.clear();
        self.recipient.clear();
        self.additional_notes.clear();
        self.open = true;
    }

    fn ui(&mut self, ctx: &egui::Context) -> Option<StopSummary> {
        if !self.open {
            return None;
        }
        let mut confirmed = false;
        let mut cancelled = false;
        let mut open = true;
        egui::Window::new("Finish count")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label("Animal type");
                ui.text_edit_singleline(&mut self.animal_type);
                if self.animal_type.trim().is_empty() {
                    ui.colored_label(egui::Color32::YELLOW, "Animal type is required");
                }
                ui.label("Batch number");
                ui.text_edit_singleline(&mut self.batch_number);
                ui.label("Recipient");
                ui.text_edit_singleline(&mut self.recipient);
                ui.label("Notes");
                ui.text_edit_multiline(&mut self.additional_notes);
                ui.horizontal(|ui| {
                    let can_confirm = !self.animal_type.trim().is_empty();
                    if ui
                        .add_enabled(can_confirm, egui::Button::new("Confirm and stop"))
                        .clicked()
                    {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
            });
        if !open || cancelled {
            self.open = false;
        }
        if confirmed {
            self.open = false;
            return Some(StopSummary {
                animal_type: self.animal_type.trim().to_string(),
                batch_number: self.batch_number.trim().to_string(),
                recipient: self.recipient.trim().to_string(),
                additional_notes: self.additional_notes.trim().to_string(),
            });
        }
        None
    }
}

pub struct ConsoleApp {
    settings: Settings,
    cameras: Vec<Camera>,
    class_filter: String,
    selected_camera: Option<u64>,
    phase: Phase,
    session: Option<CountingSession<LineTx>>,
    backend: BackendHandle,
    toasts: Toasts,
    stop_dialog: StopDialog,
    start_in_flight: bool,
    stop_in_flight: bool,
}

impl ConsoleApp {
    pub fn new(settings: Settings, cameras: Vec<Camera>, backend: BackendHandle) -> Self {
        let toasts = Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]);
        Self {
            settings,
            cameras,
            class_filter: String::new(),
            selected_camera: None,
            phase: Phase::CameraSelection,
            session: None,
            backend,
            toasts,
            stop_dialog: StopDialog::default(),
            start_in_flight: false,
            stop_in_flight: false,
        }
    }

    fn notify(&mut self, kind: ToastKind, msg: String) {
        match kind {
            ToastKind::Error => tracing::error!("{msg}"),
            _ => tracing::info!("{msg}"),
        }
        if self.settings.enable_toasts {
            self.toasts.add(Toast {
                text: msg.into(),
                kind,
                options: ToastOptions::default()
                    .duration_in_seconds(self.settings.toast_duration as f64),
            });
        }
    }

    fn drain_backend(&mut self) {
        while let Some(reply) = self.backend.try_recv() {
            match reply {
                BackendReply::Meta(meta) => {
                    if let Some(session) = self.session.as_mut() {
                        session.apply_meta(meta);
                    }
                }
                BackendReply::Status(status) => {
                    if let Some(session) = self.session.as_mut() {
                        session.apply_status(status);
                    }
                }
                BackendReply::Events(events) => {
                    if let Some(session) = self.session.as_mut() {
                        session.feed.absorb(events);
                    }
                }
                BackendReply::LineFailed(err) => {
                    self.notify(ToastKind::Error, format!("Line update failed: {err}"));
                }
                BackendReply::ControlDone(action) => self.on_control_done(action),
                BackendReply::ControlFailed(action, err) => {
                    match action {
                        ControlAction::Start => self.start_in_flight = false,
                        ControlAction::Stop => self.stop_in_flight = false,
                        _ => {}
                    }
                    self.notify(
                        ToastKind::Error,
                        format!("Failed to {}: {err}", action.label()),
                    );
                }
            }
        }
    }

    fn on_control_done(&mut self, action: ControlAction) {
        match action {
            ControlAction::Start => {
                self.start_in_flight = false;
                self.phase = Phase::Active;
                self.notify(ToastKind::Success, "Count started".into());
            }
            ControlAction::Stop => {
                self.stop_in_flight = false;
                self.session = None;
                self.phase = Phase::CameraSelection;
                self.notify(ToastKind::Success, "Count stopped".into());
            }
            // The next status poll reconciles the paused flag.
            ControlAction::Pause | ControlAction::Resume => {}
        }
    }

    fn pump_session(&mut self, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.line.tick(now);
        if self.phase == Phase::Active && session.cadence.due(now) {
            self.backend.request(BackendRequest::Status);
            self.backend.request(BackendRequest::Events {
                after: session.feed.last_id(),
            });
        }
    }

    fn enter_line_setup(&mut self, camera: Camera) {
        let mut session =
            CountingSession::new(camera, self.backend.line_sink(), &self.settings);
        self.backend.request(BackendRequest::Meta);
        // Persist the default position right away so backend and overlay
        // agree before the first drag.
        session.line.schedule_sync(Instant::now());
        self.session = Some(session);
        self.phase = Phase::LineSetup;
    }

    fn selected_camera(&self) -> Option<&Camera> {
        let id = self.selected_camera?;
        self.cameras.iter().find(|c| c.id == id)
    }

    fn camera_selection_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Select a camera");
        ui.add_space(8.0);

        let classes = detection_classes(&self.cameras);
        if !classes.is_empty() {
            egui::ComboBox::from_label("Animal filter")
                .selected_text(if self.class_filter.is_empty() {
                    "All".to_string()
                } else {
                    self.class_filter.clone()
                })
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.class_filter, String::new(), "All");
                    for class in &classes {
                        ui.selectable_value(&mut self.class_filter, class.clone(), class.as_str());
                    }
                });
        }

        // A filter change can hide the current selection; clear it so the
        // continue button cannot submit an invisible camera.
        let selection_hidden = self
            .selected_camera()
            .map_or(false, |cam| !cam.matches_filter(&self.class_filter));
        if selection_hidden {
            self.selected_camera = None;
        }

        let selected_label = self
            .selected_camera()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "Choose...".to_string());
        egui::ComboBox::from_label("Camera")
            .selected_text(selected_label)
            .show_ui(ui, |ui| {
                for cam in &self.cameras {
                    if !cam.matches_filter(&self.class_filter) {
                        continue;
                    }
                    let label = match &cam.location {
                        Some(loc) => format!("{} ({loc})", cam.name),
                        None => cam.name.clone(),
                    };
                    ui.selectable_value(&mut self.selected_camera, Some(cam.id), label);
                }
            });

        if self.cameras.iter().any(|c| c.is_active)
            && !self
                .cameras
                .iter()
                .any(|c| c.matches_filter(&self.class_filter))
        {
            ui.label("No camera matches the selected filter.");
        }
        if self.cameras.is_empty() {
            ui.label("No cameras configured. Add entries to cameras.json.");
        }

        ui.add_space(8.0);
        let selected = self.selected_camera().cloned();
        if ui
            .add_enabled(selected.is_some(), egui::Button::new("Use this camera"))
            .clicked()
        {
            if let Some(camera) = selected {
                self.enter_line_setup(camera);
            }
        }
    }

    /// Letterboxed video area with the draggable counting line. Used in both
    /// the setup and active phases.
    fn video_panel_ui(&mut self, ui: &mut egui::Ui) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let desired = egui::vec2(ui.available_width(), (ui.available_height() - 40.0).max(240.0));
        let (rect, response) =
            ui.allocate_exact_size(desired, egui::Sense::click_and_drag());
        let container = ContainerRect::new(rect.left(), rect.top(), rect.width(), rect.height());
        let layout = ContainLayout::compute(container, session.frame);

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 4.0, egui::Color32::from_gray(18));
        let drawn = egui::Rect::from_min_size(
            egui::pos2(rect.left() + layout.offset_x, rect.top() + layout.offset_y),
            egui::vec2(layout.drawn_width, layout.drawn_height),
        );
        painter.rect_filled(drawn, 0.0, egui::Color32::from_gray(45));

        let now = Instant::now();
        if response.drag_started() {
            session.line.begin_drag();
        }
        if let Some(pos) = response.interact_pointer_pos() {
            let y_norm =
                pointer_to_norm(pos.y, container, session.frame, session.line.position());
            if response.dragged() {
                session.line.continue_drag(y_norm, now);
            } else if response.clicked() {
                session.line.set_position(y_norm);
                session.line.schedule_sync(now);
            }
        }
        if response.drag_stopped() {
            session.line.end_drag(now);
        }

        let line_y = rect.top() + norm_to_offset(session.line.position(), layout, session.frame);
        painter.line_segment(
            [
                egui::pos2(drawn.left(), line_y),
                egui::pos2(drawn.right(), line_y),
            ],
            egui::Stroke::new(3.0, egui::Color32::from_rgb(0, 220, 80)),
        );

        let frame = session.frame;
        ui.label(format!(
            "Line at {:.1}% of frame ({}x{})",
            session.line.position() * 100.0,
            frame.width,
            frame.height
        ));
    }

    fn line_setup_ui(&mut self, ui: &mut egui::Ui) {
        let camera_name = self
            .session
            .as_ref()
            .map(|s| s.camera.name.clone())
            .unwrap_or_default();
        ui.heading(format!("Position the counting line - {camera_name}"));
        ui.label("Click or drag on the video area to place the line.");
        ui.add_space(4.0);

        self.video_panel_ui(ui);

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            if ui.button("Back").clicked() {
                self.session = None;
                self.phase = Phase::CameraSelection;
            }
            let start = ui.add_enabled(
                !self.start_in_flight,
                egui::Button::new("Start counting"),
            );
            if start.clicked() {
                if let Some(session) = self.session.as_ref() {
                    self.start_in_flight = true;
                    self.backend.request(BackendRequest::Start {
                        camera_id: session.camera.id,
                    });
                }
            }
        });
    }

    fn active_ui(&mut self, ui: &mut egui::Ui) {
        let (camera_name, status) = match self.session.as_ref() {
            Some(s) => (s.camera.name.clone(), s.status),
            None => return,
        };
        ui.horizontal(|ui| {
            ui.heading(format!("Counting - {camera_name}"));
            if status.paused {
                ui.colored_label(egui::Color32::YELLOW, "paused");
            } else if status.running {
                ui.colored_label(egui::Color32::from_rgb(0, 220, 80), "live");
            } else {
                ui.colored_label(egui::Color32::RED, "backend not running");
            }
        });

        ui.horizontal(|ui| {
            ui.label(format!("In: {}", status.count_in));
            ui.label(format!("Out: {}", status.count_out));
            ui.label(format!("Balance: {}", status.balance()));
        });

        self.video_panel_ui(ui);

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let pause_label = if status.paused { "Resume" } else { "Pause" };
            if ui.button(pause_label).clicked() {
                let req = if status.paused {
                    BackendRequest::Resume
                } else {
                    BackendRequest::Pause
                };
                self.backend.request(req);
            }
            let stop = ui.add_enabled(!self.stop_in_flight, egui::Button::new("Stop"));
            if stop.clicked() {
                if let Some(session) = self.session.as_ref() {
                    self.stop_dialog.open_for(&session.camera);
                }
            }
        });

        ui.add_space(8.0);
        ui.separator();
        ui.label("Crossings");
        self.event_log_ui(ui);
    }

    fn event_log_ui(&mut self, ui: &mut egui::Ui) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.feed.is_empty() {
            ui.weak("No crossings yet.");
            return;
        }
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(70.0))
            .column(Column::remainder())
            .column(Column::auto().at_least(32.0))
            .body(|mut body| {
                for ev in session.feed.iter() {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.monospace(format_event_time(ev.ts));
                        });
                        row.col(|ui| {
                            ui.label(format!("Animal detected - {}", ev.kind.label()));
                        });
                        row.col(|ui| {
                            let delta = ev.kind.delta();
                            let (text, color) = if delta > 0 {
                                (format!("+{delta}"), egui::Color32::from_rgb(0, 220, 80))
                            } else {
                                (delta.to_string(), egui::Color32::from_rgb(230, 80, 80))
                            };
                            ui.colored_label(color, text);
                        });
                    });
                }
            });
    }
}

fn format_event_time(ts: i64) -> String {
    match chrono::DateTime::from_timestamp(ts, 0) {
        Some(dt) => dt
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S")
            .to_string(),
        None => "--:--:--".to_string(),
    }
}

impl eframe::App for ConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_backend();
        self.pump_session(Instant::now());

        egui::CentralPanel::default().show(ctx, |ui| match self.phase {
            Phase::CameraSelection => self.camera_selection_ui(ui),
            Phase::LineSetup => self.line_setup_ui(ui),
            Phase::Active => self.active_ui(ui),
        });

        if let Some(summary) = self.stop_dialog.ui(ctx) {
            self.stop_in_flight = true;
            self.backend
                .request(BackendRequest::Stop { summary });
        }

        self.toasts.show(ctx);

        // Trailing line sends and the poll cadence need turns of the event
        // loop even when the pointer is idle.
        ctx.request_repaint_after(Duration::from_millis(50));
    }
}
