use head_count::api::BackendClient;
use head_count::cameras::load_cameras;
use head_count::gui::ConsoleApp;
use head_count::settings::Settings;
use head_count::{logging, worker};

use eframe::egui;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load("settings.json")?;
    logging::init(settings.debug_logging);

    let cameras = load_cameras("cameras.json")?;
    let client = BackendClient::new(&settings.backend_url)?;
    let backend = worker::spawn(client);

    let (width, height) = settings.window_size.unwrap_or((960.0, 680.0));
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    let app = ConsoleApp::new(settings, cameras, backend);
    let _ = eframe::run_native(
        "Head Count",
        native_options,
        Box::new(move |_cc| Box::new(app)),
    );
    Ok(())
}
