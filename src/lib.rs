pub mod api;
pub mod cameras;
pub mod contain;
pub mod feed;
pub mod gui;
pub mod line_sync;
pub mod logging;
pub mod session;
pub mod settings;
pub mod worker;
