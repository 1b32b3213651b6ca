mod app;
mod color;
mod config;
mod data;
mod error;
mod export;
mod session;
mod ui;

use std::path::Path;

use app::ExplorerApp;
use config::{CONFIG_FILE, Config};
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::load_or_default(Path::new(CONFIG_FILE));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.title.as_str())
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        &config.title,
        options,
        Box::new(|_cc| Ok(Box::new(ExplorerApp::new(&config)))),
    )
}
