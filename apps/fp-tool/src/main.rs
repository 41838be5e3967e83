#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod import_worker;

use app::FepostApp;

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 760.0])
            .with_title("fepost"),
        ..Default::default()
    };

    eframe::run_native(
        "fepost",
        options,
        Box::new(|cc| Ok(Box::new(FepostApp::new(cc)))),
    )
}
