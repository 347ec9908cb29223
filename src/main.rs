//! Native MindGraph Dashboard
//!
//! A desktop app for exploring daily journal words: a co-occurrence graph
//! over a selectable date range, with mind-state and sleep stats alongside.

mod app;
mod core;
mod data;
mod layout;
mod settings;
mod theme;

use std::path::PathBuf;

use eframe::egui;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Optional data directory override: `mindgraph-native <dir>`
    let data_dir = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1300.0, 860.0])
            .with_title("MindGraph Dashboard"),
        persist_window: true,
        ..Default::default()
    };

    eframe::run_native(
        "MindGraph Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(app::DashboardApp::new(cc, data_dir)))),
    )
}
