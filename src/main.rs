//! Lexigraph
//!
//! A native desktop explorer for a knowledge-base entity graph: entries lay
//! themselves out with a force simulation, relationships render as typed
//! directed edges, and dragging one entry onto another proposes a new link.

mod api;
mod app;
mod graph;
mod settings;
mod theme;

use eframe::egui;
use tracing_subscriber;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_title("Lexigraph"),
        persist_window: true, // Persist window state and egui memory between sessions
        ..Default::default()
    };

    eframe::run_native(
        "Lexigraph",
        options,
        Box::new(|cc| Ok(Box::new(app::ExplorerApp::new(cc)))),
    )
}
