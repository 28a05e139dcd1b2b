//! Ray Inspector Viewer - interactive view of recorded light paths

mod app;
mod camera;
mod settings;
mod viewport;

pub use settings::Settings;

use std::path::PathBuf;
use anyhow::Result;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Run the viewer with an optional database to open
pub fn run(initial_db: Option<PathBuf>) -> Result<()> {
    let trace_guard = init_tracing();

    let settings = Settings::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height])
            .with_title("Ray Path Inspector"),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "Ray Path Inspector",
        options,
        Box::new(move |cc| Ok(Box::new(app::InspectorApp::new(cc, initial_db.clone(), trace_guard)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run: {}", e))
}

/// Install console logging, plus a Chrome trace in `trace.json` when `RAYPATH_TRACE=1`.
fn init_tracing() -> Option<tracing_chrome::FlushGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter);

    let (chrome_layer, guard) = if std::env::var("RAYPATH_TRACE").ok().as_deref() == Some("1") {
        let (layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
            .file("trace.json")
            .build();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    if tracing_subscriber::registry().with(fmt_layer).with(chrome_layer).try_init().is_err() {
        return None;
    }

    guard
}
