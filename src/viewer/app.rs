//! Viewer application state and UI

use std::path::PathBuf;

use egui::{CentralPanel, Color32, RichText, SidePanel, TopBottomPanel};

use super::settings::Settings;
use super::viewport::{LineLayer, Viewport};
use crate::geom::{axis_gizmo, Segment};
use crate::inspect::{Inspector, SelectionController, Transition};
use crate::util::{BBox3f, Vec3};
use crate::Error;

/// Main viewer application
pub struct InspectorApp {
    viewport: Viewport,
    settings: Settings,

    // Store state
    inspector: Option<Inspector>,
    current_db: Option<PathBuf>,
    pending_db: Option<PathBuf>,

    // Selection
    selection: SelectionController,
    /// Chosen path geometry after the display transform
    ray_segments: Vec<Segment>,
    axes: Vec<(Segment, Color32)>,

    // UI state
    status_message: String,

    _trace_guard: Option<tracing_chrome::FlushGuard>,
}

impl InspectorApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        initial_db: Option<PathBuf>,
        trace_guard: Option<tracing_chrome::FlushGuard>,
    ) -> Self {
        let mut app = Self::with_settings(Settings::load(), trace_guard);
        // Use last database if none given
        app.pending_db = initial_db.or_else(|| app.settings.last_db.clone());
        app
    }

    fn with_settings(settings: Settings, trace_guard: Option<tracing_chrome::FlushGuard>) -> Self {
        let axes = build_axes(settings.axis_length);

        Self {
            viewport: Viewport::new(),
            settings,
            inspector: None,
            current_db: None,
            pending_db: None,
            selection: SelectionController::new(),
            ray_segments: Vec::new(),
            axes,
            status_message: "No database".into(),
            _trace_guard: trace_guard,
        }
    }

    fn open_db(&mut self, path: PathBuf) {
        // Close the previous store before opening the next one
        self.close_db();

        match Inspector::open(&path, self.settings.inspector) {
            Ok(inspector) => {
                self.status_message = format!("Opened {}", path.display());
                self.inspector = Some(inspector);
                self.current_db = Some(path.clone());
                self.settings.add_recent(path);
                self.settings.save();
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to open database");
                self.status_message = format!("Failed to open {}: {}", path.display(), e);
            }
        }
    }

    fn close_db(&mut self) {
        self.selection.reset();
        self.ray_segments.clear();
        self.current_db = None;
        if let Some(inspector) = self.inspector.take() {
            if let Err(e) = inspector.close() {
                tracing::warn!(error = %e, "error closing database");
            }
        }
    }

    fn open_db_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("SQLite", &["db", "sqlite", "sqlite3"])
            .pick_file()
        {
            self.pending_db = Some(path);
        }
    }

    fn report(&mut self, action: &str, result: crate::Result<Transition>) {
        self.status_message = match result {
            Ok(Transition::Applied) => format!("{}: ok", action),
            Ok(Transition::Ignored) => format!("{}: out of range", action),
            Err(e) => describe_error(&e),
        };
    }

    fn apply_pixel(&mut self) {
        let Some(inspector) = &self.inspector else { return };
        let result = self.selection.set_pixel(inspector, self.settings.row, self.settings.col);
        if result.is_ok() {
            self.ray_segments.clear();
        }
        self.report("pixel", result);
    }

    fn apply_path(&mut self) {
        let Some(inspector) = &self.inspector else { return };
        let Ok(idx) = usize::try_from(self.settings.path_idx) else {
            self.status_message = "path: out of range".into();
            return;
        };
        let result = self.selection.choose_path(inspector, idx);
        if matches!(result, Ok(Transition::Applied)) {
            let transform = inspector.display_transform();
            self.ray_segments = self
                .selection
                .geometry()
                .map(|g| transform.apply_all(&g.segments))
                .unwrap_or_default();
        }
        self.report("path", result);
    }

    fn apply_node(&mut self) {
        let Some(inspector) = &self.inspector else { return };
        let Ok(idx) = usize::try_from(self.settings.node_idx) else {
            self.status_message = "node: out of range".into();
            return;
        };
        let result = self.selection.choose_node(inspector, idx);
        self.report("node", result);
    }

    fn frame_path(&mut self) {
        let vertices: &[Vec3] = bytemuck::cast_slice(&self.ray_segments);
        let bounds = BBox3f::from_points(vertices);
        if !bounds.is_empty() {
            self.viewport.camera.focus(bounds.center(), bounds.radius());
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        // Collect recent databases to avoid borrow issues
        let recent: Vec<PathBuf> = self.settings.recent_dbs().into_iter().cloned().collect();

        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open...").clicked() {
                    self.open_db_dialog();
                    ui.close();
                }

                if !recent.is_empty() {
                    ui.menu_button("Recent", |ui| {
                        for path in &recent {
                            let name = path.file_name()
                                .map(|n| n.to_string_lossy().to_string())
                                .unwrap_or_else(|| path.display().to_string());
                            if ui.button(&name).clicked() {
                                self.pending_db = Some(path.clone());
                                ui.close();
                            }
                        }
                        ui.separator();
                        if ui.button("Clear Recent").clicked() {
                            self.settings.recent_dbs.clear();
                            self.settings.save();
                            ui.close();
                        }
                    });
                }

                ui.separator();
                if ui.button("Exit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                ui.checkbox(&mut self.settings.show_axes, "Show Axes");
                if ui.button("Frame Path").clicked() {
                    self.frame_path();
                    ui.close();
                }
                if ui.button("Reset Camera").clicked() {
                    self.viewport.camera.reset();
                    ui.close();
                }
            });
        });
    }

    fn side_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Rays");
        ui.separator();

        match &self.current_db {
            Some(path) => ui.label(format!(
                "Database: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            )),
            None => ui.label("No database loaded"),
        };

        ui.add_enabled_ui(self.inspector.is_some(), |ui| {
            // Pixel
            ui.separator();
            ui.label(RichText::new("Pixel").strong());
            ui.horizontal(|ui| {
                ui.label("row");
                ui.add(egui::DragValue::new(&mut self.settings.row));
                ui.label("col");
                ui.add(egui::DragValue::new(&mut self.settings.col));
            });
            if ui.button("apply row-col").clicked() {
                self.apply_pixel();
            }
            ui.label(format!("path count: {}", self.selection.path_count()));

            // Path
            ui.separator();
            ui.label(RichText::new("Path").strong());
            ui.horizontal(|ui| {
                ui.label("path idx");
                ui.add(egui::DragValue::new(&mut self.settings.path_idx));
            });
            if ui.button("apply path idx").clicked() {
                self.apply_path();
            }
            ui.label(format!("path node cnt: {}", self.selection.node_count()));
            if let Some(geom) = self.selection.geometry() {
                ui.label(format!("segments: {}", geom.len()));
                if !geom.skipped.is_empty() {
                    ui.colored_label(Color32::YELLOW, format!("missing nodes: {:?}", geom.skipped));
                }
            }

            // Node
            ui.separator();
            ui.label(RichText::new("Node").strong());
            ui.horizontal(|ui| {
                ui.label("path node idx");
                ui.add(egui::DragValue::new(&mut self.settings.node_idx));
            });
            if ui.button("apply path node idx").clicked() {
                self.apply_node();
            }
        });

        if let Some(detail) = self.selection.node_detail() {
            ui.separator();
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.label(RichText::new(detail).monospace());
            });
        }
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(&self.status_message);
        });
    }
}

impl eframe::App for InspectorApp {
    fn on_exit(&mut self) {
        self.close_db();
        self.settings.save();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let _span = tracing::trace_span!("viewer_update").entered();

        if let Some(path) = self.pending_db.take() {
            self.open_db(path);
        }

        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.menu_bar(ctx, ui);
        });

        TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status_bar(ui);
        });

        let response = SidePanel::right("side_panel")
            .default_width(self.settings.side_panel_width)
            .min_width(200.0)
            .max_width(600.0)
            .resizable(true)
            .show(ctx, |ui| {
                self.side_panel(ui);
            });
        self.settings.side_panel_width = response.response.rect.width();

        let [r, g, b] = self.settings.ray_color;
        let ray_color = Color32::from_rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8);
        let [br, bg, bb] = self.settings.background_color;
        let background = Color32::from_rgb((br * 255.0) as u8, (bg * 255.0) as u8, (bb * 255.0) as u8);

        CentralPanel::default().show(ctx, |ui| {
            let mut layers = Vec::with_capacity(4);
            if self.settings.show_axes {
                for (seg, color) in &self.axes {
                    layers.push(LineLayer { segments: std::slice::from_ref(seg), color: *color, width: 1.0 });
                }
            }
            layers.push(LineLayer {
                segments: &self.ray_segments,
                color: ray_color,
                width: self.settings.ray_width,
            });

            let response = self.viewport.show(ui, &layers, background);
            if response.hovered() && ui.input(|i| i.key_pressed(egui::Key::F)) {
                self.frame_path();
            }
        });

        ctx.input(|i| {
            if let Some(rect) = i.viewport().inner_rect {
                self.settings.window_width = rect.width();
                self.settings.window_height = rect.height();
            }
        });
    }
}

fn build_axes(length: f32) -> Vec<(Segment, Color32)> {
    axis_gizmo(length)
        .into_iter()
        .map(|(seg, [r, g, b])| {
            (seg, Color32::from_rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8))
        })
        .collect()
}

fn describe_error(e: &Error) -> String {
    if e.is_store_failure() {
        tracing::error!(error = %e, "store unavailable");
        format!("Store unavailable: {}", e)
    } else {
        tracing::warn!(error = %e, "bad record");
        format!("Error: {}", e)
    }
}
