//! Persistent viewer settings

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::inspect::InspectorConfig;

/// Viewer settings that persist between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window
    pub window_width: f32,
    pub window_height: f32,
    pub side_panel_width: f32,

    // Display
    pub ray_color: [f32; 3],
    pub ray_width: f32,
    pub show_axes: bool,
    pub axis_length: f32,
    pub background_color: [f32; 3],

    // Last opened database
    pub last_db: Option<PathBuf>,

    // Recent databases (most recent first, max 10)
    pub recent_dbs: Vec<PathBuf>,

    // Last selection inputs
    pub row: i32,
    pub col: i32,
    pub path_idx: i32,
    pub node_idx: i32,

    // Reconstruction / display transform
    pub inspector: InspectorConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 1280.0,
            window_height: 720.0,
            side_panel_width: 320.0,
            ray_color: [1.0, 0.4, 0.4],
            ray_width: 1.5,
            show_axes: true,
            axis_length: 10.0,
            background_color: [0.1, 0.1, 0.12],
            last_db: None,
            recent_dbs: Vec::new(),
            row: 0,
            col: 0,
            path_idx: 0,
            node_idx: 0,
            inspector: InspectorConfig::default(),
        }
    }
}

const MAX_RECENT_DBS: usize = 10;

impl Settings {
    /// Get settings file path
    fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("raypath-inspector");
            std::fs::create_dir_all(&p).ok();
            p.push("settings.json");
            p
        })
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load() -> Self {
        Self::path().map(|p| Self::load_from(&p)).unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(path) = Self::path() {
            self.save_to(&path);
        }
    }

    pub fn save_to(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    tracing::warn!(path = %path.display(), error = %e, "failed to save settings");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize settings"),
        }
    }

    /// Add database to recent list (moves to top if already present)
    pub fn add_recent(&mut self, path: PathBuf) {
        self.recent_dbs.retain(|p| p != &path);
        self.recent_dbs.insert(0, path.clone());
        self.recent_dbs.truncate(MAX_RECENT_DBS);
        self.last_db = Some(path);
    }

    /// Get recent databases (filters out non-existent)
    pub fn recent_dbs(&self) -> Vec<&PathBuf> {
        self.recent_dbs.iter().filter(|p| p.exists()).collect()
    }
}
