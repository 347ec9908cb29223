//! Persistent settings for the dashboard app.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All persistable UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Data directory holding occurrences.csv and daystats.csv
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    // Display
    pub node_size: f32,
    pub show_labels: bool,

    // Physics
    pub physics_enabled: bool,
    pub repulsion: f32,
    pub attraction: f32,
    pub centering: f32,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),

            // Display
            node_size: 10.0,
            show_labels: true,

            // Physics
            physics_enabled: true,
            repulsion: 9000.0,
            attraction: 0.06,
            centering: 0.002,
        }
    }
}

impl Settings {
    /// Get the path to the settings file
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("mindgraph-native");
            p.push("settings.json");
            p
        })
    }

    /// Load settings from disk, returning defaults if file doesn't exist or is invalid
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            tracing::warn!("could not determine config directory, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => {
                    tracing::info!("loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    tracing::warn!("failed to parse settings file: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                // File doesn't exist yet, that's fine
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            tracing::warn!("could not determine config directory, settings not saved");
            return;
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("failed to create config directory: {}", e);
                return;
            }
        }

        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!("failed to write settings file: {}", e);
                }
            }
            Err(e) => {
                tracing::warn!("failed to serialize settings: {}", e);
            }
        }
    }
}
