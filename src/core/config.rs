use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Application settings.
/// NOTE: the serialized shape is consumed by ui/script.js.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// Initial map view when no alert is focused.
    pub map_center: (f64, f64),
    pub map_zoom: u8,
}

impl Default for Settings {
    fn default() -> Self {
        // Araruama region, same default view as the public board.
        Self {
            map_center: (-22.9189, -42.8189),
            map_zoom: 12,
        }
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(app_config_dir: PathBuf) -> Self {
        Self {
            config_path: app_config_dir.join("settings.json"),
        }
    }

    pub fn load(&self) -> Settings {
        if self.config_path.exists() {
            if let Ok(content) = fs::read_to_string(&self.config_path) {
                if let Ok(settings) = serde_json::from_str(&content) {
                    return settings;
                }
            }
        }
        Settings::default()
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        // Ensure directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}
