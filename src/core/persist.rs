//! Durable local round-trip of the alert collection.
//!
//! One JSON file in the app data directory, full overwrite on every save.
//! A missing or corrupt file is never fatal: the board just starts empty.

use std::fs;
use std::io;
use std::path::PathBuf;

use super::model::Alert;

const STORAGE_FILE: &str = "alertas.json";

pub struct AlertStorage {
    path: PathBuf,
}

impl AlertStorage {
    /// # Arguments
    /// * `data_dir` - The app data directory (from Tauri's app_data_dir)
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            path: data_dir.join(STORAGE_FILE),
        }
    }

    /// Load the stored collection, or an empty one on missing/corrupt data.
    pub fn load(&self) -> Vec<Alert> {
        if self.path.exists() {
            if let Ok(content) = fs::read_to_string(&self.path) {
                if let Ok(alerts) = serde_json::from_str(&content) {
                    return alerts;
                }
                log::warn!("corrupt alert file at {:?}, starting empty", self.path);
            }
        }
        Vec::new()
    }

    /// Overwrite the stored collection with `alerts`.
    pub fn save(&self, alerts: &[Alert]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(alerts)?;
        fs::write(&self.path, content)
    }
}
