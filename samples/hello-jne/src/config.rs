use std::fs;
use std::path::Path;

use jne_plataforma_electoral_client::LogLevel;
use jne_plataforma_electoral_client::jne::serviceclient::DEFAULT_BASE_URL;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub log_level: LogLevel,
    pub election_process: i64,
    pub resume_id: i64,
    pub political_organization: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: DEFAULT_BASE_URL.to_string(),
            log_level: LogLevel::Information,
            election_process: 110,
            resume_id: 0,
            political_organization: 0,
        }
    }
}

pub fn load_settings() -> Result<Settings, String> {
    let mut path = std::env::current_dir().map_err(|e| e.to_string())?;
    path.push("jne.json");
    if !path.exists() {
        return Ok(Settings::default());
    }
    read_settings(&path)
}

fn read_settings(path: &Path) -> Result<Settings, String> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("Failed to read jne.json: {e}"))?;
    serde_json::from_str(&contents).map_err(|e| format!("Invalid jne.json: {e}"))
}
