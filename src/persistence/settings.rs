use crate::domain::DEFAULT_EMOJI;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the settings file inside the data directory
pub const SETTINGS_FILE: &str = "settings.json";

/// User settings stored in settings.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name of the list created on first run
    pub default_list_name: String,
    /// Name used when a new list is given a blank name
    pub fallback_list_name: String,
    /// Emoji given to new lists
    pub default_emoji: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_list_name: "Inbox".to_string(),
            fallback_list_name: "List".to_string(),
            default_emoji: DEFAULT_EMOJI.to_string(),
        }
    }
}

/// Load settings from a JSON file; a missing file yields defaults
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();

    let Some(content) = super::read_file(path)? else {
        return Ok(Settings::default());
    };
    let settings: Settings = serde_json::from_str(&content)
        .with_context(|| format!("Invalid settings file: {}", path.display()))?;
    Ok(settings)
}

/// Save settings to a JSON file
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    super::atomic_write(path, &json)?;
    Ok(())
}
