//! Watched currency and stock lists from the user settings file.

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// User-selected symbols to resolve on the home dashboard.
///
/// The backing file is JSON with two array fields. Any load or parse
/// problem yields both lists empty; a partially readable file never
/// produces a partial result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UserSettings {
    #[serde(default, deserialize_with = "string_list")]
    pub user_currencies: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub user_stocks: Vec<String>,
}

/// Accepts non-string array elements by stringifying them.
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|value| match value {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}

impl UserSettings {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Could not read settings file {}: {e}", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(settings) => {
                debug!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("Malformed settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }
}
