//! Recorded appliance data
//!
//! A fixture directory holds the responses of one appliance as JSON files:
//!
//! | File                    | Content                               |
//! |-------------------------|---------------------------------------|
//! | `appliance_data.json`   | appliance description (required)      |
//! | `commands.json`         | command schema (required)             |
//! | `command_history.json`  | sent commands, most recent first      |
//! | `favourites.json`       | saved favourites                      |
//! | `attributes.json`       | telemetry context                     |
//! | `statistics.json`       | usage statistics                      |
//! | `maintenance.json`      | maintenance cycle                     |
//!
//! Responses may still be wrapped in their `{"payload": ...}` envelope.

use hon_core::{Favourite, HistoryEntry};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct FixtureSet {
    pub appliance: Value,
    pub commands: Value,
    pub history: Vec<HistoryEntry>,
    pub favourites: Vec<Favourite>,
    pub context: Value,
    pub statistics: Value,
    pub maintenance: Value,
}

impl FixtureSet {
    pub fn load(dir: &Path) -> Result<Self, FixtureError> {
        let appliance = match unwrap_payload(read_json(&dir.join("appliance_data.json"))?) {
            Value::Array(mut list) if !list.is_empty() => list.swap_remove(0),
            other => other,
        };
        let commands = unwrap_payload(read_json(&dir.join("commands.json"))?);

        let history = read_list(&dir.join("command_history.json"), "history")?;
        let favourites = read_list(&dir.join("favourites.json"), "favourites")?;

        let context = read_optional(&dir.join("attributes.json"))?;
        let statistics = read_optional(&dir.join("statistics.json"))?;
        let maintenance = read_optional(&dir.join("maintenance.json"))?;

        log::debug!(
            "Loaded fixtures from {}: {} history entries, {} favourites",
            dir.display(),
            history.len(),
            favourites.len()
        );
        Ok(FixtureSet {
            appliance,
            commands,
            history,
            favourites,
            context,
            statistics,
            maintenance,
        })
    }
}

fn read_json(path: &Path) -> Result<Value, FixtureError> {
    let file = File::open(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| FixtureError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional(path: &Path) -> Result<Value, FixtureError> {
    if !path.exists() {
        log::debug!("No {}", path.display());
        return Ok(Value::Null);
    }
    Ok(unwrap_payload(read_json(path)?))
}

fn read_list<T>(path: &Path, key: &str) -> Result<Vec<T>, FixtureError>
where
    T: serde::de::DeserializeOwned,
{
    let value = match read_optional(path)? {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or_default(),
        Value::Null => return Ok(Vec::new()),
        other => other,
    };
    serde_json::from_value(value).map_err(|source| FixtureError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Strip a `{"payload": ...}` response envelope
fn unwrap_payload(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("payload") => {
            map.remove("payload").unwrap_or_default()
        }
        other => other,
    }
}
