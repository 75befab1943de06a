//! Favourite and command-history records as delivered by the appliance API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user-saved program variant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favourite {
    #[serde(default)]
    pub favourite_name: String,
    #[serde(default)]
    pub command: RecordedCommand,
}

/// A previously sent command, most recent first in the history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(default)]
    pub command: RecordedCommand,
}

/// The command part of a favourite or history entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedCommand {
    #[serde(default)]
    pub command_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub program_name: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub ancillary_parameters: Map<String, Value>,
    /// Anything else the record carries
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecordedCommand {
    /// All parameter overrides: top-level keys first, then the nested groups
    pub fn overrides(&self) -> Map<String, Value> {
        let mut overrides = self.extra.clone();
        for (key, value) in self.ancillary_parameters.iter().chain(self.parameters.iter()) {
            overrides.insert(key.clone(), value.clone());
        }
        overrides
    }
}
