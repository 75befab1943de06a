//! Building command groups from an appliance's command schema
//!
//! ```text
//! payload
//! ├── settings        { description, protocolType, parameters... }   -> single command
//! ├── startProgram    { PROGRAMS.WM.COTTONS: {...}, ... }            -> categorized group
//! └── dictionaryId    "123"                                          -> additional data
//! ```
//!
//! After the groups are built, saved favourites are added as extra
//! categories and the most recent history entry of every command is replayed
//! so the model starts from what the user last sent.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::command::Command;
use crate::group::CommandGroup;
use crate::schema::{Favourite, HistoryEntry};
use crate::value::{scalar_text, ParamValue};

/// Short category name: `PROGRAMS.WM.COTTONS` -> `cottons`, others unchanged
pub fn clean_name(category: &str) -> String {
    if category.contains("PROGRAM") {
        category
            .rsplit('.')
            .next()
            .unwrap_or(category)
            .to_lowercase()
    } else {
        category.to_string()
    }
}

/// Result of loading a command schema
#[derive(Debug, Clone, Default)]
pub struct LoadedCommands {
    pub commands: BTreeMap<String, CommandGroup>,
    /// Top-level entries that are not commands
    pub additional_data: Map<String, Value>,
}

/// Loads commands, favourites and history in one go
///
/// ```rust
/// use hon_core::CommandLoader;
/// use serde_json::json;
///
/// let payload = json!({
///     "stopProgram": {"description": "stop", "protocolType": "raw", "parameters": {
///         "onOffStatus": {"typology": "fixed", "fixedValue": "0", "mandatory": 1}
///     }},
///     "dictionaryId": "42"
/// });
/// let loaded = CommandLoader::new(payload.as_object().unwrap()).load();
/// assert!(loaded.commands.contains_key("stopProgram"));
/// assert_eq!(loaded.additional_data["dictionaryId"], "42");
/// ```
pub struct CommandLoader<'a> {
    payload: &'a Map<String, Value>,
    favourites: &'a [Favourite],
    history: &'a [HistoryEntry],
}

impl<'a> CommandLoader<'a> {
    pub fn new(payload: &'a Map<String, Value>) -> Self {
        CommandLoader {
            payload,
            favourites: &[],
            history: &[],
        }
    }

    pub fn with_favourites(mut self, favourites: &'a [Favourite]) -> Self {
        self.favourites = favourites;
        self
    }

    pub fn with_history(mut self, history: &'a [HistoryEntry]) -> Self {
        self.history = history;
        self
    }

    pub fn load(self) -> LoadedCommands {
        let mut loaded = load_commands(self.payload);
        add_favourites(&mut loaded.commands, self.favourites);
        recover_last_command_states(&mut loaded.commands, self.history);
        loaded
    }
}

/// Turn every top-level schema entry into a command group or additional data
pub fn load_commands(payload: &Map<String, Value>) -> LoadedCommands {
    let mut loaded = LoadedCommands::default();
    for (name, data) in payload {
        match parse_group(name, data) {
            Some(group) => {
                log::debug!(
                    "Loaded command {} ({} categories)",
                    name,
                    group.category_names().count()
                );
                loaded.commands.insert(name.clone(), group);
            }
            None => {
                loaded.additional_data.insert(name.clone(), data.clone());
            }
        }
    }
    loaded
}

fn parse_group(name: &str, data: &Value) -> Option<CommandGroup> {
    let Value::Object(map) = data else {
        return None;
    };
    if Command::parseable(data) {
        return Some(CommandGroup::single(Command::from_schema(name, map, "")));
    }
    if map.is_empty() || !map.values().all(Command::parseable) {
        return None;
    }
    let categories = map
        .iter()
        .filter_map(|(category, schema)| {
            let schema = schema.as_object()?;
            Some((clean_name(category), Command::from_schema(name, schema, category)))
        })
        .collect();
    CommandGroup::categorized(name, categories)
}

/// Add each favourite as a category cloned from the program it was saved from
pub fn add_favourites(groups: &mut BTreeMap<String, CommandGroup>, favourites: &[Favourite]) {
    for favourite in favourites {
        let recorded = &favourite.command;
        if favourite.favourite_name.is_empty() {
            continue;
        }
        let Some(group) = groups.get_mut(&recorded.command_name) else {
            log::debug!(
                "Favourite {}: no command {}",
                favourite.favourite_name,
                recorded.command_name
            );
            continue;
        };
        let base_name = clean_name(&recorded.program_name);
        let Some(base) = group.category(&base_name).filter(|_| group.is_categorized()) else {
            log::debug!(
                "Favourite {}: no program {} in {}",
                favourite.favourite_name,
                base_name,
                recorded.command_name
            );
            continue;
        };

        let mut command = base.clone();
        command.update(&recorded.overrides());
        command.set_as_favourite();
        if let Some(program) = command.program_mut() {
            program.set_current(&favourite.favourite_name);
        }
        log::debug!("Added favourite {} based on {}", favourite.favourite_name, base_name);
        group.insert_category(&favourite.favourite_name, command);
    }
}

/// Replay the most recent history entry of every command
pub fn recover_last_command_states(
    groups: &mut BTreeMap<String, CommandGroup>,
    history: &[HistoryEntry],
) {
    for (name, group) in groups.iter_mut() {
        let Some(entry) = history.iter().find(|e| &e.command.command_name == name) else {
            continue;
        };
        let mut parameters = entry.command.parameters.clone();
        let program = parameters.remove("program").and_then(|v| scalar_text(&v));
        let category = parameters.remove("category").and_then(|v| scalar_text(&v));

        if group.is_categorized() {
            let selected = match program {
                Some(program) => Some(
                    program
                        .rsplit('.')
                        .next()
                        .unwrap_or(&program)
                        .to_lowercase(),
                ),
                None => category,
            };
            if let Some(selected) = selected {
                if group.category(&selected).is_some() {
                    if let Err(e) = group.select_category(&selected) {
                        log::debug!("History of {}: {}", name, e);
                    }
                }
            }
        }

        for (key, value) in &parameters {
            if group.active().parameter(key).is_none() {
                continue;
            }
            let Some(value) = ParamValue::from_json(value) else {
                continue;
            };
            if let Err(e) = group.set_value(key, value) {
                log::debug!("History of {}: {} skipped: {}", name, key, e);
            }
        }
    }
}
