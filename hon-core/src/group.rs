//! Command groups
//!
//! Some commands (typically `startProgram`) come in one variant per program
//! or category. A [`CommandGroup`] holds all variants and an active index;
//! the synthetic `program`/`category` parameter of the active command is the
//! switch between them. A plain command is a group with a single entry.

use std::collections::{BTreeMap, BTreeSet};

use crate::command::Command;
use crate::error::CommandError;
use crate::parameter::Parameter;
use crate::value::{tokens_match, ParamValue};

/// Category name used for the single entry of an uncategorized group
pub const UNCATEGORIZED: &str = "_";

/// Category selected by default when present
pub const DEFAULT_CATEGORY: &str = "setParameters";

#[derive(Debug, Clone)]
pub struct CommandGroup {
    name: String,
    categories: Vec<(String, Command)>,
    active: usize,
    categorized: bool,
}

impl CommandGroup {
    pub fn single(command: Command) -> Self {
        CommandGroup {
            name: command.name().to_string(),
            categories: vec![(UNCATEGORIZED.to_string(), command)],
            active: 0,
            categorized: false,
        }
    }

    /// A group of categories; `None` when there are none
    pub fn categorized(name: &str, categories: Vec<(String, Command)>) -> Option<Self> {
        if categories.is_empty() {
            return None;
        }
        let active = categories
            .iter()
            .position(|(category, _)| category == DEFAULT_CATEGORY)
            .unwrap_or(0);
        let mut group = CommandGroup {
            name: name.to_string(),
            categories,
            active,
            categorized: true,
        };
        group.refresh_programs();
        Some(group)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_categorized(&self) -> bool {
        self.categorized
    }

    /// The command currently in effect
    pub fn active(&self) -> &Command {
        &self.categories[self.active].1
    }

    pub fn active_mut(&mut self) -> &mut Command {
        &mut self.categories[self.active].1
    }

    pub fn active_category(&self) -> &str {
        &self.categories[self.active].0
    }

    pub fn category(&self, name: &str) -> Option<&Command> {
        self.categories
            .iter()
            .find(|(category, _)| category == name)
            .map(|(_, command)| command)
    }

    pub fn category_mut(&mut self, name: &str) -> Option<&mut Command> {
        self.categories
            .iter_mut()
            .find(|(category, _)| category == name)
            .map(|(_, command)| command)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(name, _)| name.as_str())
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &Command)> {
        self.categories.iter().map(|(name, command)| (name.as_str(), command))
    }

    /// Make another category the active one
    pub fn select_category(&mut self, name: &str) -> Result<(), CommandError> {
        let index = self
            .categories
            .iter()
            .position(|(category, _)| category == name)
            .or_else(|| {
                self.categories
                    .iter()
                    .position(|(category, _)| tokens_match(category, name))
            })
            .ok_or_else(|| CommandError::UnknownCategory(self.name.clone(), name.to_string()))?;
        if index != self.active {
            log::debug!(
                "{}: category {} -> {}",
                self.name,
                self.active_category(),
                self.categories[index].0
            );
        }
        self.active = index;
        Ok(())
    }

    /// Add or replace a category and refresh the program lists
    pub fn insert_category(&mut self, name: &str, command: Command) {
        match self.categories.iter_mut().find(|(category, _)| category == name) {
            Some((_, existing)) => *existing = command,
            None => self.categories.push((name.to_string(), command)),
        }
        self.refresh_programs();
    }

    /// Set a value on the active command; the program parameter switches category
    pub fn set_value(
        &mut self,
        key: &str,
        value: impl Into<ParamValue>,
    ) -> Result<(), CommandError> {
        let value = value.into();
        if let Some(Parameter::Program(program)) = self.active().parameter(key) {
            let name = program.resolve(&value)?;
            return self.select_category(&name);
        }
        self.active_mut().set_value(key, value)
    }

    /// Program code to category name, without favourites and `iot_` categories
    pub fn program_ids(&self) -> BTreeMap<i64, String> {
        self.categories
            .iter()
            .filter(|(name, command)| !name.contains("iot_") && !command.is_favourite())
            .filter_map(|(name, command)| Some((command.program_code()?, name.clone())))
            .collect()
    }

    fn refresh_programs(&mut self) {
        let names: Vec<String> = self.categories.iter().map(|(name, _)| name.clone()).collect();
        let ids = self.program_ids();
        for (_, command) in self.categories.iter_mut() {
            for parameter in command.parameters_mut() {
                if let Parameter::Program(program) = parameter {
                    program.refresh(names.clone(), ids.clone());
                }
            }
        }
    }

    /// Union of the parameter keys of all categories
    pub fn setting_keys(&self) -> BTreeSet<String> {
        self.categories
            .iter()
            .flat_map(|(_, command)| command.parameters().keys().cloned())
            .collect()
    }

    /// For each key, the parameter offering the most choices across categories
    pub fn available_settings(&self) -> BTreeMap<String, &Parameter> {
        let mut settings: BTreeMap<String, &Parameter> = BTreeMap::new();
        for (_, command) in &self.categories {
            for (key, parameter) in command.parameters() {
                let best = match settings.get(key).copied() {
                    Some(current) => current.more_options(parameter),
                    None => parameter,
                };
                settings.insert(key.clone(), best);
            }
        }
        settings
    }

    pub fn reset(&mut self) {
        for (_, command) in self.categories.iter_mut() {
            command.reset();
        }
    }
}
