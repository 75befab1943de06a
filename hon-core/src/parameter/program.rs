use std::collections::BTreeMap;

use super::ParameterBase;
use crate::error::ValidationError;
use crate::loader::clean_name;
use crate::value::{tokens_match, ParamValue};

/// Category names hidden from the selectable programs
pub const PROGRAM_FILTER: [&str; 2] = ["iot_recipe", "iot_guided"];

/// Synthetic parameter selecting the active category of a command group
///
/// Its value is the category the owning command stands for. The list of
/// selectable categories and the program-code map are refreshed by the group
/// whenever categories are added.
#[derive(Debug, Clone)]
pub struct ProgramParameter {
    pub(crate) base: ParameterBase,
    value: String,
    programs: Vec<String>,
    ids: BTreeMap<i64, String>,
}

impl ProgramParameter {
    /// `key` is `program` or `category`, `category` the raw vendor name
    pub fn new(key: &str, category: &str) -> Self {
        ProgramParameter {
            base: ParameterBase::new(key, "custom", "enum"),
            value: clean_name(category),
            programs: Vec::new(),
            ids: BTreeMap::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Rename the category this parameter stands for, used for favourites
    pub fn set_current(&mut self, name: &str) {
        self.value = name.to_string();
    }

    /// Selectable categories, sorted, without recipe and guided entries
    pub fn values(&self) -> Vec<String> {
        let mut values: Vec<String> = self
            .programs
            .iter()
            .filter(|name| !PROGRAM_FILTER.iter().any(|hidden| name.contains(hidden)))
            .cloned()
            .collect();
        values.sort();
        values
    }

    /// Program code to category name, excluding favourites and `iot_` entries
    pub fn ids(&self) -> &BTreeMap<i64, String> {
        &self.ids
    }

    /// Name of the category a value selects
    pub fn resolve(&self, value: &ParamValue) -> Result<String, ValidationError> {
        let wanted = value.to_string();
        self.programs
            .iter()
            .find(|name| **name == wanted)
            .or_else(|| self.programs.iter().find(|name| tokens_match(name, &wanted)))
            .cloned()
            .ok_or_else(|| {
                ValidationError::NotAllowed(self.base.key.clone(), wanted, self.values())
            })
    }

    pub(crate) fn refresh(&mut self, programs: Vec<String>, ids: BTreeMap<i64, String>) {
        self.programs = programs;
        self.ids = ids;
    }
}
