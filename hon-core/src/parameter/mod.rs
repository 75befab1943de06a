//! Typed command parameters
//!
//! Every key in a command schema that declares a `typology` becomes a
//! [`Parameter`]. The variants share a [`ParameterBase`] with identity,
//! metadata and the trigger table; value semantics differ per kind:
//!
//! | Kind    | Value            | Allowed values                    |
//! |---------|------------------|-----------------------------------|
//! | Fixed   | text             | exactly the current value         |
//! | Range   | number           | `min..=max` in `step` increments  |
//! | Enum    | normalized token | schema list (+ default)           |
//! | Program | category name    | categories of the command group   |

mod enumeration;
mod fixed;
mod program;
mod range;

pub use enumeration::EnumParameter;
pub use fixed::FixedParameter;
pub use program::{ProgramParameter, PROGRAM_FILTER};
pub use range::{RangeParameter, MAX_LISTED_VALUES};

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::rules::{Rule, RuleEffect};
use crate::value::{clean_token, tokens_match, ParamValue};

/// Rules indexed by the trigger value that fires them
#[derive(Debug, Clone, Default)]
pub struct Triggers {
    table: BTreeMap<String, Vec<Arc<Rule>>>,
}

impl Triggers {
    pub fn add(&mut self, rule: Arc<Rule>) {
        self.table
            .entry(clean_token(&rule.trigger_value))
            .or_default()
            .push(rule);
    }

    /// Rules registered for a value token, in registration order
    pub fn matching(&self, token: &str) -> Vec<Arc<Rule>> {
        self.table
            .iter()
            .filter(|(value, _)| tokens_match(value, token))
            .flat_map(|(_, rules)| rules.iter().cloned())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Arc<Rule>>)> {
        self.table.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Identity and metadata shared by all parameter kinds
#[derive(Debug, Clone, Default)]
pub struct ParameterBase {
    pub key: String,
    /// Request section the parameter belongs to, e.g. `parameters`
    pub group: String,
    pub category: String,
    pub typology: String,
    pub mandatory: i64,
    pub triggers: Triggers,
}

impl ParameterBase {
    pub fn from_schema(key: &str, group: &str, schema: &Map<String, Value>) -> Self {
        let mandatory = match schema.get("mandatory") {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
            Some(Value::Bool(b)) => *b as i64,
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        };
        ParameterBase {
            key: key.to_string(),
            group: group.to_string(),
            category: schema
                .get("category")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            typology: schema
                .get("typology")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            mandatory,
            triggers: Triggers::default(),
        }
    }

    pub fn new(key: &str, group: &str, typology: &str) -> Self {
        ParameterBase {
            key: key.to_string(),
            group: group.to_string(),
            typology: typology.to_string(),
            ..Default::default()
        }
    }
}

/// A typed parameter of a command
#[derive(Debug, Clone)]
pub enum Parameter {
    Fixed(FixedParameter),
    Range(RangeParameter),
    Enum(EnumParameter),
    Program(ProgramParameter),
}

/// Serializable view of a parameter, used for dumps and diagnostics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSnapshot {
    pub key: String,
    pub group: String,
    pub typology: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    pub mandatory: bool,
    pub value: ParamValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

impl Parameter {
    /// Build a parameter from its schema entry; `None` for unknown typologies
    pub fn from_schema(key: &str, group: &str, schema: &Map<String, Value>) -> Option<Self> {
        match schema.get("typology").and_then(Value::as_str)? {
            "range" => Some(Parameter::Range(RangeParameter::from_schema(key, group, schema))),
            "enum" => Some(Parameter::Enum(EnumParameter::from_schema(key, group, schema))),
            "fixed" => Some(Parameter::Fixed(FixedParameter::from_schema(key, group, schema))),
            _ => None,
        }
    }

    pub fn base(&self) -> &ParameterBase {
        match self {
            Parameter::Fixed(p) => &p.base,
            Parameter::Range(p) => &p.base,
            Parameter::Enum(p) => &p.base,
            Parameter::Program(p) => &p.base,
        }
    }

    fn base_mut(&mut self) -> &mut ParameterBase {
        match self {
            Parameter::Fixed(p) => &mut p.base,
            Parameter::Range(p) => &mut p.base,
            Parameter::Enum(p) => &mut p.base,
            Parameter::Program(p) => &mut p.base,
        }
    }

    pub fn key(&self) -> &str {
        &self.base().key
    }

    pub fn group(&self) -> &str {
        &self.base().group
    }

    pub fn category(&self) -> &str {
        &self.base().category
    }

    pub fn typology(&self) -> &str {
        &self.base().typology
    }

    pub fn mandatory(&self) -> i64 {
        self.base().mandatory
    }

    pub fn is_mandatory(&self) -> bool {
        self.base().mandatory != 0
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Parameter::Fixed(_) => "fixed",
            Parameter::Range(_) => "range",
            Parameter::Enum(_) => "enum",
            Parameter::Program(_) => "program",
        }
    }

    /// Current value in its user-facing form
    pub fn value(&self) -> ParamValue {
        match self {
            Parameter::Fixed(p) => p.value(),
            Parameter::Range(p) => ParamValue::Number(p.value()),
            Parameter::Enum(p) => ParamValue::Text(p.value()),
            Parameter::Program(p) => ParamValue::Text(p.value().to_string()),
        }
    }

    /// Current value as sent to the appliance
    pub fn intern_value(&self) -> String {
        match self {
            Parameter::Fixed(p) => p.intern_value(),
            Parameter::Range(p) => p.intern_value(),
            Parameter::Enum(p) => p.intern_value(),
            Parameter::Program(p) => p.value().to_string(),
        }
    }

    /// Allowed values as strings
    pub fn values(&self) -> Vec<String> {
        match self {
            Parameter::Fixed(p) => vec![p.value().to_string()],
            Parameter::Range(p) => p.values(),
            Parameter::Enum(p) => p.values(),
            Parameter::Program(p) => p.values(),
        }
    }

    /// Number of allowed values, without materializing them for ranges
    pub fn value_count(&self) -> usize {
        match self {
            Parameter::Range(p) => p.value_count(),
            other => other.values().len(),
        }
    }

    /// Validate and assign a value. Program parameters only validate membership,
    /// switching the category is up to the command group.
    pub fn set_value(&mut self, value: &ParamValue) -> Result<(), ValidationError> {
        match self {
            Parameter::Fixed(p) => {
                p.set_value(value);
                Ok(())
            }
            Parameter::Range(p) => p.set_value(value),
            Parameter::Enum(p) => p.set_value(value),
            Parameter::Program(p) => p.resolve(value).map(|_| ()),
        }
    }

    /// Apply a forced value from a rule. Returns whether anything changed.
    pub fn apply_fixed_value(&mut self, value: &ParamValue) -> Result<bool, ValidationError> {
        match self {
            Parameter::Fixed(p) => Ok(p.apply_fixed_value(value)),
            Parameter::Range(p) => p.apply_fixed_value(value),
            Parameter::Enum(p) => Ok(p.apply_fixed_value(value)),
            Parameter::Program(p) => {
                log::debug!("Program parameter {} ignores fixed value {}", p.base.key, value);
                Ok(false)
            }
        }
    }

    /// Apply a rule effect. Returns whether anything changed.
    pub fn apply_rule(&mut self, effect: &RuleEffect) -> Result<bool, ValidationError> {
        if let RuleEffect::Fixed(value) = effect {
            return self.apply_fixed_value(&ParamValue::from(value.as_str()));
        }
        match (self, effect) {
            (Parameter::Enum(p), RuleEffect::Enum { values, default }) => {
                p.apply_rule(values.as_deref(), default.as_deref())
            }
            (parameter, effect) => {
                log::debug!("Parameter {} ignores rule effect {:?}", parameter.key(), effect);
                Ok(false)
            }
        }
    }

    /// Adopt the state of the same parameter from another command
    pub fn sync(&mut self, other: &Parameter) -> Result<(), ValidationError> {
        match (self, other) {
            (Parameter::Range(p), Parameter::Range(o)) => {
                p.sync_from(o);
                Ok(())
            }
            (Parameter::Range(p), _) => p.collapse(&other.value()),
            (Parameter::Enum(p), Parameter::Enum(_) | Parameter::Program(_)) => {
                p.sync_from(&other.values(), &other.value().to_string());
                Ok(())
            }
            (Parameter::Fixed(p), _) => {
                p.set_value(&other.value());
                Ok(())
            }
            (p, o) => Err(ValidationError::IncompatibleSync(
                p.key().to_string(),
                p.kind_name(),
                o.kind_name(),
            )),
        }
    }

    /// Whichever of the two parameters offers more choices.
    ///
    /// A fixed parameter offers no choice and always loses; otherwise `other`
    /// wins only with strictly more values.
    pub fn more_options<'a>(&'a self, other: &'a Parameter) -> &'a Parameter {
        match (self, other) {
            (Parameter::Fixed(_), _) => other,
            (_, Parameter::Fixed(_)) => self,
            _ if other.value_count() > self.value_count() => other,
            _ => self,
        }
    }

    /// Restore the schema state
    pub fn reset(&mut self) {
        match self {
            Parameter::Fixed(p) => p.reset(),
            Parameter::Range(p) => p.reset(),
            Parameter::Enum(p) => p.reset(),
            Parameter::Program(_) => {}
        }
    }

    pub fn add_trigger(&mut self, rule: Arc<Rule>) {
        self.base_mut().triggers.add(rule);
    }

    /// Rules to fire when this parameter takes the given value
    pub fn triggers_for(&self, token: &str) -> Vec<Arc<Rule>> {
        self.base().triggers.matching(token)
    }

    /// Nested summary `value -> [extra -> extra value ->] target -> effect value`
    pub fn triggers_summary(&self) -> Map<String, Value> {
        let mut summary = Map::new();
        for (value, rules) in self.base().triggers.iter() {
            for rule in rules {
                let mut path = vec![value.clone()];
                for (key, extra) in &rule.extras {
                    path.push(key.clone());
                    path.push(extra.clone());
                }
                insert_path(
                    &mut summary,
                    &path,
                    &rule.param_key,
                    Value::String(rule.effect.summary_value()),
                );
            }
        }
        summary
    }

    pub fn snapshot(&self) -> ParameterSnapshot {
        let (min, max, step, values) = match self {
            Parameter::Range(p) => (Some(p.min()), Some(p.max()), Some(p.step()), None),
            Parameter::Fixed(_) => (None, None, None, None),
            other => (None, None, None, Some(other.values())),
        };
        ParameterSnapshot {
            key: self.key().to_string(),
            group: self.group().to_string(),
            typology: self.kind_name().to_string(),
            category: self.category().to_string(),
            mandatory: self.is_mandatory(),
            value: self.value(),
            min,
            max,
            step,
            values,
        }
    }

    pub fn as_range(&self) -> Option<&RangeParameter> {
        match self {
            Parameter::Range(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumParameter> {
        match self {
            Parameter::Enum(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_program(&self) -> Option<&ProgramParameter> {
        match self {
            Parameter::Program(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_program_mut(&mut self) -> Option<&mut ProgramParameter> {
        match self {
            Parameter::Program(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Range(p) => write!(
                f,
                "{} = {} [{}..{} / {}]",
                p.base.key,
                self.value(),
                p.min(),
                p.max(),
                p.step()
            ),
            Parameter::Fixed(_) => write!(f, "{} = {} (fixed)", self.key(), self.value()),
            _ => write!(f, "{} = {} {:?}", self.key(), self.value(), self.values()),
        }
    }
}

fn insert_path(map: &mut Map<String, Value>, path: &[String], leaf_key: &str, leaf: Value) {
    match path.split_first() {
        None => {
            map.insert(leaf_key.to_string(), leaf);
        }
        Some((head, rest)) => {
            let slot = map
                .entry(head.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(child) = slot {
                insert_path(child, rest, leaf_key, leaf);
            } else {
                let mut child = Map::new();
                insert_path(&mut child, rest, leaf_key, leaf);
                *slot = Value::Object(child);
            }
        }
    }
}
