//! Commands and the rule cascade
//!
//! A [`Command`] owns its parameters and rule sets. Rules are wired in two
//! phases: all parameters are created first, then [`Command::patch_rules`]
//! registers each rule as a trigger on its trigger parameter and fires the
//! ones whose trigger value is already current.
//!
//! Setting a value runs the cascade inline:
//!
//! ```text
//! set_value(key, v)
//!   └── parameter.set_value(v)            validate + assign
//!       └── fire(key, token)              rules registered for token
//!           └── apply(rule)               extras hold? -> effect on target
//!               └── fire(target, token')  only if the target changed
//! ```
//!
//! The chain of rules being applied is tracked so a schema whose rules feed
//! back into each other ends in [`CommandError::RuleCycle`] instead of
//! unbounded recursion.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::CommandError;
use crate::parameter::{FixedParameter, Parameter, ProgramParameter};
use crate::rules::{Rule, RuleEffect, RuleSet};
use crate::value::{tokens_match, ParamValue};

/// Maximum number of nested rule applications in one cascade
pub const MAX_CASCADE_DEPTH: usize = 64;

/// Schema keys that describe the command itself rather than a parameter group
const COMMAND_METADATA: [&str; 2] = ["description", "protocolType"];

/// Request groups not sent verbatim
const PROGRAM_RULES: &str = "programRules";

/// One executable command, or one category of a categorized command
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    category_name: String,
    parameters: BTreeMap<String, Parameter>,
    rules: Vec<RuleSet>,
    data: Map<String, Value>,
}

/// The parameters of a command as they are sent to the appliance
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    pub command_name: String,
    pub parameters: BTreeMap<String, String>,
    pub ancillary_parameters: BTreeMap<String, String>,
    /// Raw vendor category, empty for plain commands
    pub category_name: String,
}

impl CommandRequest {
    /// Program name as the appliance expects it in `startProgram` requests
    pub fn program_name(&self) -> String {
        self.category_name.to_uppercase()
    }
}

impl Command {
    /// Whether a schema entry describes a command
    pub fn parseable(data: &Value) -> bool {
        match data {
            Value::Object(map) => COMMAND_METADATA
                .iter()
                .all(|key| map.get(*key).is_some_and(|v| !v.is_null())),
            _ => false,
        }
    }

    /// Build a command from its schema and wire its rules.
    ///
    /// `category_name` is the raw vendor category (e.g. `PROGRAMS.WM.COTTONS`)
    /// for categorized commands and empty otherwise.
    pub fn from_schema(name: &str, schema: &Map<String, Value>, category_name: &str) -> Self {
        let mut command = Command {
            name: name.to_string(),
            category_name: category_name.to_string(),
            parameters: BTreeMap::new(),
            rules: Vec::new(),
            data: Map::new(),
        };

        for (group, items) in schema {
            if COMMAND_METADATA.contains(&group.as_str()) {
                continue;
            }
            match items {
                Value::Object(items) => {
                    for (key, leaf) in items {
                        command.create_parameter(group, key, leaf);
                    }
                }
                other => {
                    log::info!("Loading command {}: skipped {} = {}", name, group, other);
                }
            }
        }

        if !category_name.is_empty() {
            let key = if category_name.contains("PROGRAM") {
                "program"
            } else {
                "category"
            };
            command.parameters.insert(
                key.to_string(),
                Parameter::Program(ProgramParameter::new(key, category_name)),
            );
        }

        command.patch_rules();
        command
    }

    fn create_parameter(&mut self, group: &str, key: &str, leaf: &Value) {
        let Value::Object(schema) = leaf else {
            log::debug!("Command {}: {}.{} is not a parameter", self.name, group, key);
            self.data.insert(key.to_string(), leaf.clone());
            return;
        };

        if schema.get("category").and_then(Value::as_str) == Some("rule") {
            match (schema.get("fixedValue"), schema.get("enumValues")) {
                (Some(Value::Object(tree)), _) | (_, Some(Value::Object(tree))) => {
                    self.rules.push(RuleSet::parse(tree));
                }
                _ => log::warn!("Command {}: rule {} not supported", self.name, key),
            }
        }

        match Parameter::from_schema(key, group, schema) {
            Some(parameter) => {
                self.parameters.insert(key.to_string(), parameter);
            }
            None => {
                self.data.insert(key.to_string(), leaf.clone());
            }
        }
    }

    /// Register every rule as a trigger and fire the ones already satisfied
    pub fn patch_rules(&mut self) {
        for rules in self.rules.iter_mut() {
            rules.duplicate_for_extra_conditions();
        }

        let keys: Vec<String> = self.parameters.keys().cloned().collect();
        for key in keys {
            let rules: Vec<Arc<Rule>> = self
                .rules
                .iter()
                .flat_map(|set| set.rules_for(&key).iter().cloned())
                .collect();
            for rule in rules {
                let current = match self.parameters.get_mut(&key) {
                    Some(parameter) => {
                        parameter.add_trigger(rule.clone());
                        parameter.value().to_string()
                    }
                    None => continue,
                };
                if tokens_match(&current, &rule.trigger_value) {
                    let mut chain = Vec::new();
                    if let Err(e) = self.apply_rule(&rule, &mut chain) {
                        log::warn!("Command {}: {}", self.name, e);
                    }
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw vendor category this command stands for, empty if uncategorized
    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    pub fn parameters(&self) -> &BTreeMap<String, Parameter> {
        &self.parameters
    }

    pub fn parameter(&self, key: &str) -> Option<&Parameter> {
        self.parameters.get(key)
    }

    pub(crate) fn parameters_mut(&mut self) -> impl Iterator<Item = &mut Parameter> {
        self.parameters.values_mut()
    }

    /// Schema leaves that are not parameters
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn rules(&self) -> impl Iterator<Item = &Arc<Rule>> {
        self.rules.iter().flat_map(RuleSet::rules)
    }

    /// Program parameter (`program` or `category`) of a categorized command
    pub fn program(&self) -> Option<&ProgramParameter> {
        self.parameters.values().find_map(Parameter::as_program)
    }

    pub(crate) fn program_mut(&mut self) -> Option<&mut ProgramParameter> {
        self.parameters.values_mut().find_map(Parameter::as_program_mut)
    }

    pub fn is_favourite(&self) -> bool {
        self.parameters
            .get("favourite")
            .is_some_and(|p| p.value().to_string() == "1")
    }

    /// Program code of this category, if it declares one
    pub fn program_code(&self) -> Option<i64> {
        self.parameters
            .get("prCode")?
            .value()
            .as_number()
            .map(|code| code as i64)
    }

    /// Set a parameter and run the rule cascade
    pub fn set_value(
        &mut self,
        key: &str,
        value: impl Into<ParamValue>,
    ) -> Result<(), CommandError> {
        let value = value.into();
        let parameter = self
            .parameters
            .get_mut(key)
            .ok_or_else(|| CommandError::UnknownParameter(self.name.clone(), key.to_string()))?;
        if matches!(parameter, Parameter::Program(_)) {
            return Err(CommandError::CategorySelection(key.to_string()));
        }
        parameter.set_value(&value)?;
        let token = parameter.value().to_string();
        log::debug!("{}: {} = {}", self.name, key, token);

        let mut chain = Vec::new();
        self.fire(key, &token, &mut chain)
    }

    /// Adopt the state of another command's parameter and run the cascade
    pub fn sync_parameter(&mut self, key: &str, other: &Parameter) -> Result<(), CommandError> {
        let parameter = self
            .parameters
            .get_mut(key)
            .ok_or_else(|| CommandError::UnknownParameter(self.name.clone(), key.to_string()))?;
        parameter.sync(other)?;
        let token = parameter.value().to_string();

        let mut chain = Vec::new();
        self.fire(key, &token, &mut chain)
    }

    fn fire(
        &mut self,
        key: &str,
        token: &str,
        chain: &mut Vec<Arc<Rule>>,
    ) -> Result<(), CommandError> {
        let rules = match self.parameters.get(key) {
            Some(parameter) => parameter.triggers_for(token),
            None => return Ok(()),
        };
        for rule in rules {
            self.apply_rule(&rule, chain)?;
        }
        Ok(())
    }

    fn apply_rule(
        &mut self,
        rule: &Arc<Rule>,
        chain: &mut Vec<Arc<Rule>>,
    ) -> Result<(), CommandError> {
        if !self.extras_hold(rule) {
            log::trace!("{}: conditions of {} do not hold", self.name, rule);
            return Ok(());
        }
        let Some(target) = self.parameters.get_mut(&rule.param_key) else {
            return Ok(());
        };

        let outcome = match &rule.effect {
            RuleEffect::Fixed(value) => target.apply_fixed_value(&ParamValue::from(value.as_str())),
            effect @ RuleEffect::Enum { .. } => target.apply_rule(effect),
            RuleEffect::Other { .. } => Ok(false),
        };
        match outcome {
            Ok(true) => {
                let token = target.value().to_string();
                log::trace!("{}: {} sets {} = {}", self.name, rule, rule.param_key, token);
                // Only effects that changed their target get this far
                let repeated = chain.iter().any(|r| Arc::ptr_eq(r, rule));
                if repeated || chain.len() >= MAX_CASCADE_DEPTH {
                    return Err(CommandError::RuleCycle(
                        format!("{}={}", rule.trigger_key, rule.trigger_value),
                        rule.param_key.clone(),
                    ));
                }
                chain.push(rule.clone());
                let result = self.fire(&rule.param_key, &token, chain);
                chain.pop();
                result
            }
            Ok(false) => Ok(()),
            Err(e) => {
                log::debug!("{}: rule {} not applied: {}", self.name, rule, e);
                Ok(())
            }
        }
    }

    fn extras_hold(&self, rule: &Rule) -> bool {
        rule.extras.iter().all(|(key, expected)| {
            self.parameters
                .get(key)
                .is_some_and(|p| tokens_match(&p.value().to_string(), expected))
        })
    }

    /// Apply overriding values, skipping anything unknown or rejected
    pub fn update(&mut self, overrides: &Map<String, Value>) {
        for (key, value) in overrides {
            if let Value::Object(nested) = value {
                self.update(nested);
                continue;
            }
            if !self.parameters.contains_key(key) || self.is_program_key(key) {
                continue;
            }
            let Some(value) = ParamValue::from_json(value) else {
                continue;
            };
            if let Err(e) = self.set_value(key, value) {
                log::debug!("{}: override {} skipped: {}", self.name, key, e);
            }
        }
    }

    fn is_program_key(&self, key: &str) -> bool {
        matches!(self.parameters.get(key), Some(Parameter::Program(_)))
    }

    /// Mark this command as a favourite
    pub fn set_as_favourite(&mut self) {
        self.parameters.insert(
            "favourite".to_string(),
            Parameter::Fixed(FixedParameter::new("favourite", "custom", "1")),
        );
    }

    /// Restore every parameter to its schema state
    pub fn reset(&mut self) {
        for parameter in self.parameters.values_mut() {
            parameter.reset();
        }
    }

    /// Intern values per request group
    pub fn parameter_groups(&self) -> BTreeMap<String, BTreeMap<String, String>> {
        self.grouped(|_| true)
    }

    /// Intern values per request group, mandatory parameters only
    pub fn mandatory_parameter_groups(&self) -> BTreeMap<String, BTreeMap<String, String>> {
        self.grouped(Parameter::is_mandatory)
    }

    fn grouped(
        &self,
        include: impl Fn(&Parameter) -> bool,
    ) -> BTreeMap<String, BTreeMap<String, String>> {
        let mut groups: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for (key, parameter) in self.parameters.iter().filter(|(_, p)| include(p)) {
            groups
                .entry(parameter.group().to_string())
                .or_default()
                .insert(key.clone(), parameter.intern_value());
        }
        groups
    }

    /// Current user-facing values
    pub fn parameter_values(&self) -> BTreeMap<String, ParamValue> {
        self.parameters
            .iter()
            .map(|(key, parameter)| (key.clone(), parameter.value()))
            .collect()
    }

    /// The request sent for this command
    pub fn request(&self, only_mandatory: bool) -> CommandRequest {
        let groups = if only_mandatory {
            self.mandatory_parameter_groups()
        } else {
            self.parameter_groups()
        };
        let mut parameters = groups.get("parameters").cloned().unwrap_or_default();
        let mut ancillary_parameters = self
            .parameter_groups()
            .remove("ancillaryParameters")
            .unwrap_or_default();
        ancillary_parameters.remove(PROGRAM_RULES);
        if parameters.contains_key("prStr") && !self.category_name.is_empty() {
            parameters.insert("prStr".to_string(), self.category_name.to_uppercase());
        }
        CommandRequest {
            command_name: self.name.clone(),
            parameters,
            ancillary_parameters,
            category_name: self.category_name.clone(),
        }
    }

    /// The request for a chosen set of parameters plus all mandatory ones
    pub fn request_specific(&self, keys: &[&str]) -> CommandRequest {
        let parameters = self
            .parameters
            .iter()
            .filter(|(key, p)| keys.contains(&key.as_str()) || p.is_mandatory())
            .filter(|(_, p)| !matches!(p, Parameter::Program(_)))
            .map(|(key, p)| (key.clone(), p.intern_value()))
            .collect();
        CommandRequest {
            command_name: self.name.clone(),
            parameters,
            ancillary_parameters: BTreeMap::new(),
            category_name: self.category_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn command(schema: Value) -> Command {
        Command::from_schema("startProgram", schema.as_object().unwrap(), "PROGRAMS.WM.COTTONS")
    }

    fn washing_schema() -> Value {
        json!({
            "description": "Cotton program",
            "protocolType": "RAW",
            "parameters": {
                "prCode": {"typology": "fixed", "fixedValue": "1", "mandatory": 1},
                "prStr": {"typology": "fixed", "fixedValue": "Cottons", "mandatory": 1},
                "mode": {
                    "typology": "enum", "enumValues": ["0", "1"],
                    "defaultValue": "0", "mandatory": 1
                },
                "tempLevel": {
                    "typology": "range", "minimumValue": "0", "maximumValue": "30",
                    "incrementValue": "10", "defaultValue": "20", "mandatory": 1
                },
                "delay": {
                    "typology": "range", "minimumValue": "0", "maximumValue": "60",
                    "incrementValue": "30"
                }
            },
            "ancillaryParameters": {
                "programRules": {
                    "category": "rule",
                    "typology": "fixed",
                    "fixedValue": {"tempLevel": {"@mode": {"1": {"fixedValue": "40"}}}}
                },
                "energyLabel": {"typology": "fixed", "fixedValue": "A"},
                "note": "plain text"
            }
        })
    }

    #[test]
    fn test_parseable() {
        assert!(Command::parseable(&json!({"description": "x", "protocolType": "y"})));
        assert!(!Command::parseable(&json!({"description": "x"})));
        assert!(!Command::parseable(&json!({"description": "x", "protocolType": null})));
        assert!(!Command::parseable(&json!("x")));
    }

    #[test]
    fn test_load_parameters() {
        let command = command(washing_schema());
        assert_eq!(command.name(), "startProgram");
        assert!(command.parameter("tempLevel").is_some());
        assert_eq!(command.parameter("program").map(Parameter::kind_name), Some("program"));
        assert_eq!(command.program().map(|p| p.value()), Some("cottons"));
        assert_eq!(command.data().get("note"), Some(&json!("plain text")));
        assert_eq!(command.rules().count(), 1);
        assert_eq!(command.program_code(), Some(1));
    }

    #[test]
    fn test_rule_propagation() {
        let mut command = command(washing_schema());
        command.set_value("mode", "1").unwrap();
        let temp = command.parameter("tempLevel").and_then(Parameter::as_range).unwrap();
        assert_eq!(temp.value(), 40.0);
        assert_eq!(temp.max(), 40.0);
        assert_eq!(temp.min(), 0.0);
    }

    #[test]
    fn test_eager_firing() {
        let mut schema = washing_schema();
        schema["parameters"]["mode"]["defaultValue"] = json!("1");
        let command = command(schema);
        assert_eq!(command.parameter("tempLevel").unwrap().value(), ParamValue::Number(40.0));
    }

    #[test]
    fn test_identical_set_refires() {
        let mut command = command(washing_schema());
        command.set_value("mode", "1").unwrap();
        command.set_value("tempLevel", 20).unwrap();
        command.set_value("mode", "1").unwrap();
        assert_eq!(command.parameter("tempLevel").unwrap().value(), ParamValue::Number(40.0));
    }

    #[test]
    fn test_unknown_and_program_keys() {
        let mut command = command(washing_schema());
        assert_eq!(
            command.set_value("spin", 800),
            Err(CommandError::UnknownParameter("startProgram".into(), "spin".into()))
        );
        assert_eq!(
            command.set_value("program", "eco"),
            Err(CommandError::CategorySelection("program".into()))
        );
        assert!(matches!(command.set_value("delay", 45), Err(CommandError::Validation(_))));
    }

    #[test]
    fn test_multi_condition_rule() {
        let schema = json!({
            "description": "d", "protocolType": "p",
            "parameters": {
                "mode": {"typology": "enum", "enumValues": ["0", "1"], "defaultValue": "0"},
                "dry": {"typology": "enum", "enumValues": ["0", "2"], "defaultValue": "0"},
                "temp": {
                    "typology": "range", "minimumValue": 20, "maximumValue": 60,
                    "incrementValue": 10, "defaultValue": 40
                }
            },
            "ancillaryParameters": {
                "programRules": {"category": "rule", "typology": "fixed", "fixedValue": {
                    "temp": {"@mode": {"1": {"@dry": {"2": {"fixedValue": "30"}}}}}
                }}
            }
        });
        let mut first = command(schema.clone());
        first.set_value("mode", "1").unwrap();
        assert_eq!(first.parameter("temp").unwrap().value(), ParamValue::Number(40.0));
        first.set_value("dry", "2").unwrap();
        assert_eq!(first.parameter("temp").unwrap().value(), ParamValue::Number(30.0));

        // Same result when the other prerequisite changes last
        let mut second = command(schema);
        second.set_value("dry", "2").unwrap();
        assert_eq!(second.parameter("temp").unwrap().value(), ParamValue::Number(40.0));
        second.set_value("mode", "1").unwrap();
        assert_eq!(second.parameter("temp").unwrap().value(), ParamValue::Number(30.0));
    }

    #[test]
    fn test_rule_cycle() {
        let schema = json!({
            "description": "d", "protocolType": "p",
            "parameters": {
                "a": {"typology": "range", "minimumValue": 0, "maximumValue": 9, "defaultValue": 0},
                "b": {"typology": "range", "minimumValue": 0, "maximumValue": 9, "defaultValue": 0}
            },
            "ancillaryParameters": {
                "programRules": {"category": "rule", "typology": "fixed", "fixedValue": {
                    "b": {"@a": {"1": {"fixedValue": "1"}}},
                    "a": {"@b": {"1": {"fixedValue": "1"}}}
                }}
            }
        });
        let mut command = command(schema);
        assert!(matches!(command.set_value("a", 1), Err(CommandError::RuleCycle(..))));
        assert_eq!(command.parameter("b").unwrap().value(), ParamValue::Number(1.0));
    }

    #[test]
    fn test_mutually_narrowing_enums_settle() {
        let schema = json!({
            "description": "d", "protocolType": "p",
            "parameters": {
                "mode": {"typology": "enum", "enumValues": ["0", "1"], "defaultValue": "0"},
                "dry": {"typology": "enum", "enumValues": ["0", "1"], "defaultValue": "0"}
            },
            "ancillaryParameters": {
                "programRules": {"category": "rule", "typology": "fixed", "fixedValue": {
                    "dry": {"@mode": {"1": {"fixedValue": "1"}}},
                    "mode": {"@dry": {"1": {"fixedValue": "1"}}}
                }}
            }
        });
        let mut command = command(schema);
        assert_eq!(command.set_value("mode", "1"), Ok(()));
        assert_eq!(command.parameter("dry").unwrap().values(), vec!["1"]);
        assert_eq!(command.parameter("mode").unwrap().values(), vec!["1"]);
    }

    #[test]
    fn test_self_targeting_rule_settles() {
        let schema = json!({
            "description": "d", "protocolType": "p",
            "parameters": {
                "mode": {"typology": "enum", "enumValues": ["0", "1"], "defaultValue": "0"}
            },
            "ancillaryParameters": {
                "programRules": {"category": "rule", "typology": "fixed", "fixedValue": {
                    "mode": {"@mode": {"1": {"fixedValue": "1"}}}
                }}
            }
        });
        let mut lazy = command(schema.clone());
        assert_eq!(lazy.set_value("mode", "1"), Ok(()));
        assert_eq!(lazy.parameter("mode").unwrap().value(), ParamValue::from("1"));

        // Eager firing at load settles the same way
        let mut schema = schema;
        schema["parameters"]["mode"]["defaultValue"] = json!("1");
        let eager = command(schema);
        assert_eq!(eager.parameter("mode").unwrap().values(), vec!["1"]);
    }

    #[test]
    fn test_failing_effect_is_skipped() {
        let schema = json!({
            "description": "d", "protocolType": "p",
            "parameters": {
                "mode": {"typology": "enum", "enumValues": ["0", "1"], "defaultValue": "0"},
                "temp": {
                    "typology": "range", "minimumValue": 20, "maximumValue": 60,
                    "incrementValue": 10, "defaultValue": 40
                }
            },
            "ancillaryParameters": {
                "programRules": {"category": "rule", "typology": "fixed", "fixedValue": {
                    "temp": {"@mode": {"1": {"fixedValue": "hot"}}}
                }}
            }
        });
        let mut command = command(schema);
        command.set_value("mode", "1").unwrap();
        assert_eq!(command.parameter("temp").unwrap().value(), ParamValue::Number(40.0));
    }

    #[test]
    fn test_request() {
        let mut command = command(washing_schema());
        command.set_value("delay", 30).unwrap();

        let request = command.request(false);
        assert_eq!(
            request.parameters.get("prStr").map(String::as_str),
            Some("PROGRAMS.WM.COTTONS")
        );
        assert_eq!(request.parameters.get("delay").map(String::as_str), Some("30"));
        assert!(!request.parameters.contains_key("program"));
        assert!(!request.ancillary_parameters.contains_key("programRules"));
        assert_eq!(request.ancillary_parameters.get("energyLabel").map(String::as_str), Some("A"));

        let mandatory = command.request(true);
        assert!(!mandatory.parameters.contains_key("delay"));
        assert!(mandatory.parameters.contains_key("tempLevel"));
        assert_eq!(mandatory.ancillary_parameters, request.ancillary_parameters);
        assert_eq!(request.program_name(), "PROGRAMS.WM.COTTONS");

        let specific = command.request_specific(&["delay"]);
        assert!(specific.parameters.contains_key("delay"));
        assert!(specific.parameters.contains_key("mode"));
        assert!(specific.ancillary_parameters.is_empty());
    }

    #[test]
    fn test_update_and_favourite() {
        let mut command = command(washing_schema());
        command.update(json!({
            "commandName": "startProgram",
            "parameters": {"delay": "30", "tempLevel": "25", "unknown": "1"},
            "mode": 1
        }).as_object().unwrap());
        assert_eq!(command.parameter("delay").unwrap().value(), ParamValue::Number(30.0));
        assert_eq!(command.parameter("mode").unwrap().value(), ParamValue::from("1"));
        // Rule from mode=1 applied, the invalid 25 was skipped
        assert_eq!(command.parameter("tempLevel").unwrap().value(), ParamValue::Number(40.0));

        assert!(!command.is_favourite());
        command.set_as_favourite();
        assert!(command.is_favourite());
        assert_eq!(command.parameter("favourite").unwrap().group(), "custom");

        command.reset();
        assert_eq!(command.parameter("delay").unwrap().value(), ParamValue::Number(0.0));
    }

    #[test]
    fn test_parameter_groups() {
        let command = command(washing_schema());
        let groups = command.parameter_groups();
        assert_eq!(groups["parameters"]["tempLevel"], "20");
        assert_eq!(groups["custom"]["program"], "cottons");
        assert!(groups["ancillaryParameters"].contains_key("programRules"));
        let mandatory = command.mandatory_parameter_groups();
        assert!(!mandatory["parameters"].contains_key("delay"));
    }
}
