//! Program rules
//!
//! A command schema can carry a `programRules` entry: a nested map that says
//! "when parameter A takes value X (and B is Y), constrain parameter C".
//!
//! ```text
//! programRules.fixedValue
//! └── tempLevel                      <- target parameter
//!     └── @mode                      <- trigger parameter
//!         ├── "1"                    -> { fixedValue: "40" }          rule
//!         └── "2|3"                  -> { typology: enum, ... }       one rule per alternative
//!         └── "4"                    -> { @spinSpeed: { "0": ... } }  nested, becomes an extra
//! ```
//!
//! Parsing flattens the tree into [`Rule`] values. A rule fires when its
//! trigger parameter takes the trigger value, and is applied only if every
//! extra condition also holds on the current command state.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::value::{scalar_text, text_field};

/// What a rule does to its target parameter
#[derive(Debug, Clone, PartialEq)]
pub enum RuleEffect {
    /// Force the target to a single value
    Fixed(String),
    /// Replace the allowed values and/or the current value of an enum
    Enum {
        /// `|`-separated list of allowed values
        values: Option<String>,
        default: Option<String>,
    },
    /// Any other typology; recorded but not applied
    Other { default: Option<String> },
}

impl RuleEffect {
    fn from_payload(data: &Map<String, Value>) -> Self {
        if let Some(fixed) = text_field(data, "fixedValue").filter(|v| !v.is_empty()) {
            return RuleEffect::Fixed(fixed);
        }
        let default = text_field(data, "defaultValue").filter(|v| !v.is_empty());
        let typology = data.get("typology").and_then(Value::as_str).unwrap_or_else(|| {
            if data.contains_key("enumValues") {
                "enum"
            } else {
                "fixed"
            }
        });
        if typology == "enum" {
            let values = match data.get("enumValues") {
                Some(Value::Array(items)) => Some(
                    items
                        .iter()
                        .filter_map(scalar_text)
                        .collect::<Vec<_>>()
                        .join("|"),
                ),
                Some(other) => scalar_text(other),
                None => None,
            }
            .filter(|v| !v.is_empty());
            RuleEffect::Enum { values, default }
        } else {
            RuleEffect::Other { default }
        }
    }

    /// The value shown for this effect in a trigger summary
    pub fn summary_value(&self) -> String {
        match self {
            RuleEffect::Fixed(v) => v.clone(),
            RuleEffect::Enum { default, .. } | RuleEffect::Other { default } => {
                default.clone().unwrap_or_default()
            }
        }
    }
}

/// One flattened rule
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Parameter whose value change fires this rule
    pub trigger_key: String,
    /// Value of the trigger parameter that fires this rule
    pub trigger_value: String,
    /// Parameter the effect is applied to
    pub param_key: String,
    pub effect: RuleEffect,
    /// Further conditions that must all hold for the rule to apply
    pub extras: BTreeMap<String, String>,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.trigger_key, self.trigger_value)?;
        for (key, value) in &self.extras {
            write!(f, "&{}={}", key, value)?;
        }
        write!(f, " -> {}", self.param_key)
    }
}

/// The rules of one `programRules` entry, indexed by trigger key
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: BTreeMap<String, Vec<Arc<Rule>>>,
    duplicated: bool,
}

/// Keys inside a rule payload that describe an effect
const EFFECT_KEYS: [&str; 4] = ["typology", "fixedValue", "enumValues", "defaultValue"];

fn is_effect(data: &Map<String, Value>) -> bool {
    EFFECT_KEYS.iter().any(|key| data.contains_key(*key))
}

impl RuleSet {
    /// Parse the rule tree `{ target: { @trigger: { value: payload } } }`
    pub fn parse(rule_tree: &Map<String, Value>) -> Self {
        let mut set = RuleSet::default();
        for (param_key, conditions) in rule_tree {
            let Value::Object(conditions) = conditions else {
                log::debug!("Rule for {}: expected conditions, got {}", param_key, conditions);
                continue;
            };
            for (trigger_key, trigger_data) in conditions {
                set.parse_conditions(param_key, trigger_key, trigger_data, &BTreeMap::new());
            }
        }
        set
    }

    fn parse_conditions(
        &mut self,
        param_key: &str,
        trigger_key: &str,
        trigger_data: &Value,
        extras: &BTreeMap<String, String>,
    ) {
        let trigger_key = trigger_key.replace('@', "");
        let Value::Object(branches) = trigger_data else {
            log::debug!(
                "Rule for {}: condition on {} is not a map, skipped",
                param_key,
                trigger_key
            );
            return;
        };

        for (multi_value, payload) in branches {
            for trigger_value in multi_value.split('|') {
                match payload {
                    Value::Object(data) if is_effect(data) => {
                        self.create_rule(
                            param_key,
                            &trigger_key,
                            trigger_value,
                            RuleEffect::from_payload(data),
                            extras,
                        );
                        // An effect may carry further conditions next to it
                        let mut inner = extras.clone();
                        inner.insert(trigger_key.clone(), trigger_value.to_string());
                        for (key, nested) in data.iter().filter(|(k, _)| k.starts_with('@')) {
                            self.parse_conditions(param_key, key, nested, &inner);
                        }
                    }
                    Value::Object(nested) => {
                        let mut inner = extras.clone();
                        inner.insert(trigger_key.clone(), trigger_value.to_string());
                        for (key, data) in nested {
                            self.parse_conditions(param_key, key, data, &inner);
                        }
                    }
                    Value::Null => {}
                    leaf => {
                        if let Some(fixed) = scalar_text(leaf) {
                            self.create_rule(
                                param_key,
                                &trigger_key,
                                trigger_value,
                                RuleEffect::Fixed(fixed),
                                extras,
                            );
                        }
                    }
                }
            }
        }
    }

    fn create_rule(
        &mut self,
        param_key: &str,
        trigger_key: &str,
        trigger_value: &str,
        effect: RuleEffect,
        extras: &BTreeMap<String, String>,
    ) {
        if let RuleEffect::Fixed(value) = &effect {
            if value.strip_prefix('@') == Some(param_key) {
                return;
            }
        }
        let rule = Rule {
            trigger_key: trigger_key.to_string(),
            trigger_value: trigger_value.to_string(),
            param_key: param_key.to_string(),
            effect,
            extras: extras.clone(),
        };
        log::trace!("Parsed rule {}", rule);
        self.rules
            .entry(rule.trigger_key.clone())
            .or_default()
            .push(Arc::new(rule));
    }

    /// For every rule with extra conditions, add a copy keyed on each extra so
    /// the rule also fires when one of its conditions changes last.
    pub fn duplicate_for_extra_conditions(&mut self) {
        if self.duplicated {
            return;
        }
        self.duplicated = true;

        let mut duplicates = Vec::new();
        for rule in self.rules.values().flatten() {
            for (key, value) in &rule.extras {
                let mut extras = rule.extras.clone();
                extras.remove(key);
                extras.insert(rule.trigger_key.clone(), rule.trigger_value.clone());
                duplicates.push(Rule {
                    trigger_key: key.clone(),
                    trigger_value: value.clone(),
                    param_key: rule.param_key.clone(),
                    effect: rule.effect.clone(),
                    extras,
                });
            }
        }
        for rule in duplicates {
            self.rules
                .entry(rule.trigger_key.clone())
                .or_default()
                .push(Arc::new(rule));
        }
    }

    /// Rules fired by changes of `trigger_key`
    pub fn rules_for(&self, trigger_key: &str) -> &[Arc<Rule>] {
        self.rules.get(trigger_key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rules(&self) -> impl Iterator<Item = &Arc<Rule>> {
        self.rules.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(tree: Value) -> RuleSet {
        RuleSet::parse(tree.as_object().unwrap())
    }

    #[test]
    fn test_simple_fixed_rule() {
        let set = parse(json!({
            "tempLevel": {"@mode": {"1": {"fixedValue": "40"}}}
        }));
        let rules = set.rules_for("mode");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].trigger_value, "1");
        assert_eq!(rules[0].param_key, "tempLevel");
        assert_eq!(rules[0].effect, RuleEffect::Fixed("40".into()));
        assert!(rules[0].extras.is_empty());
    }

    #[test]
    fn test_alternatives_fan_out() {
        let set = parse(json!({
            "dryLevel": {"@program": {"cotton|synthetic|wool": {"fixedValue": "0"}}}
        }));
        let values: Vec<_> = set
            .rules_for("program")
            .iter()
            .map(|r| r.trigger_value.as_str())
            .collect();
        assert_eq!(values, vec!["cotton", "synthetic", "wool"]);
    }

    #[test]
    fn test_non_object_leaf_is_fixed() {
        let set = parse(json!({
            "spinSpeed": {"@temp": {"90": 800}}
        }));
        assert_eq!(set.rules_for("temp")[0].effect, RuleEffect::Fixed("800".into()));
    }

    #[test]
    fn test_nested_conditions_become_extras() {
        let mut set = parse(json!({
            "tempLevel": {"@mode": {"1": {"@dryLevel": {"2": {"fixedValue": "30"}}}}}
        }));
        let rule = &set.rules_for("dryLevel")[0];
        assert_eq!(rule.extras.get("mode").map(String::as_str), Some("1"));
        assert!(set.rules_for("mode").is_empty());

        set.duplicate_for_extra_conditions();
        let duplicate = &set.rules_for("mode")[0];
        assert_eq!(duplicate.trigger_value, "1");
        assert_eq!(duplicate.extras.get("dryLevel").map(String::as_str), Some("2"));
        assert_eq!(duplicate.effect, RuleEffect::Fixed("30".into()));

        // Only once
        set.duplicate_for_extra_conditions();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_branches_do_not_share_extras() {
        let set = parse(json!({
            "temp": {"@program": {
                "eco": {"@spin": {"800": {"fixedValue": "30"}}},
                "cotton": {"@dry": {"1": {"fixedValue": "60"}}}
            }}
        }));
        let spin = &set.rules_for("spin")[0];
        let dry = &set.rules_for("dry")[0];
        assert_eq!(spin.extras.len(), 1);
        assert_eq!(spin.extras.get("program").map(String::as_str), Some("eco"));
        assert_eq!(dry.extras.len(), 1);
        assert_eq!(dry.extras.get("program").map(String::as_str), Some("cotton"));
    }

    #[test]
    fn test_self_reference_dropped() {
        let set = parse(json!({
            "temp": {"@program": {"eco": {"fixedValue": "@temp"}, "cotton": {"fixedValue": "60"}}}
        }));
        assert_eq!(set.len(), 1);
        assert_eq!(set.rules_for("program")[0].trigger_value, "cotton");
    }

    #[test]
    fn test_enum_effect() {
        let set = parse(json!({
            "dryLevel": {"@program": {"eco": {
                "typology": "enum", "enumValues": "0|1|2", "defaultValue": "1"
            }}}
        }));
        assert_eq!(
            set.rules_for("program")[0].effect,
            RuleEffect::Enum {
                values: Some("0|1|2".into()),
                default: Some("1".into())
            }
        );
        assert_eq!(set.rules_for("program")[0].effect.summary_value(), "1");
    }

    #[test]
    fn test_malformed_trees_are_skipped() {
        let set = parse(json!({
            "temp": "not a map",
            "spin": {"@temp": "still not a map"},
            "dry": {"@temp": {"40": null}}
        }));
        assert!(set.is_empty());
    }
}
