use serde_json::{Map, Value};

use super::ParameterBase;
use crate::error::ValidationError;
use crate::value::{clean_token, scalar_text, text_field, ParamValue};

/// Parameter restricted to a list of tokens
///
/// The vendor spells tokens like `[COTTONS]`; the user-facing values are the
/// normalized forms (`cottons`) while the raw tokens are kept for the wire.
#[derive(Debug, Clone)]
pub struct EnumParameter {
    pub(crate) base: ParameterBase,
    raw_values: Vec<String>,
    value: Option<String>,
    schema_values: Vec<String>,
    default: Option<String>,
}

impl EnumParameter {
    pub fn from_schema(key: &str, group: &str, schema: &Map<String, Value>) -> Self {
        let mut raw_values: Vec<String> = match schema.get("enumValues") {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(Value::String(s)) => s.split('|').map(str::to_string).collect(),
            _ => Vec::new(),
        };
        let default = text_field(schema, "defaultValue").filter(|v| !v.is_empty());
        if let Some(default) = &default {
            let token = clean_token(default);
            if !raw_values.iter().any(|raw| clean_token(raw) == token) {
                raw_values.push(default.clone());
            }
        }
        EnumParameter {
            base: ParameterBase::from_schema(key, group, schema),
            schema_values: raw_values.clone(),
            raw_values,
            value: default.clone(),
            default,
        }
    }

    /// Normalized allowed values
    pub fn values(&self) -> Vec<String> {
        self.raw_values.iter().map(|raw| clean_token(raw)).collect()
    }

    /// Normalized current value, the first allowed value when unset
    pub fn value(&self) -> String {
        match &self.value {
            Some(raw) => clean_token(raw),
            None => self
                .raw_values
                .first()
                .map(|raw| clean_token(raw))
                .unwrap_or_else(|| "0".to_string()),
        }
    }

    /// The raw vendor token matching the current value
    pub fn intern_value(&self) -> String {
        self.value
            .clone()
            .or_else(|| self.raw_values.first().cloned())
            .unwrap_or_else(|| "0".to_string())
    }

    fn find_raw(&self, token: &str) -> Option<&String> {
        self.raw_values.iter().find(|raw| clean_token(raw) == token)
    }

    pub fn set_value(&mut self, value: &ParamValue) -> Result<(), ValidationError> {
        let token = value.token();
        match self.find_raw(&token) {
            Some(raw) => {
                log::trace!("{} = {}", self.base.key, raw);
                self.value = Some(raw.clone());
                Ok(())
            }
            None => Err(ValidationError::NotAllowed(
                self.base.key.clone(),
                value.to_string(),
                self.values(),
            )),
        }
    }

    /// Narrow to a single forced value; no-op when already narrowed to it
    pub fn apply_fixed_value(&mut self, value: &ParamValue) -> bool {
        let token = value.token();
        if self.raw_values.len() == 1 && clean_token(&self.raw_values[0]) == token {
            return false;
        }
        let raw = value.to_string();
        self.raw_values = vec![raw.clone()];
        self.value = Some(raw);
        true
    }

    /// Replace the allowed values and/or select a default
    pub fn apply_rule(
        &mut self,
        values: Option<&str>,
        default: Option<&str>,
    ) -> Result<bool, ValidationError> {
        let mut changed = false;
        if let Some(values) = values {
            let raw_values: Vec<String> = values.split('|').map(str::to_string).collect();
            if raw_values != self.raw_values {
                self.raw_values = raw_values;
                changed = true;
            }
            let current = self.value.as_deref().map(clean_token);
            if let Some(current) = current {
                if self.find_raw(&current).is_none() {
                    self.value = None;
                }
            }
        }
        if let Some(default) = default {
            self.set_value(&ParamValue::from(default))?;
            changed = true;
        }
        Ok(changed)
    }

    pub(crate) fn sync_from(&mut self, values: &[String], value: &str) {
        self.raw_values = values.to_vec();
        self.value = self
            .raw_values
            .iter()
            .find(|raw| clean_token(raw) == clean_token(value))
            .cloned();
    }

    pub fn reset(&mut self) {
        self.raw_values = self.schema_values.clone();
        self.value = self.default.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn program_enum(schema: Value) -> EnumParameter {
        EnumParameter::from_schema("mode", "parameters", schema.as_object().unwrap())
    }

    #[test]
    fn test_default_appended() {
        let mode = program_enum(json!({
            "typology": "enum", "enumValues": ["1", "2"], "defaultValue": "3"
        }));
        assert_eq!(mode.values(), vec!["1", "2", "3"]);
        assert_eq!(mode.value(), "3");
    }

    #[test]
    fn test_normalized_and_raw_tokens() {
        let mut mode =
            program_enum(json!({"typology": "enum", "enumValues": ["[COTTONS]", "[ECO|PLUS]"]}));
        assert_eq!(mode.values(), vec!["cottons", "eco_plus"]);
        // Unset falls back to the first value
        assert_eq!(mode.value(), "cottons");
        assert_eq!(mode.intern_value(), "[COTTONS]");

        mode.set_value(&ParamValue::from("ECO_PLUS")).unwrap();
        assert_eq!(mode.value(), "eco_plus");
        assert_eq!(mode.intern_value(), "[ECO|PLUS]");
    }

    #[test]
    fn test_rejection_keeps_value() {
        let mut mode = program_enum(json!({
            "typology": "enum", "enumValues": ["0", "1"], "defaultValue": "1"
        }));
        let err = mode.set_value(&ParamValue::from("7")).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NotAllowed(ref key, ref v, _) if key == "mode" && v == "7"
        ));
        assert_eq!(mode.value(), "1");
    }

    #[test]
    fn test_empty_enum_value() {
        let mode = program_enum(json!({"typology": "enum"}));
        assert!(mode.values().is_empty());
        assert_eq!(mode.value(), "0");
    }

    #[test]
    fn test_apply_fixed_value() {
        let mut mode = program_enum(json!({"typology": "enum", "enumValues": ["0", "1", "2"]}));
        assert!(mode.apply_fixed_value(&ParamValue::from("2")));
        assert_eq!(mode.values(), vec!["2"]);
        assert_eq!(mode.value(), "2");
        assert!(!mode.apply_fixed_value(&ParamValue::from("2")));
    }

    #[test]
    fn test_apply_rule() {
        let mut mode = program_enum(json!({
            "typology": "enum", "enumValues": ["0", "1", "2"], "defaultValue": "2"
        }));
        assert!(mode.apply_rule(Some("0|1"), None).unwrap());
        assert_eq!(mode.values(), vec!["0", "1"]);
        // The old value left the set
        assert_eq!(mode.value(), "0");

        assert!(mode.apply_rule(None, Some("1")).unwrap());
        assert_eq!(mode.value(), "1");
        assert!(mode.apply_rule(None, Some("5")).is_err());

        mode.reset();
        assert_eq!(mode.values(), vec!["0", "1", "2"]);
        assert_eq!(mode.value(), "2");
    }

    proptest! {
        #[test]
        fn prop_value_is_always_allowed(
            allowed in proptest::collection::btree_set("[a-z]{1,6}", 1..8),
            attempts in proptest::collection::vec("[a-z]{1,6}", 1..20)
        ) {
            let values: Vec<String> = allowed.into_iter().collect();
            let mut mode = program_enum(json!({"typology": "enum", "enumValues": values}));
            for attempt in attempts {
                let before = mode.value();
                if mode.set_value(&ParamValue::from(attempt.as_str())).is_err() {
                    prop_assert_eq!(mode.value(), before);
                }
                prop_assert!(mode.values().contains(&mode.value()));
            }
        }
    }
}
