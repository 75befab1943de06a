use serde_json::{Map, Value};

use super::ParameterBase;
use crate::value::{text_field, ParamValue};

/// Parameter with a single value; assignments are never rejected
#[derive(Debug, Clone)]
pub struct FixedParameter {
    pub(crate) base: ParameterBase,
    value: String,
    schema_value: String,
}

impl FixedParameter {
    pub fn from_schema(key: &str, group: &str, schema: &Map<String, Value>) -> Self {
        let value = text_field(schema, "fixedValue").unwrap_or_default();
        FixedParameter {
            base: ParameterBase::from_schema(key, group, schema),
            schema_value: value.clone(),
            value,
        }
    }

    pub fn new(key: &str, group: &str, value: &str) -> Self {
        FixedParameter {
            base: ParameterBase::new(key, group, "fixed"),
            value: value.to_string(),
            schema_value: value.to_string(),
        }
    }

    /// `"0"` stands in for an empty value
    pub fn value(&self) -> ParamValue {
        if self.value.is_empty() {
            ParamValue::from("0")
        } else {
            ParamValue::from(self.value.as_str())
        }
    }

    pub fn intern_value(&self) -> String {
        self.value().to_string()
    }

    pub fn set_value(&mut self, value: &ParamValue) {
        self.value = value.to_string();
    }

    pub fn apply_fixed_value(&mut self, value: &ParamValue) -> bool {
        self.set_value(value);
        true
    }

    pub fn reset(&mut self) {
        self.value = self.schema_value.clone();
    }
}
