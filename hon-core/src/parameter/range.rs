use serde_json::{Map, Value};

use super::ParameterBase;
use crate::error::ValidationError;
use crate::value::{format_number, number_field, ParamValue, FLOAT_TOLERANCE};

/// Upper bound on the values listed by [`RangeParameter::values`]
pub const MAX_LISTED_VALUES: usize = 10_000;

/// Numeric parameter with bounds and an increment
///
/// Invariant: after a successful `set_value`, `min <= value <= max` and
/// `(value - min)` is a whole multiple of the step (within tolerance).
/// Rules may force values outside the schema through `apply_fixed_value`,
/// which widens the bounds instead of breaking the invariant.
#[derive(Debug, Clone)]
pub struct RangeParameter {
    pub(crate) base: ParameterBase,
    min: f64,
    max: f64,
    step: f64,
    value: f64,
    schema: (f64, f64, f64, f64),
}

impl RangeParameter {
    pub fn from_schema(key: &str, group: &str, schema: &Map<String, Value>) -> Self {
        let min = number_field(schema, "minimumValue").unwrap_or(0.0);
        let max = number_field(schema, "maximumValue").unwrap_or(0.0);
        let step = number_field(schema, "incrementValue").unwrap_or(0.0);
        let default = number_field(schema, "defaultValue").unwrap_or(min);
        RangeParameter {
            base: ParameterBase::from_schema(key, group, schema),
            min,
            max,
            step,
            value: default,
            schema: (min, max, step, default),
        }
    }

    pub fn new(key: &str, group: &str, min: f64, max: f64, step: f64) -> Self {
        RangeParameter {
            base: ParameterBase::new(key, group, "range"),
            min,
            max,
            step,
            value: min,
            schema: (min, max, step, min),
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// The increment; a zero step in the schema counts as 1
    pub fn step(&self) -> f64 {
        if self.step == 0.0 {
            1.0
        } else {
            self.step
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn intern_value(&self) -> String {
        format_number(self.value)
    }

    /// Number of steps between the bounds, saturating at `usize::MAX`
    pub fn value_count(&self) -> usize {
        if self.min.is_nan() || self.max.is_nan() || self.max < self.min {
            return 0;
        }
        let steps = ((self.max - self.min) / self.step() + FLOAT_TOLERANCE).floor();
        (steps as usize).saturating_add(1)
    }

    /// The allowed values from `min` upwards, at most [`MAX_LISTED_VALUES`] of them
    pub fn values(&self) -> Vec<String> {
        let step = self.step();
        (0..self.value_count().min(MAX_LISTED_VALUES))
            .map(|i| format_number(self.min + step * i as f64))
            .collect()
    }

    fn validate(&self, value: f64) -> Result<(), ValidationError> {
        let key = &self.base.key;
        if value < self.min - FLOAT_TOLERANCE {
            return Err(ValidationError::TooLow(key.clone(), value, self.min));
        }
        if value > self.max + FLOAT_TOLERANCE {
            return Err(ValidationError::TooHigh(key.clone(), value, self.max));
        }
        let steps = (value - self.min) / self.step();
        if (steps - steps.round()).abs() > FLOAT_TOLERANCE {
            return Err(ValidationError::OffStep(key.clone(), value, self.step(), self.min));
        }
        Ok(())
    }

    fn numeric(&self, value: &ParamValue) -> Result<f64, ValidationError> {
        value
            .as_number()
            .ok_or_else(|| ValidationError::NotNumeric(self.base.key.clone(), value.to_string()))
    }

    pub fn set_value(&mut self, value: &ParamValue) -> Result<(), ValidationError> {
        let value = self.numeric(value)?;
        self.validate(value)?;
        log::trace!("{} = {}", self.base.key, format_number(value));
        self.value = value;
        Ok(())
    }

    /// Force a value from a rule, widening the bounds to include it
    pub fn apply_fixed_value(&mut self, value: &ParamValue) -> Result<bool, ValidationError> {
        let value = self.numeric(value)?;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.value = value;
        Ok(true)
    }

    pub(crate) fn sync_from(&mut self, other: &RangeParameter) {
        self.min = other.min;
        self.max = other.max;
        self.step = other.step;
        self.value = other.value;
    }

    /// Narrow to the single value of a non-range parameter
    pub(crate) fn collapse(&mut self, value: &ParamValue) -> Result<(), ValidationError> {
        let value = self.numeric(value)?;
        self.min = value;
        self.max = value;
        self.step = 1.0;
        self.value = value;
        Ok(())
    }

    pub fn reset(&mut self) {
        let (min, max, step, default) = self.schema;
        self.min = min;
        self.max = max;
        self.step = step;
        self.value = default;
    }
}
