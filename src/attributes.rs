//! Telemetry attributes
//!
//! Live appliance state arrives as `shadow.parameters.{name}` entries of the
//! form `{"parNewVal": "40", "lastUpdate": "2024-03-01T10:00:00Z"}`. When the
//! user changes a setting the new value is written into the attribute with a
//! short lock, so stale telemetry arriving right after the change does not
//! flip it back.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use hon_core::value::parse_number;
use hon_core::ParamValue;
use serde_json::Value;
use std::fmt;

/// How long a shielded update blocks telemetry updates
pub const LOCK_TIMEOUT_SECS: i64 = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attribute {
    value: String,
    last_update: Option<DateTime<Utc>>,
    lock_timestamp: Option<DateTime<Utc>>,
}

impl Attribute {
    pub fn new(data: &Value) -> Self {
        let mut attribute = Attribute::default();
        attribute.update(data, false);
        attribute
    }

    pub fn from_text(value: &str) -> Self {
        Attribute {
            value: value.to_string(),
            ..Default::default()
        }
    }

    pub fn from_flag(flag: bool) -> Self {
        Attribute::from_text(if flag { "1" } else { "0" })
    }

    /// The value as received
    pub fn raw(&self) -> &str {
        &self.value
    }

    /// Numeric when the raw value parses as a number, text otherwise
    pub fn value(&self) -> ParamValue {
        match parse_number(&self.value) {
            Some(n) => ParamValue::Number(n),
            None => ParamValue::Text(self.value.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Timestamp of the last telemetry update
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked_at(Utc::now())
    }

    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        match self.lock_timestamp {
            Some(locked) => locked + TimeDelta::seconds(LOCK_TIMEOUT_SECS) >= now,
            None => false,
        }
    }

    /// Apply a telemetry value. Returns `false` if the attribute is locked.
    ///
    /// With `shield` the lock is ignored and renewed.
    pub fn update(&mut self, data: &Value, shield: bool) -> bool {
        self.update_at(data, shield, Utc::now())
    }

    pub fn update_at(&mut self, data: &Value, shield: bool, now: DateTime<Utc>) -> bool {
        if self.is_locked_at(now) && !shield {
            log::trace!("Attribute locked, ignoring {}", data);
            return false;
        }
        if shield {
            self.lock_timestamp = Some(now);
        }
        match data {
            Value::Object(map) => {
                self.value = map
                    .get("parNewVal")
                    .and_then(hon_core::value::scalar_text)
                    .unwrap_or_default();
                self.last_update = map
                    .get("lastUpdate")
                    .and_then(Value::as_str)
                    .and_then(parse_timestamp);
            }
            other => {
                self.value = hon_core::value::scalar_text(other).unwrap_or_default();
            }
        }
        true
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl PartialEq<&str> for Attribute {
    fn eq(&self, other: &&str) -> bool {
        hon_core::value::tokens_match(&self.value, other)
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(|t| t.and_utc()))
        .ok()
}
