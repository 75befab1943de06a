//! Appliance types and their type-specific behaviour
//!
//! The behaviour differences between appliance types are small: a few derived
//! attributes after each telemetry update and, for dryers, one hidden
//! setting. They are dispatched from a closed enum resolved once from
//! `applianceTypeName`.

use hon_core::Parameter;
use std::collections::BTreeMap;
use std::str::FromStr;
use strum::{Display, EnumString};

use crate::attributes::Attribute;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ApplianceKind {
    #[strum(serialize = "WM")]
    WashingMachine,
    #[strum(serialize = "WD")]
    WasherDryer,
    #[strum(serialize = "TD")]
    TumbleDryer,
    #[strum(serialize = "DW")]
    DishWasher,
    #[strum(serialize = "OV")]
    Oven,
    #[strum(serialize = "WH")]
    WaterHeater,
    #[strum(serialize = "REF")]
    Fridge,
    #[strum(serialize = "AC")]
    AirConditioner,
    #[strum(serialize = "WC")]
    WineCellar,
    #[default]
    #[strum(serialize = "OTHER")]
    Other,
}

impl ApplianceKind {
    pub fn from_type_name(name: &str) -> Self {
        ApplianceKind::from_str(name.trim()).unwrap_or_default()
    }

    /// Derive the type-specific attributes after a telemetry update
    pub fn post_process_attributes(
        &self,
        attributes: &mut BTreeMap<String, Attribute>,
        context: &serde_json::Value,
    ) {
        match self {
            ApplianceKind::WashingMachine
            | ApplianceKind::WasherDryer
            | ApplianceKind::TumbleDryer => {
                mach_mode_activity(attributes, context)
            }
            ApplianceKind::Oven => {
                active_from_on_off_status(attributes);
                if is_disconnected(attributes) {
                    for key in ["temp", "onOffStatus", "remoteCtrValid", "remainingTimeMM"] {
                        if let Some(attribute) = attributes.get_mut(key) {
                            attribute.update(&serde_json::json!("0"), false);
                        }
                    }
                }
            }
            ApplianceKind::WaterHeater => active_from_on_off_status(attributes),
            ApplianceKind::Fridge => fridge_modes(attributes),
            _ => {}
        }
    }

    /// Drop settings that make no sense for this appliance type
    pub fn filter_settings(&self, settings: &mut BTreeMap<String, &Parameter>) {
        if *self == ApplianceKind::TumbleDryer {
            let hidden = settings
                .get("startProgram.dryLevel")
                .is_some_and(|p| matches!(p, Parameter::Fixed(_)) && p.value().to_string() == "11");
            if hidden {
                settings.remove("startProgram.dryLevel");
            }
        }
    }
}

fn is_disconnected(attributes: &BTreeMap<String, Attribute>) -> bool {
    attributes.get("connected").is_some_and(|c| *c == "0")
}

fn flag(attributes: &BTreeMap<String, Attribute>, key: &str) -> bool {
    flag_value(attributes, key, "1")
}

fn mach_mode_activity(attributes: &mut BTreeMap<String, Attribute>, context: &serde_json::Value) {
    if is_disconnected(attributes) {
        if let Some(mode) = attributes.get_mut("machMode") {
            mode.update(&serde_json::json!("0"), false);
        }
    }
    let active = match context.get("activity") {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::Object(map)) => !map.is_empty(),
        Some(serde_json::Value::Array(list)) => !list.is_empty(),
        Some(serde_json::Value::String(s)) => !s.is_empty(),
        Some(serde_json::Value::Number(n)) => n.as_f64() != Some(0.0),
    };
    attributes.insert("active".to_string(), Attribute::from_flag(active));
    let pause = flag_value(attributes, "machMode", "3");
    attributes.insert("pause".to_string(), Attribute::from_flag(pause));
}

fn flag_value(attributes: &BTreeMap<String, Attribute>, key: &str, value: &str) -> bool {
    attributes.get(key).is_some_and(|a| *a == value)
}

fn active_from_on_off_status(attributes: &mut BTreeMap<String, Attribute>) {
    let active = flag(attributes, "onOffStatus");
    attributes.insert("active".to_string(), Attribute::from_flag(active));
}

fn fridge_modes(attributes: &mut BTreeMap<String, Attribute>) {
    let zone1 = if flag(attributes, "holidayMode") {
        "holiday"
    } else if flag(attributes, "intelligenceMode") {
        "auto_set"
    } else if flag(attributes, "quickModeZ1") {
        "super_cool"
    } else {
        "no_mode"
    };
    let zone2 = if flag(attributes, "quickModeZ2") {
        "super_freeze"
    } else if flag(attributes, "intelligenceMode") {
        "auto_set"
    } else {
        "no_mode"
    };
    attributes.insert("modeZ1".to_string(), Attribute::from_text(zone1));
    attributes.insert("modeZ2".to_string(), Attribute::from_text(zone2));
}
