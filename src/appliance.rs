//! The appliance-facing API
//!
//! An [`Appliance`] combines the static description of one device, its
//! command groups and the live telemetry attributes:
//!
//! ```text
//!   appliance data ──► Appliance::new
//!   command schema ──► load_commands ──► CommandGroup per command
//!   favourites     ──► load_favourites
//!   history        ──► load_command_history
//!   context        ──► load_attributes ──► Attribute per telemetry key
//!
//!   settings / set_setting        "command.key" view over all groups
//!   sync_params_to_command        telemetry  ──► command parameters
//!   sync_command_to_params        parameters ──► telemetry (shielded)
//!   send                          request    ──► CommandTransport
//! ```

use chrono::{DateTime, TimeDelta, Utc};
use hon_core::value::scalar_text;
use hon_core::{
    CommandError, CommandGroup, CommandLoader, CommandRequest, Favourite, FixedParameter,
    HistoryEntry, ParamValue, Parameter,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::attributes::Attribute;
use crate::fixtures::{FixtureError, FixtureSet};
use crate::kind::ApplianceKind;
use crate::transport::{envelope, is_success, CommandTransport, Target, TransportError};

/// Context updates closer together than this are ignored unless forced
pub const MINIMAL_UPDATE_INTERVAL_SECS: i64 = 5;

/// Characters of a nick name that carry no information
const PLACEHOLDER_NAME_CHARS: &str = "xX1\r\n\t\x0c\x0b-";

#[derive(Error, Debug)]
pub enum ApplianceError {
    #[error("Appliance has no command {0}")]
    UnknownCommand(String),
    #[error("Unknown setting {0}")]
    UnknownSetting(String),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("{message}\n{payload}")]
    Api { message: String, payload: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

/// Which parameters [`Appliance::sync_command`] copies
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SyncFilter {
    #[default]
    All,
    /// Only parameters that are mandatory on the source command
    Mandatory,
    /// Only the listed parameters, and only when mandatory on the source
    Only(Vec<String>),
}

impl SyncFilter {
    fn allows(&self, key: &str, base: &Parameter) -> bool {
        match self {
            SyncFilter::All => true,
            SyncFilter::Mandatory => base.is_mandatory(),
            SyncFilter::Only(keys) => keys.iter().any(|k| k == key) && base.is_mandatory(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Appliance {
    info: Map<String, Value>,
    kind: ApplianceKind,
    commands: BTreeMap<String, CommandGroup>,
    additional_data: Map<String, Value>,
    options: Map<String, Value>,
    attributes: BTreeMap<String, Attribute>,
    statistics: Map<String, Value>,
    // Stands in for settings a category does not define
    placeholder: Parameter,
    last_update: Option<DateTime<Utc>>,
}

impl Appliance {
    pub fn new(data: &Value) -> Self {
        let mut info = data.as_object().cloned().unwrap_or_default();
        let mut attributes = BTreeMap::new();
        if let Some(Value::Array(list)) = info.remove("attributes") {
            for entry in list {
                let Some(name) = entry.get("parName").and_then(Value::as_str) else {
                    continue;
                };
                let value = entry.get("parValue").cloned().unwrap_or_default();
                attributes.insert(name.to_string(), Attribute::new(&value));
            }
        }
        let kind = ApplianceKind::from_type_name(
            info.get("applianceTypeName").and_then(Value::as_str).unwrap_or_default(),
        );
        log::debug!("New appliance of kind {} with {} attributes", kind, attributes.len());

        Appliance {
            info,
            kind,
            commands: BTreeMap::new(),
            additional_data: Map::new(),
            options: Map::new(),
            attributes,
            statistics: Map::new(),
            placeholder: Parameter::Fixed(FixedParameter::new("", "none", "")),
            last_update: None,
        }
    }

    /// Build an appliance from a directory of recorded API responses
    pub fn from_dir(dir: &Path) -> Result<Self, ApplianceError> {
        Ok(Appliance::from_fixtures(&FixtureSet::load(dir)?))
    }

    pub fn from_fixtures(fixtures: &FixtureSet) -> Self {
        let mut appliance = Appliance::new(&fixtures.appliance);
        appliance.load_commands(&fixtures.commands);
        appliance.load_favourites(&fixtures.favourites);
        appliance.load_command_history(&fixtures.history);
        appliance.load_attributes(&fixtures.context);
        appliance.load_statistics(&fixtures.statistics, &fixtures.maintenance);
        appliance
    }

    fn info_text(&self, key: &str) -> String {
        self.info.get(key).and_then(scalar_text).unwrap_or_default()
    }

    pub fn info(&self) -> &Map<String, Value> {
        &self.info
    }

    pub fn appliance_type(&self) -> String {
        self.info_text("applianceTypeName")
    }

    pub fn mac_address(&self) -> String {
        self.info_text("macAddress")
    }

    pub fn unique_id(&self) -> String {
        self.mac_address()
    }

    pub fn model_name(&self) -> String {
        self.info_text("modelName")
    }

    pub fn model_id(&self) -> i64 {
        self.info
            .get("applianceModelId")
            .and_then(|v| v.as_i64().or_else(|| v.as_str()?.trim().parse().ok()))
            .unwrap_or(0)
    }

    pub fn brand(&self) -> String {
        let brand = self.info_text("brand");
        let mut chars = brand.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
            None => brand,
        }
    }

    /// The user-given name, or the model name when the name is a placeholder
    pub fn nick_name(&self) -> String {
        let name = self.info_text("nickName");
        if name.chars().all(|c| PLACEHOLDER_NAME_CHARS.contains(c)) {
            return self.model_name();
        }
        name
    }

    /// Product code, derived from the serial number when not given
    pub fn code(&self) -> String {
        let code = self.info_text("code");
        if !code.is_empty() {
            return code;
        }
        let serial = self.info_text("serialNumber");
        let len = if serial.chars().count() < 18 { 8 } else { 11 };
        serial.chars().take(len).collect()
    }

    pub fn kind(&self) -> ApplianceKind {
        self.kind
    }

    pub fn commands(&self) -> &BTreeMap<String, CommandGroup> {
        &self.commands
    }

    pub fn command(&self, name: &str) -> Option<&CommandGroup> {
        self.commands.get(name)
    }

    pub fn command_mut(&mut self, name: &str) -> Option<&mut CommandGroup> {
        self.commands.get_mut(name)
    }

    pub fn attributes(&self) -> &BTreeMap<String, Attribute> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes.get(key)
    }

    /// Top-level schema entries that are not commands
    pub fn additional_data(&self) -> &Map<String, Value> {
        &self.additional_data
    }

    /// The `applianceModel` options sent along with every command
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    pub fn statistics(&self) -> &Map<String, Value> {
        &self.statistics
    }

    /// Load the command schema. Responses with a non-zero result code are ignored.
    pub fn load_commands(&mut self, payload: &Value) {
        let Some(map) = payload.as_object() else {
            log::warn!("Command schema is not an object");
            return;
        };
        if map.get("resultCode").and_then(scalar_text).as_deref() != Some("0") {
            log::warn!(
                "Command schema has result code {}, ignoring it",
                map.get("resultCode").unwrap_or(&Value::Null)
            );
            return;
        }
        let mut map = map.clone();
        self.options = match map.remove("applianceModel") {
            Some(Value::Object(model)) => model
                .get("options")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or(model),
            _ => Map::new(),
        };
        map.remove("resultCode");

        let loaded = CommandLoader::new(&map).load();
        self.commands = loaded.commands;
        self.additional_data = loaded.additional_data;
        log::info!(
            "{}: loaded {} commands",
            self.nick_name(),
            self.commands.len()
        );
        self.sync_params_to_command("settings");
    }

    pub fn load_favourites(&mut self, favourites: &[Favourite]) {
        hon_core::add_favourites(&mut self.commands, favourites);
    }

    pub fn load_command_history(&mut self, history: &[HistoryEntry]) {
        hon_core::recover_last_command_states(&mut self.commands, history);
    }

    /// Apply a telemetry context and derive the computed attributes
    pub fn load_attributes(&mut self, context: &Value) {
        if let Some(parameters) = context.pointer("/shadow/parameters").and_then(Value::as_object) {
            for (name, values) in parameters {
                match self.attributes.get_mut(name) {
                    Some(attribute) => {
                        attribute.update(values, false);
                    }
                    None => {
                        self.attributes.insert(name.clone(), Attribute::new(values));
                    }
                }
            }
        }

        let program_name = self.current_program_name();
        self.attributes
            .insert("programName".to_string(), Attribute::from_text(&program_name));

        let connected = context
            .pointer("/lastConnEvent/category")
            .and_then(Value::as_str)
            != Some("DISCONNECTED");
        self.attributes
            .insert("connected".to_string(), Attribute::from_flag(connected));

        self.kind.post_process_attributes(&mut self.attributes, context);
    }

    fn current_program_name(&self) -> String {
        let code = self
            .attributes
            .get("prCode")
            .and_then(|a| a.value().as_number())
            .map(|n| n as i64)
            .unwrap_or(0);
        if code == 0 {
            return "No Program".to_string();
        }
        self.commands
            .get("startProgram")
            .and_then(|group| group.program_ids().remove(&code))
            .unwrap_or_else(|| "No Program".to_string())
    }

    /// Statistics and the maintenance cycle, merged into one map
    pub fn load_statistics(&mut self, statistics: &Value, maintenance: &Value) {
        let mut merged = statistics.as_object().cloned().unwrap_or_default();
        if let Some(maintenance) = maintenance.as_object() {
            merged.extend(maintenance.clone());
        }
        self.statistics = merged;
    }

    /// Apply a context update unless the last one is too recent
    pub fn update(&mut self, context: &Value, force: bool) -> bool {
        self.update_at(context, force, Utc::now())
    }

    pub fn update_at(&mut self, context: &Value, force: bool, now: DateTime<Utc>) -> bool {
        if let Some(last) = self.last_update {
            if !force && last + TimeDelta::seconds(MINIMAL_UPDATE_INTERVAL_SECS) >= now {
                log::trace!("Skipping update, last one at {}", last);
                return false;
            }
        }
        self.last_update = Some(now);
        self.load_attributes(context);
        true
    }

    /// Every setting of the active categories, keyed `command.parameter`
    pub fn settings(&self) -> BTreeMap<String, &Parameter> {
        let mut settings = BTreeMap::new();
        for (name, group) in &self.commands {
            let command = group.active();
            for key in group.setting_keys() {
                let parameter = command.parameter(&key).unwrap_or(&self.placeholder);
                settings.insert(format!("{}.{}", name, key), parameter);
            }
        }
        self.kind.filter_settings(&mut settings);
        settings
    }

    /// Keys of all settings of any category
    pub fn available_settings(&self) -> Vec<String> {
        self.commands
            .iter()
            .flat_map(|(name, group)| {
                group
                    .setting_keys()
                    .into_iter()
                    .map(move |key| format!("{}.{}", name, key))
            })
            .collect()
    }

    /// Set a `command.parameter` setting
    pub fn set_setting(
        &mut self,
        name: &str,
        value: impl Into<ParamValue>,
    ) -> Result<(), ApplianceError> {
        let (command, key) = name
            .split_once('.')
            .ok_or_else(|| ApplianceError::UnknownSetting(name.to_string()))?;
        let group = self
            .commands
            .get_mut(command)
            .ok_or_else(|| ApplianceError::UnknownCommand(command.to_string()))?;
        if !group.setting_keys().contains(key) {
            return Err(ApplianceError::UnknownSetting(name.to_string()));
        }
        group.set_value(key, value)?;
        Ok(())
    }

    /// Write the parameter values of a command into the matching attributes
    pub fn sync_command_to_params(&mut self, command_name: &str) {
        let Some(group) = self.commands.get(command_name) else {
            return;
        };
        let command = group.active();
        for (key, attribute) in self.attributes.iter_mut() {
            if let Some(parameter) = command.parameter(key) {
                attribute.update(&Value::String(parameter.intern_value()), true);
            }
        }
    }

    /// Set the parameters of a command from the matching telemetry attributes
    pub fn sync_params_to_command(&mut self, command_name: &str) {
        let Some(group) = self.commands.get_mut(command_name) else {
            return;
        };
        for key in group.setting_keys() {
            let Some(attribute) = self.attributes.get(&key).filter(|a| !a.is_empty()) else {
                continue;
            };
            let value = match group.active().parameter(&key) {
                None => continue,
                Some(Parameter::Range(_)) => match attribute.value().as_number() {
                    Some(n) => ParamValue::Number(n),
                    None => {
                        log::info!("Can't set {} - not numeric: {}", key, attribute);
                        continue;
                    }
                },
                Some(_) => ParamValue::Text(attribute.raw().to_string()),
            };
            if let Err(e) = group.set_value(&key, value) {
                log::info!("Can't set {} - {}", key, e);
            }
        }
    }

    /// Copy parameters of one command's active category into the other commands
    pub fn sync_command(&mut self, main: &str, target: Option<&[&str]>, filter: &SyncFilter) {
        let Some(base) = self.commands.get(main).map(|group| group.active().clone()) else {
            return;
        };
        for (name, group) in self.commands.iter_mut() {
            if name == main || target.is_some_and(|t| !t.contains(&name.as_str())) {
                continue;
            }
            let keys: Vec<String> = group.active().parameters().keys().cloned().collect();
            for key in keys {
                let Some(base_parameter) = base.parameter(&key) else {
                    continue;
                };
                if !filter.allows(&key, base_parameter) {
                    continue;
                }
                if let Err(e) = group.active_mut().sync_parameter(&key, base_parameter) {
                    log::debug!("{}: not syncing {} from {} - {}", name, key, main, e);
                }
            }
        }
    }

    /// The request `send` would post for a command
    pub fn command_request(
        &self,
        name: &str,
        only_mandatory: bool,
    ) -> Result<CommandRequest, ApplianceError> {
        let group = self
            .commands
            .get(name)
            .ok_or_else(|| ApplianceError::UnknownCommand(name.to_string()))?;
        Ok(group.active().request(only_mandatory))
    }

    /// Send a command with its current parameters
    pub async fn send<T>(
        &mut self,
        transport: &T,
        name: &str,
        only_mandatory: bool,
    ) -> Result<(), ApplianceError>
    where
        T: CommandTransport + ?Sized,
    {
        let request = self.command_request(name, only_mandatory)?;
        self.sync_command_to_params(name);
        self.send_request(transport, &request).await
    }

    /// Send only the named parameters plus the mandatory ones
    pub async fn send_specific<T>(
        &mut self,
        transport: &T,
        name: &str,
        keys: &[&str],
    ) -> Result<(), ApplianceError>
    where
        T: CommandTransport + ?Sized,
    {
        let request = self
            .commands
            .get(name)
            .ok_or_else(|| ApplianceError::UnknownCommand(name.to_string()))?
            .active()
            .request_specific(keys);
        self.sync_command_to_params(name);
        self.send_request(transport, &request).await
    }

    pub async fn send_request<T>(
        &self,
        transport: &T,
        request: &CommandRequest,
    ) -> Result<(), ApplianceError>
    where
        T: CommandTransport + ?Sized,
    {
        let mac_address = self.mac_address();
        let appliance_type = self.appliance_type();
        let target = Target {
            mac_address: &mac_address,
            appliance_type: &appliance_type,
            options: &self.options,
        };
        let body = envelope(request, target, Utc::now());
        let response = transport.send_command(&body).await?;
        if is_success(&response) {
            log::info!("{}: sent {}", self.nick_name(), request.command_name);
            return Ok(());
        }
        log::warn!("{}: {} rejected: {}", self.nick_name(), request.command_name, response);
        Err(ApplianceError::Api {
            message: "Error sending command data".to_string(),
            payload: serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::Mutex;

    struct Recorder {
        result: &'static str,
        sent: Mutex<Vec<Value>>,
    }

    impl Recorder {
        fn new(result: &'static str) -> Self {
            Recorder {
                result,
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CommandTransport for Recorder {
        async fn send_command(&self, body: &Value) -> Result<Value, TransportError> {
            self.sent.lock().unwrap().push(body.clone());
            Ok(json!({"payload": {"resultCode": self.result}}))
        }
    }

    fn schema() -> Value {
        json!({
            "resultCode": "0",
            "applianceModel": {"options": {"favouriteSupported": 1}},
            "dictionaryId": "42",
            "settings": {
                "description": "d", "protocolType": "p",
                "parameters": {
                    "tempSel": {"typology": "range", "minimumValue": 0, "maximumValue": 90,
                                "incrementValue": 10, "defaultValue": 40, "mandatory": 1},
                    "soundLevel": {"typology": "enum", "enumValues": ["0", "1", "2"],
                                   "defaultValue": "1"}
                }
            },
            "startProgram": {
                "PROGRAMS.WM.COTTONS": {
                    "description": "d", "protocolType": "p",
                    "parameters": {
                        "prCode": {"typology": "fixed", "fixedValue": "12", "mandatory": 1},
                        "tempSel": {"typology": "range", "minimumValue": 20, "maximumValue": 90,
                                    "incrementValue": 10, "defaultValue": 40, "mandatory": 1},
                        "spinSpeed": {"typology": "enum", "enumValues": ["400", "800", "1200"],
                                      "defaultValue": "800"}
                    }
                },
                "PROGRAMS.WM.ECO": {
                    "description": "d", "protocolType": "p",
                    "parameters": {
                        "prCode": {"typology": "fixed", "fixedValue": "7", "mandatory": 1},
                        "tempSel": {"typology": "range", "minimumValue": 20, "maximumValue": 60,
                                    "incrementValue": 20, "defaultValue": 40, "mandatory": 1}
                    }
                }
            },
            "stopProgram": {
                "description": "d", "protocolType": "p",
                "parameters": {
                    "onOffStatus": {"typology": "fixed", "fixedValue": "0", "mandatory": 1}
                }
            }
        })
    }

    fn appliance() -> Appliance {
        let mut appliance = Appliance::new(&json!({
            "applianceTypeName": "WM",
            "macAddress": "aa-bb-cc",
            "modelName": "HW80",
            "brand": "hAIER",
            "nickName": "xX-1",
            "serialNumber": "3100ABCDEF0123456789",
            "applianceModelId": "1234",
            "attributes": [{"parName": "tempSel", "parValue": "60"}]
        }));
        appliance.load_commands(&schema());
        appliance
    }

    #[test]
    fn test_identity() {
        let appliance = appliance();
        assert_eq!(appliance.kind(), ApplianceKind::WashingMachine);
        assert_eq!(appliance.brand(), "Haier");
        assert_eq!(appliance.nick_name(), "HW80");
        assert_eq!(appliance.code(), "3100ABCDEF0");
        assert_eq!(appliance.model_id(), 1234);
        assert_eq!(appliance.unique_id(), "aa-bb-cc");
        assert_eq!(appliance.options()["favouriteSupported"], 1);
        assert_eq!(appliance.additional_data()["dictionaryId"], "42");
    }

    #[test]
    fn test_failed_schema_is_ignored() {
        let mut appliance = Appliance::new(&json!({"applianceTypeName": "WM"}));
        appliance.load_commands(&json!({"resultCode": "1", "stopProgram": {}}));
        assert!(appliance.commands().is_empty());
    }

    #[test]
    fn test_settings_synced_from_initial_attributes() {
        let appliance = appliance();
        let settings = appliance.settings();
        assert_eq!(settings["settings.tempSel"].value(), ParamValue::Number(60.0));
        assert_eq!(settings["startProgram.spinSpeed"].value(), ParamValue::from("800"));
        assert!(settings.contains_key("stopProgram.onOffStatus"));
        assert!(appliance.available_settings().contains(&"startProgram.program".to_string()));
    }

    #[test]
    fn test_placeholder_for_missing_category_parameter() {
        let mut appliance = appliance();
        appliance.set_setting("startProgram.program", "eco").unwrap();
        let settings = appliance.settings();
        assert_eq!(settings["startProgram.spinSpeed"].key(), "");
        assert_eq!(settings["startProgram.tempSel"].values(), vec!["20", "40", "60"]);
    }

    #[test]
    fn test_set_setting_errors() {
        let mut appliance = appliance();
        assert!(matches!(
            appliance.set_setting("nothing", 1),
            Err(ApplianceError::UnknownSetting(_))
        ));
        assert!(matches!(
            appliance.set_setting("washProgram.tempSel", 1),
            Err(ApplianceError::UnknownCommand(_))
        ));
        assert!(matches!(
            appliance.set_setting("startProgram.tempSel", 65),
            Err(ApplianceError::Command(CommandError::Validation(_)))
        ));
    }

    #[test]
    fn test_attributes_and_program_name() {
        let mut appliance = appliance();
        appliance.load_attributes(&json!({
            "shadow": {"parameters": {
                "prCode": {"parNewVal": "7"},
                "machMode": {"parNewVal": "3"}
            }},
            "lastConnEvent": {"category": "CONNECTED"},
            "activity": {"id": 1}
        }));
        assert_eq!(appliance.attribute("programName").unwrap().raw(), "eco");
        assert_eq!(appliance.attribute("connected").unwrap().raw(), "1");
        assert_eq!(appliance.attribute("pause").unwrap().raw(), "1");
        assert_eq!(appliance.attribute("active").unwrap().raw(), "1");

        appliance.load_attributes(&json!({
            "shadow": {"parameters": {"prCode": {"parNewVal": "0"}}},
            "lastConnEvent": {"category": "DISCONNECTED"}
        }));
        assert_eq!(appliance.attribute("programName").unwrap().raw(), "No Program");
        assert_eq!(appliance.attribute("machMode").unwrap().raw(), "0");
    }

    #[test]
    fn test_update_throttle() {
        let mut appliance = appliance();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert!(appliance.update_at(&json!({}), false, start));
        assert!(!appliance.update_at(&json!({}), false, start + TimeDelta::seconds(3)));
        assert!(appliance.update_at(&json!({}), true, start + TimeDelta::seconds(3)));
        assert!(appliance.update_at(&json!({}), false, start + TimeDelta::seconds(9)));
    }

    #[test]
    fn test_sync_params_to_command() {
        let mut appliance = appliance();
        appliance.load_attributes(&json!({"shadow": {"parameters": {
            "tempSel": {"parNewVal": "30"},
            "spinSpeed": {"parNewVal": "1200"},
            "soundLevel": {"parNewVal": "off"}
        }}}));
        appliance.sync_params_to_command("startProgram");
        let start = appliance.command("startProgram").unwrap().active();
        assert_eq!(start.parameter("tempSel").unwrap().value(), ParamValue::Number(30.0));
        assert_eq!(start.parameter("spinSpeed").unwrap().value(), ParamValue::from("1200"));

        // Invalid values are skipped
        appliance.sync_params_to_command("settings");
        let settings = appliance.command("settings").unwrap().active();
        assert_eq!(settings.parameter("soundLevel").unwrap().value(), ParamValue::from("1"));
    }

    #[test]
    fn test_sync_command() {
        let mut appliance = appliance();
        appliance.set_setting("settings.soundLevel", "2").unwrap();
        appliance.sync_command("settings", Some(&["startProgram"]), &SyncFilter::Mandatory);
        let start = appliance.command("startProgram").unwrap().active();
        // tempSel is mandatory in settings and takes over its bounds and value
        assert_eq!(start.parameter("tempSel").unwrap().value(), ParamValue::Number(60.0));
        assert!(start.parameter("soundLevel").is_none());

        let mut appliance = self::appliance();
        appliance.sync_command("settings", None, &SyncFilter::Only(vec!["soundLevel".to_string()]));
        let start = appliance.command("startProgram").unwrap().active();
        assert_eq!(start.parameter("tempSel").unwrap().value(), ParamValue::Number(40.0));
    }

    #[tokio::test]
    async fn test_send() {
        let mut appliance = appliance();
        appliance.set_setting("startProgram.tempSel", 60).unwrap();
        let transport = Recorder::new("0");
        appliance.send(&transport, "startProgram", false).await.unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["commandName"], "startProgram");
        assert_eq!(sent[0]["programName"], "PROGRAMS.WM.COTTONS");
        assert_eq!(sent[0]["parameters"]["tempSel"], "60");
        assert_eq!(sent[0]["applianceOptions"]["favouriteSupported"], 1);
        assert_eq!(appliance.attribute("tempSel").unwrap().raw(), "60");
        assert!(appliance.attribute("tempSel").unwrap().is_locked());
    }

    #[tokio::test]
    async fn test_send_specific() {
        let mut appliance = appliance();
        let transport = Recorder::new("0");
        appliance
            .send_specific(&transport, "startProgram", &["spinSpeed"])
            .await
            .unwrap();
        let sent = transport.sent.lock().unwrap();
        let parameters = sent[0]["parameters"].as_object().unwrap();
        assert!(parameters.contains_key("spinSpeed"));
        assert!(parameters.contains_key("prCode"));
        assert!(!parameters.contains_key("program"));
    }

    #[tokio::test]
    async fn test_send_rejected() {
        let mut appliance = appliance();
        let transport = Recorder::new("1");
        let err = appliance.send(&transport, "stopProgram", true).await.unwrap_err();
        match err {
            ApplianceError::Api { message, payload } => {
                assert_eq!(message, "Error sending command data");
                assert!(payload.contains("\"commandName\": \"stopProgram\""));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(matches!(
            appliance.send(&transport, "washProgram", true).await,
            Err(ApplianceError::UnknownCommand(_))
        ));
    }
}
