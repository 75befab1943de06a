//! Sending commands to the appliance
//!
//! The HTTP and MQTT plumbing of the vendor cloud lives outside this crate.
//! [`CommandTransport`] is the seam: it receives the complete JSON body of a
//! `send` call and returns the decoded response. [`DryRunTransport`] logs the
//! body instead of sending it.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use hon_core::CommandRequest;
use serde_json::{json, Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Post a command body, returning the response payload
    async fn send_command(&self, body: &Value) -> Result<Value, TransportError>;
}

/// Appliance identity stamped on every outgoing command
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub mac_address: &'a str,
    pub appliance_type: &'a str,
    pub options: &'a Map<String, Value>,
}

/// Build the body of a `send` call
pub fn envelope(request: &CommandRequest, target: Target<'_>, now: DateTime<Utc>) -> Value {
    let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, false);
    let mut body = json!({
        "macAddress": target.mac_address,
        "timestamp": timestamp,
        "commandName": request.command_name,
        "transactionId": format!("{}_{}", target.mac_address, timestamp),
        "applianceOptions": target.options,
        "attributes": {
            "channel": "mobileApp",
            "origin": "standardProgram",
            "energyLabel": "0"
        },
        "ancillaryParameters": request.ancillary_parameters,
        "parameters": request.parameters,
        "applianceType": target.appliance_type,
    });
    if request.command_name == "startProgram" && !request.category_name.is_empty() {
        body["programName"] = Value::String(request.program_name());
    }
    body
}

/// Whether a response reports success, with or without its `payload` envelope
pub fn is_success(response: &Value) -> bool {
    let response = response.get("payload").unwrap_or(response);
    response.get("resultCode").and_then(hon_core::value::scalar_text).as_deref() == Some("0")
}

/// Logs commands instead of sending them and always reports success
#[derive(Debug, Default, Clone)]
pub struct DryRunTransport;

#[async_trait]
impl CommandTransport for DryRunTransport {
    async fn send_command(&self, body: &Value) -> Result<Value, TransportError> {
        let pretty = serde_json::to_string_pretty(body)
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;
        log::info!("Dry run, not sending:\n{}", pretty);
        Ok(json!({"resultCode": "0"}))
    }
}
