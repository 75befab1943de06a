//! # hOn Core
//!
//! Platform-independent command model for hOn connected appliances
//! (washing machines, dryers, ovens, fridges, ...).
//!
//! This crate contains the pure model with **zero I/O dependencies**: it
//! turns the command schema an appliance publishes into typed, validated
//! parameters, wires the schema's program rules between them and produces
//! the parameter sets that are sent back to the appliance.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  hon-core (pure model, no tokio/async deps)                 │
//! │  ├── loader/     (schema -> command groups, favourites,     │
//! │  │                history replay)                           │
//! │  ├── group/      (categories + active category)             │
//! │  ├── command/    (parameters, rule cascade, requests)       │
//! │  ├── parameter/  (fixed / range / enum / program)           │
//! │  └── rules/      (programRules parsing)                     │
//! └─────────────────────────────────────────────────────────────┘
//!                 ▲
//!    ┌────────────┴──────────────────────────┐
//!    │  hon (appliance, telemetry, transport, │
//!    │       fixtures, CLI)                   │
//!    └───────────────────────────────────────┘
//! ```
//!
//! ## Example: Changing a Program Setting
//!
//! ```rust
//! use hon_core::{load_commands, ParamValue};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "startProgram": {
//!         "PROGRAMS.WM.COTTONS": {
//!             "description": "Cottons", "protocolType": "raw",
//!             "parameters": {
//!                 "temp": {"typology": "range", "minimumValue": 20, "maximumValue": 90,
//!                          "incrementValue": 10, "defaultValue": 40, "mandatory": 1}
//!             }
//!         }
//!     }
//! });
//! let mut loaded = load_commands(schema.as_object().unwrap());
//! let start = loaded.commands.get_mut("startProgram").unwrap();
//! start.set_value("temp", 60).unwrap();
//! assert!(start.set_value("temp", 65).is_err());
//! assert_eq!(start.active().parameter("temp").unwrap().value(), ParamValue::Number(60.0));
//! ```

pub mod command;
pub mod error;
pub mod group;
pub mod loader;
pub mod parameter;
pub mod rules;
pub mod schema;
pub mod value;

pub use command::{Command, CommandRequest, MAX_CASCADE_DEPTH};
pub use error::{CommandError, ValidationError};
pub use group::CommandGroup;
pub use loader::{
    add_favourites, clean_name, load_commands, recover_last_command_states, CommandLoader,
    LoadedCommands,
};
pub use parameter::{
    EnumParameter, FixedParameter, Parameter, ParameterSnapshot, ProgramParameter, RangeParameter,
};
pub use rules::{Rule, RuleEffect, RuleSet};
pub use schema::{Favourite, HistoryEntry, RecordedCommand};
pub use value::ParamValue;
