//! # hOn
//!
//! Appliance shell around [`hon_core`]: live telemetry, appliance-type
//! behaviour and the send path to the vendor cloud.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                         hon                              │
//! │  ┌──────────────┐  ┌──────────────┐  ┌────────────────┐  │
//! │  │ fixtures     │  │ attributes   │  │ kind           │  │
//! │  │ (JSON files) │  │ (telemetry)  │  │ (WM, OV, ...)  │  │
//! │  └──────┬───────┘  └──────┬───────┘  └───────┬────────┘  │
//! │         ▼                 ▼                  ▼           │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │                  Appliance                         │  │
//! │  │  - command groups (hon_core)                       │  │
//! │  │  - settings, sync between telemetry and commands   │  │
//! │  └───────────────────────┬────────────────────────────┘  │
//! │                          ▼                               │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │  CommandTransport (async trait)                    │  │
//! │  │  - DryRunTransport logs instead of sending         │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example: Sending a Program
//!
//! ```rust,no_run
//! use hon::{Appliance, DryRunTransport};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), hon::ApplianceError> {
//!     let mut appliance = Appliance::from_dir(Path::new("data/washing_machine"))?;
//!     appliance.set_setting("startProgram.program", "eco")?;
//!     appliance.set_setting("startProgram.temp", 40)?;
//!     appliance.send(&DryRunTransport, "startProgram", false).await
//! }
//! ```
//!
//! ## Command-Line Interface
//!
//! See [`Cli`]. The `hon` binary works on a directory of recorded API
//! responses (see [`fixtures`]):
//!
//! - `hon --import DIR dump` - all settings and their values
//! - `hon --import DIR set startProgram.temp 40` - change a setting
//! - `hon --import DIR send startProgram` - dry-run send
//! - `hon --import DIR programs` - program codes and names

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod appliance;
pub mod attributes;
pub mod fixtures;
pub mod kind;
pub mod transport;

pub use appliance::{Appliance, ApplianceError, SyncFilter};
pub use attributes::Attribute;
pub use fixtures::{FixtureError, FixtureSet};
pub use kind::ApplianceKind;
pub use transport::{CommandTransport, DryRunTransport, TransportError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Clone, Debug)]
#[command(version, about)]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,

    /// Directory with recorded appliance data
    #[arg(short, long, default_value = ".")]
    pub import: PathBuf,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum Commands {
    /// Show all settings (the default)
    Dump {
        /// Only list the setting keys of all categories
        #[arg(long, default_value_t = false)]
        keys: bool,
    },
    /// Change a setting, given as `command.parameter`, and show the resulting request
    Set { setting: String, value: String },
    /// Send a command through the dry-run transport
    Send {
        command: String,

        /// Only send mandatory parameters
        #[arg(long, default_value_t = false)]
        mandatory: bool,
    },
    /// Show the program codes known to `startProgram`
    Programs,
}
