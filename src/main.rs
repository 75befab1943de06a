//! hOn command-line tool
//!
//! Loads the recorded API responses of one appliance and inspects or
//! changes its command settings. Sending goes through the dry-run
//! transport, which logs the request body.
//!
//! ```bash
//! hon --import data/washing_machine dump
//! hon --import data/washing_machine --json set startProgram.program eco
//! hon -v --import data/washing_machine send startProgram
//! ```

use clap::Parser;
use hon::{Appliance, Cli, Commands, DryRunTransport};
use miette::{IntoDiagnostic, Result};
use serde_json::{json, Map, Value};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();
    log::debug!("hon {} reading {}", hon::VERSION, args.import.display());

    let mut appliance = Appliance::from_dir(&args.import).into_diagnostic()?;
    log::info!(
        "{} {} ({}), {} commands",
        appliance.brand(),
        appliance.model_name(),
        appliance.kind(),
        appliance.commands().len()
    );

    match args.command.clone().unwrap_or(Commands::Dump { keys: false }) {
        Commands::Dump { keys: true } => {
            let keys = appliance.available_settings();
            if args.json {
                print_json(&json!(keys))?;
            } else {
                keys.iter().for_each(|key| println!("{}", key));
            }
        }
        Commands::Dump { keys: false } => dump(&appliance, args.json)?,
        Commands::Set { setting, value } => {
            appliance.set_setting(&setting, value.as_str()).into_diagnostic()?;
            let command = setting.split('.').next().unwrap_or_default();
            let request = appliance.command_request(command, false).into_diagnostic()?;
            if args.json {
                print_json(&serde_json::to_value(&request).into_diagnostic()?)?;
            } else {
                println!("{} [{}]", request.command_name, request.category_name);
                for (key, value) in &request.parameters {
                    println!("  {}: {}", key, value);
                }
            }
        }
        Commands::Send { command, mandatory } => {
            appliance
                .send(&DryRunTransport, &command, mandatory)
                .await
                .into_diagnostic()?;
            println!("{} sent", command);
        }
        Commands::Programs => {
            let ids = appliance
                .command("startProgram")
                .map(|group| group.program_ids())
                .unwrap_or_default();
            if args.json {
                print_json(&json!(ids))?;
            } else {
                for (code, name) in ids {
                    println!("{:>4}  {}", code, name);
                }
            }
        }
    }
    Ok(())
}

fn dump(appliance: &Appliance, as_json: bool) -> Result<()> {
    let settings = appliance.settings();
    if as_json {
        let mut map = Map::new();
        for (key, parameter) in settings {
            map.insert(key, serde_json::to_value(parameter.snapshot()).into_diagnostic()?);
        }
        let attributes: Map<String, Value> = appliance
            .attributes()
            .iter()
            .map(|(key, attribute)| (key.clone(), Value::String(attribute.raw().to_string())))
            .collect();
        return print_json(&json!({
            "nickName": appliance.nick_name(),
            "code": appliance.code(),
            "settings": map,
            "attributes": attributes,
        }));
    }

    println!("{} ({})", appliance.nick_name(), appliance.code());
    for (key, parameter) in settings {
        println!("  {}: {}", key, parameter);
    }
    for (key, attribute) in appliance.attributes() {
        println!("  [{}] {}", key, attribute);
    }
    Ok(())
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}
