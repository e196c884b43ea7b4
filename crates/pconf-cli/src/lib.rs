//! pconf command line front-end
//!
//! Loads a model snapshot, then diffs, fixes, validates or searches it for
//! cycles. The library half exists so the commands can be driven from tests.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod commands;
pub mod logging;
pub mod snapshot;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use pconf_delta::ReconcileConfig;
use pconf_model::QualifiedName;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Build the argument parser
#[must_use]
pub fn cli() -> Command {
    let model_arg = Arg::new("model")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Model snapshot (JSON, or YAML by extension)");

    Command::new("pconf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reconcile product configurations with their product types")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging unless PCONF_LOG is set"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Reconcile settings (TOML)"),
        )
        .subcommand(
            Command::new("delta")
                .about("Show differences between configurations and their types")
                .arg(model_arg.clone())
                .arg(
                    Arg::new("configuration")
                        .long("configuration")
                        .short('c')
                        .value_parser(value_parser!(QualifiedName))
                        .help("Only this configuration"),
                )
                .arg(
                    Arg::new("fix")
                        .long("fix")
                        .action(ArgAction::SetTrue)
                        .help("Apply the fixes"),
                )
                .arg(
                    Arg::new("write")
                        .long("write")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the resulting model to this file"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("cycles")
                .about("Find link cycles and supertype cycles")
                .arg(model_arg.clone())
                .arg(
                    Arg::new("root")
                        .long("root")
                        .value_parser(value_parser!(QualifiedName))
                        .help("Only search links reachable from this configuration"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate types, schemas and configurations")
                .arg(model_arg)
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

/// Read reconcile settings, defaults when `path` is `None`
///
/// # Errors
/// Returns error if the file cannot be read or parsed
pub fn load_config(path: Option<&Path>) -> Result<ReconcileConfig> {
    let Some(path) = path else {
        return Ok(ReconcileConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}

/// Run the parsed command line, writing reports to `out`
///
/// # Errors
/// Returns error if loading or a command fails
pub fn run(matches: &ArgMatches, out: &mut dyn Write) -> Result<ExitCode> {
    let config = load_config(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    tracing::debug!(?config, "reconcile settings");

    let Some((name, args)) = matches.subcommand() else {
        anyhow::bail!("no subcommand given");
    };
    let model_path = args
        .get_one::<PathBuf>("model")
        .context("missing model argument")?;

    match name {
        "delta" => {
            let mut model = snapshot::load_model(model_path)?;
            let options = commands::DeltaOptions {
                configuration: args.get_one::<QualifiedName>("configuration").cloned(),
                fix: args.get_flag("fix"),
                write: args.get_one::<PathBuf>("write").map(PathBuf::as_path),
                json: args.get_flag("json"),
            };
            commands::delta(&mut model, &config, &options, out)
        }
        "cycles" => {
            let model = snapshot::load_model(model_path)?;
            commands::cycles(&model, &config, args.get_one::<QualifiedName>("root"), out)
        }
        "validate" => {
            let model = snapshot::load_model(model_path)?;
            commands::validate(&model, args.get_flag("json"), out)
        }
        other => anyhow::bail!("unknown subcommand '{other}'"),
    }
}
