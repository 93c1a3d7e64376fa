use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::Path;

use textpatch::defaults::{self, Defaults};

use super::CmdResult;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display configuration (merged defaults + file)
    Show {
        /// Show only built-in defaults (ignore textpatch.json)
        #[arg(long)]
        builtin: bool,
        /// Read this config file instead of the global textpatch.json
        #[arg(long, conflicts_with = "builtin")]
        config: Option<String>,
    },
    /// Show the path to textpatch.json
    Path,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    defaults: Option<Defaults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
}

pub fn run(args: ConfigArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show { builtin, config } => show(builtin, config.as_deref()),
        ConfigCommand::Path => path(),
    }
}

fn show(builtin: bool, config: Option<&str>) -> CmdResult<ConfigOutput> {
    if builtin {
        return Ok((
            ConfigOutput {
                command: "config.show".to_string(),
                defaults: Some(defaults::builtin_defaults()),
                path: None,
                exists: None,
            },
            0,
        ));
    }

    if let Some(config_path) = config {
        let loaded = defaults::load_config_from(Path::new(config_path))?;
        return Ok((
            ConfigOutput {
                command: "config.show".to_string(),
                defaults: Some(loaded.defaults),
                path: Some(config_path.to_string()),
                exists: Some(true),
            },
            0,
        ));
    }

    Ok((
        ConfigOutput {
            command: "config.show".to_string(),
            defaults: Some(defaults::load_config().defaults),
            path: defaults::config_path().ok(),
            exists: Some(defaults::config_exists()),
        },
        0,
    ))
}

fn path() -> CmdResult<ConfigOutput> {
    Ok((
        ConfigOutput {
            command: "config.path".to_string(),
            defaults: None,
            path: Some(defaults::config_path()?),
            exists: Some(defaults::config_exists()),
        },
        0,
    ))
}
