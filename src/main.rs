use clap::{Parser, Subcommand};

mod commands;
mod output;
mod tty;

use commands::{config, run, GlobalArgs};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "textpatch")]
#[command(version = VERSION)]
#[command(about = "Replace a literal string in every matching source file under a directory")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Patch matching files in place (default when no command is given)
    Run(run::RunArgs),
    /// Inspect textpatch configuration
    Config(config::ConfigArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Run(run::RunArgs::default()));

    let (json_result, exit_code) = commands::run_json(command, &global);

    if let Err(err) = output::print_json_result(json_result) {
        eprintln!("{}", err);
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
