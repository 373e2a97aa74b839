//! posemu CLI - host and inspect the waypoint-replay position service.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "posemu")]
#[command(version = posemu::VERSION)]
#[command(about = "Replay a recorded track as an emulated position receiver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the position service and print each sample until Ctrl+C
    Run(RunArgs),

    /// Parse a GPX track file and list its waypoints
    Track {
        /// Path to the .gpx file
        file: PathBuf,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Track { file } => commands::track::run(file),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
