//! arrivalseq CLI - offline driver for the arrival sequencing engine.
//!
//! Replays recorded or hand-written scenarios, validates airport
//! configurations, and manages the settings file.

mod commands;
mod error;
mod output;
mod runner;
mod scenario;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::run::RunArgs;
use commands::settings::SettingsCommands;

#[derive(Parser)]
#[command(name = "arrivalseq")]
#[command(version = arrivalseq::VERSION)]
#[command(about = "Arrival sequencing engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario and print the sequence after each step
    Run {
        /// Airport configuration (JSON)
        #[arg(long)]
        airport: PathBuf,

        /// Scenario file (JSON)
        #[arg(long)]
        scenario: PathBuf,

        /// Settings file to use instead of ~/.arrivalseq/settings.ini
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Enable debug logging to stdout
        #[arg(long)]
        debug: bool,

        /// Print one JSON snapshot per step instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Load and validate an airport configuration
    Validate {
        /// Airport configuration (JSON)
        #[arg(long)]
        airport: PathBuf,
    },

    /// Inspect or create the settings file
    Settings {
        /// Settings file to use instead of ~/.arrivalseq/settings.ini
        #[arg(long, global = true)]
        file: Option<PathBuf>,

        #[command(subcommand)]
        command: SettingsCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            airport,
            scenario,
            settings,
            debug,
            json,
        } => commands::run::run(RunArgs {
            airport,
            scenario,
            settings,
            debug,
            json,
        }),
        Commands::Validate { airport } => commands::validate::run(&airport),
        Commands::Settings { file, command } => commands::settings::run(command, file.as_deref()),
    };

    if let Err(e) = result {
        e.exit();
    }
}
