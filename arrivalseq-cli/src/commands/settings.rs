//! Settings file CLI commands.

use std::path::Path;

use arrivalseq::config::{settings_file_path, SettingsFile};
use clap::Subcommand;

use crate::error::CliError;

/// Settings subcommands.
#[derive(Debug, Subcommand)]
pub enum SettingsCommands {
    /// Show the settings file path
    Path,

    /// Print the effective settings as INI
    Show,

    /// Write the default settings file if it doesn't exist
    Init {
        /// Overwrite an existing file with defaults
        #[arg(long)]
        force: bool,
    },
}

/// Run a settings subcommand.
pub fn run(command: SettingsCommands, settings_path: Option<&Path>) -> Result<(), CliError> {
    let path = settings_path
        .map(Path::to_path_buf)
        .unwrap_or_else(settings_file_path);

    match command {
        SettingsCommands::Path => {
            println!("{}", path.display());
        }
        SettingsCommands::Show => {
            let settings = SettingsFile::load_from(&path)?;
            print!("{}", settings.to_ini_string());
        }
        SettingsCommands::Init { force } => {
            if path.exists() && !force {
                println!("Settings file already exists: {}", path.display());
                println!("Use --force to overwrite it with defaults.");
            } else {
                SettingsFile::default().save_to(&path)?;
                println!("✓ Wrote default settings to {}", path.display());
            }
        }
    }

    Ok(())
}
