//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show` and `config init`.

use std::path::Path;

use clap::Subcommand;
use posemu::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Print the effective configuration (file values over defaults)
    Show,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => run_show(),
        ConfigCommands::Init { force } => run_init(&config_file_path(), force),
    }
}

fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

fn run_show() -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    for line in describe(&config) {
        println!("{}", line);
    }
    Ok(())
}

fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if force {
        ConfigFile::default().save_to(path)?;
        println!("Wrote default configuration to {}", path.display());
    } else if ConfigFile::ensure_exists_at(path)? {
        println!("Created {}", path.display());
    } else {
        println!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Ok(())
}

fn describe(config: &ConfigFile) -> Vec<String> {
    let position = &config.position;
    let track_dir = position
        .track_dir
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| "(bundled)".to_string());

    vec![
        "[position]".to_string(),
        format!("  location = {}", position.location),
        format!("  track_dir = {}", track_dir),
        format!("  interval_secs = {}", position.interval_secs),
        format!("  use_gpsd = {}", position.use_gpsd),
        format!("  dispatch_listeners = {}", position.dispatch_listeners),
        String::new(),
        "[logging]".to_string(),
        format!("  file = {}", config.logging.file.display()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use posemu::position::Location;
    use tempfile::TempDir;

    #[test]
    fn test_describe_defaults() {
        let lines = describe(&ConfigFile::default());

        assert!(lines.contains(&"  location = boston".to_string()));
        assert!(lines.contains(&"  track_dir = (bundled)".to_string()));
        assert!(lines.contains(&"  interval_secs = 5".to_string()));
    }

    #[test]
    fn test_init_respects_existing_file_unless_forced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[position]\nlocation = test\n").unwrap();

        run_init(&path, false).unwrap();
        assert_eq!(
            ConfigFile::load_from(&path).unwrap().position.location,
            Location::Test
        );

        run_init(&path, true).unwrap();
        assert_eq!(
            ConfigFile::load_from(&path).unwrap().position.location,
            Location::Boston
        );
    }
}
