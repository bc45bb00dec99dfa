//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use tilefetch::config::{ConfigError, ConfigFileError};
use tilefetch::orchestrator::DownloadError;
use tilefetch::provider::ProviderError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Invalid command-line value
    Config(String),
    /// Config file could not be read or written
    ConfigFile(ConfigFileError),
    /// Resolved settings failed validation
    InvalidSettings(ConfigError),
    /// Download could not start or finish
    Download(DownloadError),
    /// Interactive prompt failed
    Prompt(String),
    /// Failed to read the tile directory
    Storage { path: PathBuf, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::ConfigFile(_) | CliError::InvalidSettings(_) => {
                eprintln!();
                eprintln!("Check the config file with: tilefetch config path");
            }
            CliError::Download(DownloadError::Provider(ProviderError::ClientBuild(_))) => {
                eprintln!();
                eprintln!("The HTTP client could not be created. Check the user_agent setting.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::InvalidSettings(e) => write!(f, "Invalid settings: {}", e),
            CliError::Download(e) => write!(f, "Download failed: {}", e),
            CliError::Prompt(msg) => write!(f, "Prompt failed: {}", msg),
            CliError::Storage { path, error } => {
                write!(f, "Failed to read '{}': {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::InvalidSettings(e) => Some(e),
            CliError::Download(e) => Some(e),
            CliError::Storage { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::InvalidSettings(e)
    }
}

impl From<DownloadError> for CliError {
    fn from(e: DownloadError) -> Self {
        CliError::Download(e)
    }
}
