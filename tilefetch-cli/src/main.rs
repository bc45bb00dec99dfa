//! tilefetch CLI - Command-line interface
//!
//! Downloads map tiles for an area into a `<zoom>/<x>/<y>.<ext>` tree for
//! offline use in web map viewers.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::common::AreaArgs;
use commands::config::ConfigCommands;
use commands::download::DownloadArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "tilefetch")]
#[command(version, about = "Download map tiles for offline use", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.tilefetch/config.ini
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging regardless of RUST_LOG
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download every tile covering the area
    Download {
        #[command(flatten)]
        area: AreaArgs,

        /// Start without asking for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Show the tiles a download would fetch
    Plan {
        #[command(flatten)]
        area: AreaArgs,
    },

    /// Show file count and size of a tile directory
    Stats {
        /// Tile directory (default: configured output directory)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let runner = || CliRunner::new(cli.config.as_deref(), cli.debug);

    match cli.command {
        Commands::Download { area, yes } => {
            commands::download::run(DownloadArgs { area, yes }, &runner()?)
        }
        Commands::Plan { area } => commands::plan::run(area, &runner()?),
        Commands::Stats { output } => commands::stats::run(output, &runner()?),
        Commands::Config { command } => commands::config::run(command, cli.config.clone()),
    }
}
