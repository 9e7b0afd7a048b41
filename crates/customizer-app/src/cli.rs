use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Customizer: render and persist console appearance settings.
#[derive(Parser, Debug)]
#[command(name = "customizer", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log directive override (e.g. `customizer=debug`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the style text for a settings file.
    Render {
        /// JSON object of setting key -> value.
        settings: PathBuf,
        /// Write the CSS here instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Persist every setting in a file to the configured endpoint.
    Sync {
        /// JSON object of setting key -> value.
        settings: PathBuf,
    },
    /// Load and validate the config, then print it as JSON.
    CheckConfig,
}

pub fn parse() -> Args {
    Args::parse()
}
