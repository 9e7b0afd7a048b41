mod cli;
mod commands;
mod session;

use std::process::ExitCode;

use customizer_config::{CustomizerConfig, LogLevel};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::Command;

/// `RUST_LOG` plus `directive`, falling back to the default level when
/// `directive` does not parse.
fn log_filter(directive: &str) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match directive
        .parse::<Directive>()
        .or_else(|_| LogLevel::default().directive().parse())
    {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

fn init_tracing(directive: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directive))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    // Config is read first so its [logging] level can seed the filter.
    let loaded = commands::load(args.config.as_deref());
    let directive = match (&args.log_level, &loaded) {
        (Some(level), _) => level.clone(),
        (None, Ok(config)) => config.logging.level.directive().to_string(),
        (None, Err(_)) => LogLevel::default().directive().to_string(),
    };
    init_tracing(&directive);

    tracing::info!("customizer v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }

    let config = match (loaded, &args.command) {
        (Ok(config), _) => config,
        (Err(e), Command::CheckConfig) => {
            tracing::error!("Config invalid: {e}");
            return ExitCode::FAILURE;
        }
        (Err(e), _) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            CustomizerConfig::default()
        }
    };

    let result = match args.command {
        Command::Render { settings, out } => {
            commands::render(&config, &settings, out.as_deref()).map(|css| {
                if out.is_none() {
                    print!("{css}");
                }
            })
        }
        Command::Sync { settings } => commands::sync(&config, &settings).await,
        Command::CheckConfig => {
            println!("{}", commands::check_config(&config));
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_uses_given_directive() {
        let filter = log_filter("customizer=debug").to_string().to_lowercase();
        assert!(filter.contains("customizer=debug"));
    }

    #[test]
    fn unparsable_directive_falls_back_to_default_level() {
        let filter = log_filter("customizer=[bogus").to_string().to_lowercase();
        assert!(filter.contains(LogLevel::default().directive()));
    }
}
