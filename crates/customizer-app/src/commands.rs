//! Subcommand implementations.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use customizer_common::{ConfigError, CustomizerError, SettingValue};
use customizer_config::{config_to_json, load_config, load_config_from, CustomizerConfig};
use customizer_dispatch::HttpTransport;
use customizer_render::{FileSink, MemorySink, PipelineBuilder};
use tracing::info;

use crate::session::Session;

/// Load from `--config` when given, else from the platform default path.
pub fn load(path: Option<&Path>) -> Result<CustomizerConfig, ConfigError> {
    match path {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
}

/// Read a JSON object of setting key -> value.
pub fn read_settings(path: &Path) -> Result<BTreeMap<String, SettingValue>, CustomizerError> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| CustomizerError::Settings(format!("{}: {e}", path.display())))
}

/// Render a settings file to CSS, returning the generated text.
///
/// Fails with [`CustomizerError::Io`] when `out` cannot be written.
/// Must run inside the Tokio runtime.
pub fn render(
    config: &CustomizerConfig,
    settings: &Path,
    out: Option<&Path>,
) -> Result<String, CustomizerError> {
    let settings = read_settings(settings)?;
    let builder = PipelineBuilder::from_config(&config.render);
    let pipeline = match out {
        Some(path) => builder.build(FileSink::new(path)),
        None => builder.build(MemorySink::new()),
    };

    pipeline.reload(settings);
    pipeline.flush_now()?;

    let css = pipeline.css();
    info!(rules = pipeline.cache_len(), length = css.len(), "settings rendered");
    Ok(css)
}

/// Persist every setting through the dispatcher and report the outcome.
pub async fn sync(config: &CustomizerConfig, settings: &Path) -> Result<(), CustomizerError> {
    let settings = read_settings(settings)?;
    let transport = HttpTransport::from_config(&config.endpoint)?;
    let session = Session::from_config(config, MemorySink::new(), Arc::new(transport));

    let tickets: Vec<_> = settings
        .iter()
        .map(|(key, value)| (key.clone(), session.on_setting_changed(key, value.clone())))
        .collect();

    let total = tickets.len();
    let mut failed = 0usize;
    for (key, ticket) in tickets {
        match ticket.await {
            Ok(_) => println!("saved   {key}"),
            Err(e) => {
                failed += 1;
                println!("failed  {key}: {e}");
            }
        }
    }

    let stats = session.dispatcher().stats();
    println!(
        "{}",
        serde_json::to_string_pretty(&stats).map_err(|e| CustomizerError::Other(e.to_string()))?
    );
    session.shutdown();

    if failed > 0 {
        return Err(CustomizerError::Other(format!(
            "{failed} of {total} settings failed to save"
        )));
    }
    Ok(())
}

pub fn check_config(config: &CustomizerConfig) -> String {
    config_to_json(config)
}
