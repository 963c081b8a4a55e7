use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

/// Installs the global subscriber. `log` records emitted by actix are
/// forwarded into `tracing` as part of `try_init`.
pub fn init() -> anyhow::Result<()> {
    let app_name = std::env::var("CARGO_BIN_NAME").unwrap_or(env!("CARGO_PKG_NAME").to_string());
    let env_filter = EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("INFO"));
    let formatting_layer = BunyanFormattingLayer::new(app_name, std::io::stdout);
    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
        .try_init()?;
    Ok(())
}
