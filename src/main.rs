//! Somnus: insomnia risk screening in the terminal.
//!
//! Main entry point for the terminal application.

use anyhow::{Context, Result};
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use somnus::adapters::sanitize::RedactingMakeWriter;
use somnus::config::Config;
use somnus::tui::App;

fn main() -> Result<()> {
    let config = Config::from_env_or_default();

    // Logging to the terminal would corrupt the TUI (alternate screen):
    // interactive sessions log to a file, everything else to stdout.
    let interactive = std::io::stdout().is_terminal();

    let (writer, _guard) = if config.log_mode.use_file(interactive) {
        if let Some(parent) = config.log_file.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .with_context(|| format!("opening log file {}", config.log_file.display()))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(RedactingMakeWriter::new(writer)))
        .init();

    tracing::info!(
        "Starting Somnus (engine={}, language={})",
        config.engine,
        config.language
    );

    let mut app = App::new(config);
    app.run()?;

    tracing::info!("Somnus shutdown complete.");
    Ok(())
}
