//! # Builder CLI
//!
//! Replays a gesture script and prints the resulting document.

use std::fs::File;
use std::io::{self, BufReader, Write};

use anyhow::Context;
use builder_cli::{replay, CliArgs, ReplayConfig};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing on stderr so stdout carries only the document.
///
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("builder_cli=info,builder_core=info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = ReplayConfig::from(args);

    match config.bounds {
        Some(bounds) => tracing::info!(
            "Canvas {}x{} at ({}, {})",
            bounds.width,
            bounds.height,
            bounds.left,
            bounds.top
        ),
        None => tracing::info!("Canvas unmeasured; only negative positions are clamped"),
    }

    let result = match &config.script {
        Some(path) => {
            tracing::debug!("Reading script from {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            replay(BufReader::new(file), &config)?
        }
        None => {
            tracing::debug!("Reading script from stdin");
            replay(io::stdin().lock(), &config)?
        }
    };

    let json = if config.pretty {
        serde_json::to_string_pretty(&*result.document)?
    } else {
        serde_json::to_string(&*result.document)?
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
