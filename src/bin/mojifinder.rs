//! Mojifinder server entry point
//!
//! ```bash
//! # Serve on 127.0.0.1:2323 with the bundled name table
//! mojifinder
//!
//! # Every named character, on all interfaces
//! mojifinder 0.0.0.0 2323 --data-file /usr/share/unicode/UnicodeData.txt
//! ```

use clap::Parser;
use mojifinder::cli::{run, Cli};
use mojifinder::core::config::{LogFormat, LoggingConfig};
use mojifinder::core::xdg::XdgDirs;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("mojifinder={}", config.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr) // stdout carries the banner lines
                    .with_ansi(std::io::stderr().is_terminal())
                    .compact(),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = cli.load_config().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    init_logging(&config.logging);
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    XdgDirs::new().log_paths();

    if let Err(e) = run(config).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
