//! CLI adapter for Mojifinder
//!
//! Parses the command line, layers it over the loaded configuration and
//! runs the server until an interrupt arrives.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (config, index) |
//!              +--------+---------+
//!                       |
//!                       v
//!              +------------------+
//!              |     server/      |
//!              | (TCP sessions)   |
//!              +--------+---------+
//!                       |
//!                       v
//!              +------------------+
//!              |      cli/        |
//!              | (clap adapter)   |
//!              +------------------+
//! ```

use crate::core::config::{Config, LogFormat};
use crate::core::error::{FinderError, Result};
use crate::core::index::CharIndex;
use crate::core::xdg::XdgDirs;
use crate::server::Supervisor;
use clap::Parser;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{error, info};

/// Mojifinder - find Unicode characters by name
///
/// Serves a line-oriented query protocol over TCP. Connect with `nc` or
/// `telnet`, type words from a character name (for example `cat face`)
/// and get every character whose name contains all of them.
#[derive(Parser, Debug)]
#[command(name = "mojifinder")]
#[command(version)]
#[command(about = "Find Unicode characters by name over TCP", long_about = None)]
pub struct Cli {
    /// Host or IP address to bind [default: 127.0.0.1]
    pub host: Option<String>,

    /// TCP port to bind [default: 2323]
    pub port: Option<u16>,

    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Name table in UnicodeData.txt layout instead of the bundled one
    #[arg(long, value_name = "FILE")]
    pub data_file: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Longest accepted query line in bytes
    #[arg(long, value_name = "BYTES")]
    pub max_line_length: Option<usize>,

    /// Close sessions idle at the prompt for this many seconds (0 = never)
    #[arg(long, value_name = "SECS")]
    pub idle_timeout: Option<u64>,
}

impl Cli {
    /// Load configuration and apply command-line overrides
    pub fn load_config(&self) -> Result<Config> {
        let xdg = XdgDirs::new();
        let mut config = Config::load_with_xdg(&xdg, self.config.as_deref())?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Command-line values take priority over every other source
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(data_file) = &self.data_file {
            config.index.data_file = Some(data_file.clone());
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if let Some(max_line_length) = self.max_line_length {
            config.server.max_line_length = max_line_length;
        }
        if let Some(idle_timeout) = self.idle_timeout {
            config.server.idle_timeout_sec = idle_timeout;
        }
    }
}

/// Serve until the process is interrupted
pub async fn run(config: Config) -> Result<()> {
    serve_until(config, wait_for_shutdown_signal()).await
}

/// Build the index, serve, and stop once `signal` resolves
pub async fn serve_until<F>(config: Config, signal: F) -> Result<()>
where
    F: Future<Output = std::io::Result<()>>,
{
    config.log_config();

    println!("Building index.");
    let index = Arc::new(CharIndex::from_config(&config.index)?);
    info!(
        "Indexed {} characters under {} words",
        index.len(),
        index.word_count()
    );

    let supervisor = Supervisor::bind(index, &config.server).await?;
    println!(
        "Serving on {}. Hit CTRL-C to stop.",
        supervisor.local_addr()
    );

    let handle = supervisor.shutdown_handle();
    let mut server = tokio::spawn(supervisor.serve());

    tokio::select! {
        received = signal => {
            handle.stop();
            if let Err(e) = received {
                error!("Failed to wait for shutdown signal: {}", e);
                flatten(server.await)?;
                return Err(e.into());
            }
            info!("Received shutdown signal");
        }
        joined = &mut server => return flatten(joined),
    }

    flatten(server.await)?;
    println!("\nServer shut down");
    Ok(())
}

fn flatten(joined: std::result::Result<Result<()>, JoinError>) -> Result<()> {
    joined.map_err(|e| FinderError::IoError(std::io::Error::other(e)))?
}

/// Resolve on SIGINT, SIGTERM, SIGQUIT or Ctrl-C
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigquit = signal(SignalKind::quit())?;
        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv() => {},
            _ = sigquit.recv() => {},
            _ = tokio::signal::ctrl_c() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
    }

    Ok(())
}
