mod config;
mod http;
mod model;
mod server;
mod service;
mod store;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use config::{Config, LogConfig};
use server::Server;
use tracing::info;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "boxes-server")]
#[command(about = "HTTP service for a JSON-file backed box collection")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<String>,
    /// Listening address, overrides `server_addr`
    #[arg(long)]
    bind: Option<String>,
    /// Box collection file, overrides `data_file`
    #[arg(long)]
    data_file: Option<PathBuf>,
    /// HTTPS port for redirects, overrides `https_port`
    #[arg(long)]
    https_port: Option<u16>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(bind) = self.bind {
            config.server_addr = bind;
        }
        if let Some(data_file) = self.data_file {
            config.data_file = data_file;
        }
        if self.https_port.is_some() {
            config.https_port = self.https_port;
        }
        Ok(config)
    }
}

/// Non-blocking writer appending to `path`, never rotated
fn file_writer(path: &str) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    let path = Path::new(path);
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file '{}' has no file name", path.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Install the global subscriber. The returned guard flushes file output
/// when dropped and must outlive the server.
fn init_logging(log: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    match &log.file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            builder.with_ansi(false).with_writer(writer).init();
            Ok(Some(guard))
        }
        None => {
            builder.init();
            Ok(None)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Args::parse().into_config()?;
    let _log_guard = init_logging(&config.log)?;

    info!("Starting boxes-server");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let server = Server::start(&config).await?;
    info!("Server listening on: {}", server.local_addr());

    server.run().await?;

    Ok(())
}
