use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Config;
use crate::http;
use crate::service::BoxService;
use crate::store::JsonFileStore;

/// HTTP server for the box API
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    router: Router,
}

impl Server {
    /// Open the box collection and bind the listener
    pub async fn start(config: &Config) -> anyhow::Result<Self> {
        let store = Arc::new(JsonFileStore::new(&config.data_file));
        info!("Box collection stored at {}", store.path().display());
        let service = BoxService::open(store).await?;

        let listener = TcpListener::bind(&config.server_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server bound to {}", local_addr);

        match config.https_port {
            Some(port) => info!("Redirecting plain HTTP requests to HTTPS port {}", port),
            None => info!("HTTPS redirection disabled"),
        }

        let router = http::router(Arc::new(service), config.https_port);

        Ok(Self {
            listener,
            local_addr,
            router,
        })
    }

    /// Get local listening address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve requests until Ctrl-C is received
    pub async fn run(self) -> std::io::Result<()> {
        info!("Server started, listening on {}", self.local_addr);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
