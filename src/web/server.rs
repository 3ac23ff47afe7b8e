//! Web server for the demo API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::{Result, Toolkit, ToolkitError};

use super::handlers::AppState;
use super::router::{create_health_router, create_router};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| {
                ToolkitError::Configuration(format!(
                    "invalid server address {}:{}: {}",
                    config.server.host, config.server.port, e
                ))
            })?;

        let toolkit = Toolkit::new(config.toolkit.clone());
        let app_state = AppState::new(toolkit, &config.files);

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get the application state.
    pub fn app_state(&self) -> &Arc<AppState> {
        &self.app_state
    }

    /// Build the full router.
    pub fn router(&self) -> Router {
        create_router(self.app_state.clone()).merge(create_health_router())
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
