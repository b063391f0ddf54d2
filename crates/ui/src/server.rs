//! HTTP host for the UI pages.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::{Result, anyhow};
use autotask_tools::NodeRunner;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::pages::{UiState, router};

/// Host configuration for the UI server.
#[derive(Clone)]
pub struct UiServer {
    bind_address: SocketAddr,
    browser_address: Option<String>,
    runner: Arc<dyn NodeRunner>,
}

impl UiServer {
    /// Create a UI server bound to the provided address.
    pub fn new(bind_address: SocketAddr, runner: Arc<dyn NodeRunner>) -> Self {
        Self {
            bind_address,
            browser_address: None,
            runner,
        }
    }

    /// Host name advertised to browsers in place of the bind address.
    pub fn with_browser_address(mut self, browser_address: impl Into<String>) -> Self {
        self.browser_address = Some(browser_address.into());
        self
    }

    /// Start serving and return a handle for inspection and shutdown.
    pub async fn start(self) -> Result<RunningUiServer> {
        let listener = tokio::net::TcpListener::bind(self.bind_address)
            .await
            .map_err(|error| anyhow!("failed to bind UI server to {}: {error}", self.bind_address))?;
        let bound_address = listener.local_addr()?;
        let app = router(UiState::new(self.runner));

        let cancellation_token = CancellationToken::new();
        let server_handle = tokio::spawn({
            let shutdown = cancellation_token.child_token();
            async move {
                if let Err(error) = axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        shutdown.cancelled().await;
                    })
                    .await
                {
                    error!("UI server terminated: {error}");
                }
            }
        });

        info!(address = %bound_address, "UI server listening");
        Ok(RunningUiServer {
            bound_address,
            browser_address: self.browser_address,
            cancellation_token,
            server_handle,
        })
    }
}

impl std::fmt::Debug for UiServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiServer")
            .field("bind_address", &self.bind_address)
            .field("browser_address", &self.browser_address)
            .finish_non_exhaustive()
    }
}

/// Runtime handle for a running UI server.
#[derive(Debug)]
pub struct RunningUiServer {
    bound_address: SocketAddr,
    browser_address: Option<String>,
    cancellation_token: CancellationToken,
    server_handle: JoinHandle<()>,
}

impl RunningUiServer {
    pub fn bound_address(&self) -> SocketAddr {
        self.bound_address
    }

    /// URL a browser should open to reach the pages.
    pub fn browser_url(&self) -> String {
        let port = self.bound_address.port();
        match &self.browser_address {
            Some(host) => format!("http://{host}:{port}/"),
            None if self.bound_address.ip().is_unspecified() => format!("http://localhost:{port}/"),
            None => format!("http://{}/", self.bound_address),
        }
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn stop(self) -> Result<()> {
        self.cancellation_token.cancel();
        self.server_handle
            .await
            .map_err(|error| anyhow!("UI server task failed: {error}"))?;
        info!("UI server stopped");
        Ok(())
    }
}

/// Combine a host and a port into a bind address. `localhost` maps to the IPv4 loopback.
pub fn resolve_bind_address(address: &str, port: u16) -> Result<SocketAddr> {
    let address = address.trim();
    let ip: IpAddr = if address.eq_ignore_ascii_case("localhost") {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    } else {
        address
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse()
            .map_err(|error| anyhow!("invalid UI bind address '{address}': {error}"))?
    };
    Ok(SocketAddr::new(ip, port))
}
