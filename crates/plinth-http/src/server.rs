//! Server configuration and serve loop.

use std::net::SocketAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use plinth_runtime::RuntimeApi;

use crate::router::router;

/// Wire-surface settings; everything else about the runtime is decided by
/// the host that assembles the [`RuntimeApi`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpServerConfig {
    pub bind_addr: SocketAddr,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 34904)),
        }
    }
}

/// Serve the wire API until ctrl-c.
pub async fn serve(api: Arc<RuntimeApi>, config: HttpServerConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, app_id = %api.app_id(), "plinth runtime listening");
    axum::serve(listener, router(api))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install shutdown handler");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_the_loopback_listener() {
        let config = HttpServerConfig::default();
        assert_eq!(config.bind_addr.port(), 34904);
        assert!(config.bind_addr.ip().is_loopback());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: HttpServerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.bind_addr, HttpServerConfig::default().bind_addr);

        let config: HttpServerConfig =
            serde_json::from_str(r#"{"bindAddr":"0.0.0.0:9000"}"#).unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
    }
}
