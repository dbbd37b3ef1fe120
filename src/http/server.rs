//! Concrete HTTP server bootstrap.
//!
//! # Responsibilities
//! - Implement the bootstrap contract for an Axum-based server
//! - Bind the listener, serve with graceful shutdown, expose the handle
//! - Announce the instance to the discovery registry after creation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{ListenerConfig, ServiceConfig};
use crate::lifecycle::bootstrap::{Bootstrap, LifecycleContext, ServerHandle};
use crate::lifecycle::engine::{ServiceState, StatePatch};
use crate::lifecycle::error::ServiceResult;
use crate::registry::announcer;

/// Bootstrap implementation serving a minimal HTTP API.
pub struct ApiBootstrap {
    listener: ListenerConfig,
}

impl ApiBootstrap {
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            listener: config.listener.clone(),
        }
    }

    /// Build the router, mounted under the configured base path.
    fn build_router(base_path: &str, timeout: Duration) -> Router {
        let api = Router::new()
            .route("/", get(service_info))
            .route("/health", get(health));

        let app = if base_path.is_empty() || base_path == "/" {
            api
        } else {
            Router::new().nest(base_path, api)
        };

        app.layer(TimeoutLayer::new(timeout))
            .layer(TraceLayer::new_for_http())
    }
}

#[async_trait]
impl Bootstrap for ApiBootstrap {
    async fn create(&self, cx: &mut LifecycleContext<'_>) -> ServiceResult<()> {
        // 1. Bind
        let listener = TcpListener::bind(&self.listener.bind_address).await?;
        let addr = listener.local_addr()?;

        // 2. Serve with graceful shutdown
        let app = Self::build_router(
            &cx.state.api.base_path,
            Duration::from_secs(self.listener.request_timeout_secs),
        );
        let (close_tx, close_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = close_rx.await;
                })
                .await
        });

        let handle: Arc<dyn ServerHandle> = Arc::new(ApiServerHandle {
            host: addr.ip().to_string(),
            port: addr.port(),
            close_tx: Mutex::new(Some(close_tx)),
            task: Mutex::new(Some(task)),
        });

        // 3. Publish the handle
        cx.state
            .set_state(StatePatch::new().server(Some(handle)).running(true));

        tracing::info!(address = %addr, "server listening");

        // 4. Announce
        if let Some(response) = self.announce(cx.state).await? {
            tracing::debug!(response = %response, "registry acknowledged registration");
        }

        Ok(())
    }

    async fn announce(&self, state: &ServiceState) -> ServiceResult<Option<Value>> {
        announcer::announce(state).await
    }
}

/// Handle to the running Axum server.
struct ApiServerHandle {
    host: String,
    port: u16,
    close_tx: Mutex<Option<oneshot::Sender<()>>>,
    task: Mutex<Option<JoinHandle<std::io::Result<()>>>>,
}

#[async_trait]
impl ServerHandle for ApiServerHandle {
    fn kind(&self) -> &str {
        "api"
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    async fn close(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(close_tx) = self.close_tx.lock().await.take() else {
            // Already closed.
            return Ok(());
        };
        let _ = close_tx.send(());

        if let Some(task) = self.task.lock().await.take() {
            task.await??;
        }

        Ok(())
    }
}

async fn service_info() -> Json<Value> {
    Json(json!({ "type": "api", "status": "running" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
