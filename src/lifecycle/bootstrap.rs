//! Bootstrap contract for concrete server implementations.
//!
//! # Responsibilities
//! - Define the capability seam (`create`, `destroy`, optional `announce`)
//!   the lifecycle engine is parameterized over
//! - Define the collaborator contract a concrete server handle must expose
//! - Supply the standard teardown as the default `destroy`
//!
//! # Design Decisions
//! - Composition over inheritance: the engine holds one `Bootstrap`
//!   implementation; there is no base-class chain
//! - `create` has no usable default; calling it unimplemented is an error
//!   routed through the ERROR event
//! - STOP with no running server is a no-op and requests no exit; the
//!   process stays up

use async_trait::async_trait;
use serde_json::Value;

use crate::lifecycle::engine::{ServiceState, StatePatch};
use crate::lifecycle::error::{ServiceError, ServiceResult};
use crate::lifecycle::shutdown::{self, Shutdown};

/// Contract a concrete running server exposes to the lifecycle layer.
#[async_trait]
pub trait ServerHandle: Send + Sync {
    /// Server type identifier, announced to the registry.
    fn kind(&self) -> &str;

    /// Host the server is reachable on.
    fn host(&self) -> &str;

    /// Port the server is listening on.
    fn port(&self) -> u16;

    /// Close the server, reporting success or failure.
    async fn close(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Mutable view handed to bootstrap capabilities: the shared service state
/// plus the exit coordinator.
pub struct LifecycleContext<'a> {
    pub state: &'a mut ServiceState,
    pub shutdown: &'a Shutdown,
}

/// Capability interface a concrete server type supplies.
#[async_trait]
pub trait Bootstrap: Send + Sync + 'static {
    /// Construct the listening server, store its handle in the state, and
    /// mark the service running.
    async fn create(&self, _cx: &mut LifecycleContext<'_>) -> ServiceResult<()> {
        Err(ServiceError::Unimplemented("create"))
    }

    /// Tear the server down. The default performs the standard teardown;
    /// override only for servers needing extra cleanup.
    async fn destroy(&self, cx: &mut LifecycleContext<'_>) -> ServiceResult<()> {
        destroy_server(cx).await
    }

    /// Announce this instance to a discovery registry. The default performs
    /// no network call and reports nothing to announce.
    async fn announce(&self, _state: &ServiceState) -> ServiceResult<Option<Value>> {
        Ok(None)
    }
}

/// Standard teardown: clear the handle and running flag via `set_state`,
/// close the server, then request the matching exit code.
pub async fn destroy_server(cx: &mut LifecycleContext<'_>) -> ServiceResult<()> {
    if !cx.state.running {
        tracing::debug!("stop requested but server is not running");
        return Ok(());
    }

    // Grab the handle before clearing state, so no observer sees a running
    // service with a half-closed server.
    let server = cx.state.server.clone();
    cx.state
        .set_state(StatePatch::new().server(None).running(false));

    let Some(server) = server else {
        return Err(ServiceError::NoServer);
    };

    match server.close().await {
        Ok(()) => {
            tracing::info!("server closed");
            cx.shutdown.request(shutdown::CLEAN_STOP);
            Ok(())
        }
        Err(err) => {
            cx.shutdown.request(shutdown::CLOSE_FAILURE);
            Err(ServiceError::Close(err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;

    #[tokio::test]
    async fn destroy_on_fresh_state_requests_no_exit() {
        let mut state = ServiceState::new(ServiceConfig::default());
        let shutdown = Shutdown::new();
        let mut cx = LifecycleContext {
            state: &mut state,
            shutdown: &shutdown,
        };

        let result = destroy_server(&mut cx).await;

        assert!(result.is_ok());
        assert_eq!(shutdown.requested(), None);
    }

    #[tokio::test]
    async fn running_without_handle_is_an_error() {
        let mut state = ServiceState::new(ServiceConfig::default());
        state.set_state(StatePatch::new().running(true));
        let shutdown = Shutdown::new();
        let mut cx = LifecycleContext {
            state: &mut state,
            shutdown: &shutdown,
        };

        let result = destroy_server(&mut cx).await;

        assert!(matches!(result, Err(ServiceError::NoServer)));
    }
}
