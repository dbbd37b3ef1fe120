//! Event-driven lifecycle engine.
//!
//! # Responsibilities
//! - Own the mutable [`ServiceState`]
//! - Dispatch START/STOP/ERROR events to handlers bound at construction
//! - Route handler errors into the ERROR event
//! - Provide the merge-based state update path
//!
//! # Design Decisions
//! - One handler per event, resolved once into a static table (no dynamic
//!   event-name lookup)
//! - Handlers run to completion before the next event is dispatched; the
//!   engine is never reentered from inside a handler
//! - The default ERROR handler logs and requests a failure exit code

use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::{Map, Value};

use crate::config::{ApiConfig, RegistryConfig, ServiceConfig};
use crate::lifecycle::bootstrap::{Bootstrap, LifecycleContext, ServerHandle};
use crate::lifecycle::error::{ServiceError, ServiceResult};
use crate::lifecycle::shutdown::{self, Shutdown};

/// Mutable state owned by the lifecycle engine.
///
/// `running == true` implies a server handle is present.
pub struct ServiceState {
    /// Handle to the concrete running server, once created.
    pub server: Option<Arc<dyn ServerHandle>>,

    /// True between a successful create and a requested stop.
    pub running: bool,

    /// Self-registration settings.
    pub registry: RegistryConfig,

    /// This service's externally reachable path.
    pub api: ApiConfig,

    /// Additional config keys merged from file/env at init time.
    pub extra: Map<String, Value>,
}

impl ServiceState {
    /// Build the initial state from loaded configuration.
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            server: None,
            running: false,
            registry: config.registry,
            api: config.api,
            extra: config.extra,
        }
    }

    /// Shallow-merge a patch into the state and return the new state.
    ///
    /// Fields are replaced whole (no partial in-place mutation of nested
    /// state); extra keys merge last-write-wins. The merge is synchronous,
    /// so no observer ever sees a half-applied update.
    pub fn set_state(&mut self, patch: StatePatch) -> &ServiceState {
        if let Some(server) = patch.server {
            self.server = server;
        }
        if let Some(running) = patch.running {
            self.running = running;
        }
        if let Some(registry) = patch.registry {
            self.registry = registry;
        }
        if let Some(api) = patch.api {
            self.api = api;
        }
        for (key, value) in patch.extra {
            self.extra.insert(key, value);
        }
        self
    }
}

/// Partial state update applied via [`ServiceState::set_state`].
#[derive(Default)]
pub struct StatePatch {
    server: Option<Option<Arc<dyn ServerHandle>>>,
    running: Option<bool>,
    registry: Option<RegistryConfig>,
    api: Option<ApiConfig>,
    extra: Map<String, Value>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the server handle (pass `None` to clear it).
    pub fn server(mut self, server: Option<Arc<dyn ServerHandle>>) -> Self {
        self.server = Some(server);
        self
    }

    pub fn running(mut self, running: bool) -> Self {
        self.running = Some(running);
        self
    }

    pub fn registry(mut self, registry: RegistryConfig) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn api(mut self, api: ApiConfig) -> Self {
        self.api = Some(api);
        self
    }

    /// Merge an extra config key.
    pub fn insert(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Lifecycle event names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKey {
    Start,
    Stop,
    Error,
}

/// A lifecycle event, with payload where the event carries one.
#[derive(Debug)]
pub enum Event {
    Start,
    Stop,
    Error(ServiceError),
}

impl Event {
    pub fn key(&self) -> EventKey {
        match self {
            Event::Start => EventKey::Start,
            Event::Stop => EventKey::Stop,
            Event::Error(_) => EventKey::Error,
        }
    }

    fn into_payload(self) -> Option<ServiceError> {
        match self {
            Event::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// Handler bound to an event key. Static dispatch: plain fn pointers over
/// the engine, boxed only for the async body.
type Action<B> =
    for<'a> fn(&'a mut LifecycleEngine<B>, Option<ServiceError>) -> BoxFuture<'a, ServiceResult<()>>;

struct Binding<B: Bootstrap> {
    key: EventKey,
    action: Action<B>,
}

/// Event-driven lifecycle engine, parameterized over a bootstrap
/// implementation supplying create/destroy/announce behavior.
pub struct LifecycleEngine<B: Bootstrap> {
    state: ServiceState,
    bootstrap: B,
    bindings: Vec<Binding<B>>,
    shutdown: Shutdown,
}

impl<B: Bootstrap> LifecycleEngine<B> {
    /// Create the engine and bind the event table.
    pub fn new(config: ServiceConfig, bootstrap: B) -> Self {
        let mut engine = Self {
            state: ServiceState::new(config),
            bootstrap,
            bindings: Vec::new(),
            shutdown: Shutdown::new(),
        };
        engine.init();
        engine
    }

    /// Bind handlers to event keys. Runs exactly once.
    fn init(&mut self) {
        self.bindings = vec![
            Binding {
                key: EventKey::Start,
                action: on_start::<B>,
            },
            Binding {
                key: EventKey::Stop,
                action: on_stop::<B>,
            },
            Binding {
                key: EventKey::Error,
                action: on_error::<B>,
            },
        ];
    }

    pub fn state(&self) -> &ServiceState {
        &self.state
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    /// Emit START.
    ///
    /// The engine does not guard against starting twice; that is the
    /// bootstrap implementation's responsibility.
    pub async fn start(&mut self) {
        self.emit(Event::Start).await;
    }

    /// Emit STOP.
    pub async fn stop(&mut self) {
        self.emit(Event::Stop).await;
    }

    /// Emit ERROR with the given payload.
    pub async fn report_error(&mut self, err: ServiceError) {
        self.emit(Event::Error(err)).await;
    }

    /// Dispatch an event to its bound handler.
    ///
    /// A handler returning `Err` routes the error into the ERROR event.
    /// Errors from the ERROR handler itself are logged, not re-dispatched.
    async fn emit(&mut self, event: Event) {
        let mut event = event;
        loop {
            let key = event.key();
            let Some(action) = self
                .bindings
                .iter()
                .find(|binding| binding.key == key)
                .map(|binding| binding.action)
            else {
                return;
            };

            match action(self, event.into_payload()).await {
                Ok(()) => return,
                Err(err) if key != EventKey::Error => {
                    event = Event::Error(err);
                }
                Err(err) => {
                    tracing::error!(error = %err, "error handler failed");
                    return;
                }
            }
        }
    }

    async fn create(&mut self) -> ServiceResult<()> {
        let mut cx = LifecycleContext {
            state: &mut self.state,
            shutdown: &self.shutdown,
        };
        self.bootstrap.create(&mut cx).await
    }

    async fn destroy(&mut self) -> ServiceResult<()> {
        let mut cx = LifecycleContext {
            state: &mut self.state,
            shutdown: &self.shutdown,
        };
        self.bootstrap.destroy(&mut cx).await
    }

    /// Default ERROR handler: log and request termination.
    async fn resolve_errors(&mut self, err: ServiceError) -> ServiceResult<()> {
        tracing::error!(error = %err, "error occurred on server");
        self.shutdown.request(shutdown::LIFECYCLE_ERROR);
        Ok(())
    }
}

fn on_start<B: Bootstrap>(
    engine: &mut LifecycleEngine<B>,
    _payload: Option<ServiceError>,
) -> BoxFuture<'_, ServiceResult<()>> {
    Box::pin(engine.create())
}

fn on_stop<B: Bootstrap>(
    engine: &mut LifecycleEngine<B>,
    _payload: Option<ServiceError>,
) -> BoxFuture<'_, ServiceResult<()>> {
    Box::pin(engine.destroy())
}

fn on_error<B: Bootstrap>(
    engine: &mut LifecycleEngine<B>,
    payload: Option<ServiceError>,
) -> BoxFuture<'_, ServiceResult<()>> {
    Box::pin(async move {
        match payload {
            Some(err) => engine.resolve_errors(err).await,
            None => Ok(()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubHandle {
        fail_close: bool,
        closed: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ServerHandle for StubHandle {
        fn kind(&self) -> &str {
            "api"
        }

        fn host(&self) -> &str {
            "127.0.0.1"
        }

        fn port(&self) -> u16 {
            4000
        }

        async fn close(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.closed.fetch_add(1, Ordering::SeqCst);
            if self.fail_close {
                Err("close refused".into())
            } else {
                Ok(())
            }
        }
    }

    struct StubBootstrap {
        created: Arc<AtomicUsize>,
        closed: Arc<AtomicUsize>,
        fail_close: bool,
    }

    impl StubBootstrap {
        fn new(fail_close: bool) -> Self {
            Self {
                created: Arc::new(AtomicUsize::new(0)),
                closed: Arc::new(AtomicUsize::new(0)),
                fail_close,
            }
        }
    }

    #[async_trait]
    impl Bootstrap for StubBootstrap {
        async fn create(&self, cx: &mut LifecycleContext<'_>) -> ServiceResult<()> {
            self.created.fetch_add(1, Ordering::SeqCst);
            let handle: Arc<dyn ServerHandle> = Arc::new(StubHandle {
                fail_close: self.fail_close,
                closed: self.closed.clone(),
            });
            cx.state
                .set_state(StatePatch::new().server(Some(handle)).running(true));
            Ok(())
        }
    }

    /// Bootstrap with no overrides at all.
    struct BareBootstrap;

    #[async_trait]
    impl Bootstrap for BareBootstrap {}

    fn engine<B: Bootstrap>(bootstrap: B) -> LifecycleEngine<B> {
        LifecycleEngine::new(ServiceConfig::default(), bootstrap)
    }

    #[tokio::test]
    async fn start_invokes_create_handler_once() {
        let bootstrap = StubBootstrap::new(false);
        let created = bootstrap.created.clone();
        let mut engine = engine(bootstrap);

        engine.start().await;

        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert!(engine.state().running);
        assert!(engine.state().server.is_some());
    }

    #[tokio::test]
    async fn default_create_routes_unimplemented_into_error() {
        let mut engine = engine(BareBootstrap);

        engine.start().await;

        assert!(!engine.state().running);
        assert_eq!(
            engine.shutdown().requested(),
            Some(shutdown::LIFECYCLE_ERROR)
        );
    }

    #[tokio::test]
    async fn stop_without_running_server_is_noop() {
        let bootstrap = StubBootstrap::new(false);
        let closed = bootstrap.closed.clone();
        let mut engine = engine(bootstrap);

        engine.stop().await;

        assert_eq!(closed.load(Ordering::SeqCst), 0);
        assert_eq!(engine.shutdown().requested(), None);
    }

    #[tokio::test]
    async fn stop_closes_server_and_requests_clean_exit() {
        let bootstrap = StubBootstrap::new(false);
        let closed = bootstrap.closed.clone();
        let mut engine = engine(bootstrap);

        engine.start().await;
        engine.stop().await;

        assert_eq!(closed.load(Ordering::SeqCst), 1);
        assert!(!engine.state().running);
        assert!(engine.state().server.is_none());
        assert_eq!(engine.shutdown().requested(), Some(shutdown::CLEAN_STOP));
    }

    #[tokio::test]
    async fn failed_close_requests_distinct_failure_code() {
        let bootstrap = StubBootstrap::new(true);
        let mut engine = engine(bootstrap);

        engine.start().await;
        engine.stop().await;

        assert!(!engine.state().running);
        assert!(engine.state().server.is_none());
        assert_eq!(engine.shutdown().requested(), Some(shutdown::CLOSE_FAILURE));
    }

    #[tokio::test]
    async fn report_error_requests_failure_exit() {
        let mut engine = engine(StubBootstrap::new(false));

        engine
            .report_error(ServiceError::Close("boom".to_string()))
            .await;

        assert_eq!(
            engine.shutdown().requested(),
            Some(shutdown::LIFECYCLE_ERROR)
        );
    }

    #[test]
    fn set_state_merges_last_write_wins() {
        let mut state = ServiceState::new(ServiceConfig::default());

        state.set_state(
            StatePatch::new()
                .insert("region", json!("eu-west"))
                .insert("tier", json!(1)),
        );
        state.set_state(StatePatch::new().running(true).insert("tier", json!(2)));

        assert!(state.running);
        assert_eq!(state.extra.get("region"), Some(&json!("eu-west")));
        assert_eq!(state.extra.get("tier"), Some(&json!(2)));
    }

    #[test]
    fn set_state_replaces_nested_fields_whole() {
        let mut state = ServiceState::new(ServiceConfig::default());
        let registry = RegistryConfig {
            self_register: true,
            repo: "http://reg:9000".to_string(),
        };

        let new = state.set_state(StatePatch::new().registry(registry));

        assert!(new.registry.self_register);
        assert_eq!(new.registry.repo, "http://reg:9000");
    }
}
