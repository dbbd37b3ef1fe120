//! Lifecycle scaffold for self-registering network services.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;

pub use config::ServiceConfig;
pub use http::client::HttpClient;
pub use lifecycle::bootstrap::{Bootstrap, LifecycleContext, ServerHandle};
pub use lifecycle::engine::{LifecycleEngine, ServiceState, StatePatch};
pub use lifecycle::error::{ServiceError, ServiceResult};
pub use lifecycle::shutdown::Shutdown;
