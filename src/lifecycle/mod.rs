//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     start() → START event → Bootstrap::create
//!         → bind server, store handle, set running
//!         → announce to registry (when enabled)
//!
//! Shutdown (shutdown.rs):
//!     stop() → STOP event → Bootstrap::destroy
//!         → clear handle via set_state → close server → request exit code
//!
//! Errors:
//!     handler returns Err → ERROR event → log → request failure exit code
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → stop()
//! ```
//!
//! # Design Decisions
//! - Handlers are bound exactly once, at engine construction, via a
//!   declarative table of (event key, handler) pairs
//! - State mutation goes through the merge-based `set_state` only
//! - Handler errors route into the ERROR event structurally; no manual
//!   error reporting from handlers
//! - Exit codes are requested, never executed in handlers; the binary
//!   performs the actual exit

pub mod bootstrap;
pub mod engine;
pub mod error;
pub mod shutdown;
pub mod signals;

pub use bootstrap::{Bootstrap, LifecycleContext, ServerHandle};
pub use engine::{Event, EventKey, LifecycleEngine, ServiceState, StatePatch};
pub use error::{ServiceError, ServiceResult};
pub use shutdown::Shutdown;
