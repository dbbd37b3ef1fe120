//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON, optional)
//!     → loader.rs (parse & deserialize; missing file → defaults)
//!     → environment overlay (SERVICE_* variables)
//!     → semantic validation
//!     → ServiceConfig (immutable)
//!     → merged into ServiceState at engine construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults to allow minimal configs
//! - Environment always wins over the file
//! - Key names follow the wire format (`self`, `basePath`)

pub mod loader;
pub mod schema;

pub use schema::ApiConfig;
pub use schema::ListenerConfig;
pub use schema::RegistryConfig;
pub use schema::ServiceConfig;
