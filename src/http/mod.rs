//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound (client.rs):
//!     caller → verb dispatch → base URL + path → transport → decoded JSON
//!
//! Inbound (server.rs):
//!     TCP connection → Axum router → handlers
//!     Bootstrap::create binds the listener and stores the handle
//! ```

pub mod client;
pub mod server;

pub use client::{HttpClient, HttpError};
pub use server::ApiBootstrap;
