//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via tracing; fields over string interpolation
//! - Log level configurable through the environment (RUST_LOG)

pub mod logging;
