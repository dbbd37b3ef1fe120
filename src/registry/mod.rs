//! Discovery-registry integration.
//!
//! # Design Decisions
//! - Announce once per start; no retry at this layer
//! - Failures propagate unchanged to the creating bootstrap, which funnels
//!   them through the lifecycle ERROR path

pub mod announcer;

pub use announcer::{announce, RegistrationAddress, RegistrationRequest};
