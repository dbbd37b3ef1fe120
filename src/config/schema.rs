//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Self-registration settings.
    pub registry: RegistryConfig,

    /// This service's own API surface.
    pub api: ApiConfig,

    /// Listener configuration for the concrete server.
    pub listener: ListenerConfig,

    /// Any further keys, kept opaque and merged into the service state.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Discovery-registry settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Whether this instance announces itself to the registry on startup.
    #[serde(rename = "self")]
    pub self_register: bool,

    /// Base URL of the discovery registry.
    pub repo: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            self_register: false,
            repo: "http://localhost:9000".to_string(),
        }
    }
}

/// This service's externally reachable API description.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base path under which the service is reachable.
    #[serde(rename = "basePath")]
    pub base_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds for the HTTP server.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}
