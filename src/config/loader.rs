//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::ServiceConfig;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(msg) => write!(f, "Validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Resolve the config file path for the current environment.
///
/// `SERVICE_ENV=dev|development` selects `<base>.dev.json`,
/// `SERVICE_ENV=prod|production` selects `<base>.prod.json`,
/// anything else selects `<base>.json`.
pub fn config_file(base_path: &str, base_name: &str) -> PathBuf {
    let env = std::env::var("SERVICE_ENV").unwrap_or_default();
    let infix = match env.as_str() {
        "dev" | "development" => "dev",
        "prod" | "production" => "prod",
        _ => "",
    };

    let file = if infix.is_empty() {
        format!("{base_name}.json")
    } else {
        format!("{base_name}.{infix}.json")
    };

    Path::new(base_path).join(file)
}

/// Load configuration: file (when present), then environment overlay,
/// then semantic validation.
///
/// A missing file is not an error; malformed JSON is.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let mut config = if path.exists() {
        let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)?
    } else {
        ServiceConfig::default()
    };

    apply_env_overlay(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Overlay `SERVICE_*` environment variables onto the loaded config.
fn apply_env_overlay(config: &mut ServiceConfig) {
    if let Ok(value) = std::env::var("SERVICE_REGISTRY_SELF") {
        config.registry.self_register = matches!(value.as_str(), "1" | "true" | "yes");
    }
    if let Ok(value) = std::env::var("SERVICE_REGISTRY_REPO") {
        config.registry.repo = value;
    }
    if let Ok(value) = std::env::var("SERVICE_API_BASE_PATH") {
        config.api.base_path = value;
    }
    if let Ok(value) = std::env::var("SERVICE_BIND_ADDRESS") {
        config.listener.bind_address = value;
    }
}

/// Semantic checks that serde cannot express.
fn validate_config(config: &ServiceConfig) -> Result<(), ConfigError> {
    if config.registry.self_register {
        url::Url::parse(&config.registry.repo).map_err(|e| {
            ConfigError::Validation(format!(
                "registry.repo '{}' is not a valid URL: {}",
                config.registry.repo, e
            ))
        })?;
    }

    if !config.api.base_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "api.basePath '{}' must start with '/'",
            config.api.base_path
        )));
    }

    Ok(())
}
