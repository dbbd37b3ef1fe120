//! Instance announcement to the discovery registry.

use serde::Serialize;
use serde_json::Value;

use crate::http::client::HttpClient;
use crate::lifecycle::engine::ServiceState;
use crate::lifecycle::error::{ServiceError, ServiceResult};

/// Body POSTed to the registry root.
#[derive(Debug, Serialize)]
pub struct RegistrationRequest {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(rename = "basePath")]
    pub base_path: String,

    pub address: RegistrationAddress,
}

/// Network address the instance is reachable on.
#[derive(Debug, Serialize)]
pub struct RegistrationAddress {
    pub port: u16,
    pub host: String,
}

/// Announce this instance to the registry configured in the state.
///
/// With self-registration disabled this performs no network call and
/// returns `Ok(None)`. Otherwise it POSTs the instance address to the
/// registry root and returns the decoded response body. HTTP failures
/// propagate unchanged.
pub async fn announce(state: &ServiceState) -> ServiceResult<Option<Value>> {
    let registry = &state.registry;
    if !registry.self_register {
        return Ok(None);
    }

    let server = state.server.as_ref().ok_or(ServiceError::NoServer)?;
    let client = HttpClient::new(&registry.repo);

    let request = RegistrationRequest {
        kind: server.kind().to_string(),
        base_path: state.api.base_path.clone(),
        address: RegistrationAddress {
            port: server.port(),
            host: server.host().to_string(),
        },
    };

    let response = client.post("/", &request).await?;

    tracing::info!(
        repo = %registry.repo,
        host = %request.address.host,
        port = request.address.port,
        "instance registered with discovery registry"
    );

    Ok(Some(response))
}
