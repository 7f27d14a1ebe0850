/// Path of the model registry REST API, relative to the server root.
pub(crate) const MODEL_REGISTRY_API_PATH: &str = "/api/model_registry/v1alpha3";

/// How model registries are addressed.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub(crate) enum RegistryMode {
    /// Registries are reached through their cluster-internal address.
    #[default]
    Default,
    /// Registries are reached through their external address when one exists.
    Federated,
}

impl RegistryMode {
    pub(crate) fn from_federated(federated: bool) -> RegistryMode {
        if federated {
            RegistryMode::Federated
        } else {
            RegistryMode::Default
        }
    }

    pub(crate) fn is_federated(self) -> bool {
        matches!(self, RegistryMode::Federated)
    }
}

/// Computes the base URL of a model registry API. This never fails: degenerate
/// inputs (an empty IP, port 0, a malformed external address) are formatted
/// verbatim.
pub(crate) fn resolve_server_address(
    cluster_ip: &str,
    http_port: i32,
    is_https: bool,
    external_address: &str,
    mode: RegistryMode,
) -> String {
    let scheme = if is_https { "https" } else { "http" };

    // The external address follows the service's TLS flag, it is not forced
    // to https.
    if mode.is_federated() && !external_address.is_empty() {
        return format!("{}://{}{}", scheme, external_address, MODEL_REGISTRY_API_PATH);
    }

    format!(
        "{}://{}:{}{}",
        scheme, cluster_ip, http_port, MODEL_REGISTRY_API_PATH
    )
}
