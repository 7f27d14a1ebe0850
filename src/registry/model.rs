use serde::Serialize;
use url::Url;

use super::resolver::{resolve_server_address, RegistryMode};
use crate::discovery::ServiceDetails;

/// A model registry ready to be connected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ModelRegistryModel {
    pub name: String,
    pub description: String,
    pub display_name: String,
    /// The base URL of the model registry REST API.
    pub server_address: String,
    #[serde(rename = "isHTTPS")]
    pub is_https: bool,
}

impl ModelRegistryModel {
    pub(crate) fn from_service(service: ServiceDetails, mode: RegistryMode) -> ModelRegistryModel {
        let server_address = resolve_server_address(
            &service.cluster_ip,
            service.http_port,
            service.is_https,
            &service.external_address_rest,
            mode,
        );

        ModelRegistryModel {
            name: service.name,
            description: service.description,
            display_name: service.display_name,
            server_address,
            is_https: service.is_https,
        }
    }

    /// Parses the server address for use by an HTTP client. Addresses built
    /// from malformed discovery data fail here rather than at resolution.
    pub(crate) fn server_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.server_address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ServiceDetails {
        ServiceDetails {
            name: "model-registry".to_string(),
            description: "Team registry".to_string(),
            display_name: "Model Registry".to_string(),
            cluster_ip: "10.0.0.5".to_string(),
            http_port: 8080,
            is_https: true,
            external_address_rest: "registry.example.com".to_string(),
        }
    }

    #[test]
    fn test_fields_carried_over() {
        let model = ModelRegistryModel::from_service(service(), RegistryMode::Default);

        assert_eq!(model.name, "model-registry");
        assert_eq!(model.description, "Team registry");
        assert_eq!(model.display_name, "Model Registry");
        assert!(model.is_https);
        assert_eq!(
            model.server_address,
            "https://10.0.0.5:8080/api/model_registry/v1alpha3"
        );
    }

    #[test]
    fn test_federated_uses_external_address() {
        let model = ModelRegistryModel::from_service(service(), RegistryMode::Federated);

        assert_eq!(
            model.server_address,
            "https://registry.example.com/api/model_registry/v1alpha3"
        );
    }

    #[test]
    fn test_json_field_names() {
        let model = ModelRegistryModel::from_service(service(), RegistryMode::Default);

        let json = serde_json::to_value(&model).unwrap();

        assert_eq!(json["displayName"], "Model Registry");
        assert_eq!(
            json["serverAddress"],
            "https://10.0.0.5:8080/api/model_registry/v1alpha3"
        );
        assert_eq!(json["isHTTPS"], true);
        assert_eq!(json["name"], "model-registry");
        assert_eq!(json["description"], "Team registry");
    }

    #[test]
    fn test_server_url() {
        let model = ModelRegistryModel::from_service(service(), RegistryMode::Default);

        let url = model.server_url().unwrap();

        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("10.0.0.5"));
        assert_eq!(url.port(), Some(8080));
        assert_eq!(url.path(), "/api/model_registry/v1alpha3");
    }

    #[test]
    fn test_server_url_rejects_malformed_external_address() {
        let mut service = service();
        service.external_address_rest = "bad host name".to_string();

        let model = ModelRegistryModel::from_service(service, RegistryMode::Federated);

        assert!(model.server_url().is_err());
    }
}
