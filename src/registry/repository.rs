use thiserror::Error;

use super::model::ModelRegistryModel;
use super::resolver::RegistryMode;
use crate::discovery::{self, ServiceDiscovery};

#[derive(Error, Debug)]
pub(crate) enum Error {
    /// Listing the services of a namespace failed
    #[error("error fetching model registries in namespace \"{namespace}\": {source}")]
    LookupAll {
        namespace: String,
        #[source]
        source: discovery::Error,
    },
    /// Fetching a single service failed, including when it does not exist
    #[error("error fetching model registry \"{name}\" in namespace \"{namespace}\": {source}")]
    LookupOne {
        namespace: String,
        name: String,
        #[source]
        source: discovery::Error,
    },
}

impl Error {
    /// The category reported by the discovery collaborator.
    pub(crate) fn kind(&self) -> discovery::ErrorKind {
        match self {
            Error::LookupAll { source, .. } | Error::LookupOne { source, .. } => source.kind(),
        }
    }
}

/// Looks up model registries through a discovery collaborator. Every call
/// queries the collaborator anew; nothing is cached between calls.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ModelRegistryRepository;

impl ModelRegistryRepository {
    pub(crate) fn new() -> ModelRegistryRepository {
        ModelRegistryRepository
    }

    /// Returns every model registry in `namespace`, in the order reported by
    /// the collaborator.
    pub(crate) async fn list(
        &self,
        discovery: &dyn ServiceDiscovery,
        namespace: &str,
        mode: RegistryMode,
    ) -> Result<Vec<ModelRegistryModel>, Error> {
        // TODO: fetch Routes in the default mode for access from outside the cluster
        let services =
            discovery
                .service_details(namespace)
                .await
                .map_err(|source| Error::LookupAll {
                    namespace: namespace.to_string(),
                    source,
                })?;

        let registries = services
            .into_iter()
            .map(|service| ModelRegistryModel::from_service(service, mode))
            .collect();

        Ok(registries)
    }

    /// Returns the model registry `registry_id` in `namespace`.
    pub(crate) async fn get(
        &self,
        discovery: &dyn ServiceDiscovery,
        namespace: &str,
        registry_id: &str,
        mode: RegistryMode,
    ) -> Result<ModelRegistryModel, Error> {
        let service = discovery
            .service_details_by_name(namespace, registry_id)
            .await
            .map_err(|source| Error::LookupOne {
                namespace: namespace.to_string(),
                name: registry_id.to_string(),
                source,
            })?;

        Ok(ModelRegistryModel::from_service(service, mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{ErrorKind, ServiceDetails};
    use async_trait::async_trait;
    use std::error::Error as StdError;
    use std::time::Duration;

    /// Serves a fixed list of services for every namespace.
    struct FixedDiscovery {
        services: Vec<ServiceDetails>,
    }

    #[async_trait]
    impl ServiceDiscovery for FixedDiscovery {
        async fn service_details(
            &self,
            _namespace: &str,
        ) -> Result<Vec<ServiceDetails>, discovery::Error> {
            Ok(self.services.clone())
        }

        async fn service_details_by_name(
            &self,
            _namespace: &str,
            name: &str,
        ) -> Result<ServiceDetails, discovery::Error> {
            self.services
                .iter()
                .find(|s| s.name == name)
                .cloned()
                .ok_or_else(|| {
                    discovery::Error::from_source(ErrorKind::NotFound, name.to_string().into())
                })
        }
    }

    /// Fails every call.
    struct BrokenDiscovery;

    #[async_trait]
    impl ServiceDiscovery for BrokenDiscovery {
        async fn service_details(
            &self,
            _namespace: &str,
        ) -> Result<Vec<ServiceDetails>, discovery::Error> {
            Err(discovery::Error::from_source(
                ErrorKind::PermissionDenied,
                "services is forbidden".into(),
            ))
        }

        async fn service_details_by_name(
            &self,
            _namespace: &str,
            _name: &str,
        ) -> Result<ServiceDetails, discovery::Error> {
            Err(discovery::Error::from_source(
                ErrorKind::Connection,
                "dial tcp 10.96.0.1:443: connection refused".into(),
            ))
        }
    }

    /// Never answers.
    struct StalledDiscovery;

    #[async_trait]
    impl ServiceDiscovery for StalledDiscovery {
        async fn service_details(
            &self,
            _namespace: &str,
        ) -> Result<Vec<ServiceDetails>, discovery::Error> {
            std::future::pending().await
        }

        async fn service_details_by_name(
            &self,
            _namespace: &str,
            _name: &str,
        ) -> Result<ServiceDetails, discovery::Error> {
            std::future::pending().await
        }
    }

    fn service(name: &str, ip: &str, external: &str) -> ServiceDetails {
        ServiceDetails {
            name: name.to_string(),
            description: format!("{} description", name),
            display_name: name.to_uppercase(),
            cluster_ip: ip.to_string(),
            http_port: 8080,
            is_https: false,
            external_address_rest: external.to_string(),
        }
    }

    fn discovery() -> FixedDiscovery {
        FixedDiscovery {
            services: vec![
                service("zeta", "10.0.0.9", "zeta.example.com"),
                service("alpha", "10.0.0.5", ""),
            ],
        }
    }

    #[tokio::test]
    async fn test_list_preserves_order() {
        let repo = ModelRegistryRepository::new();

        let registries = repo
            .list(&discovery(), "kubeflow", RegistryMode::default())
            .await
            .unwrap();

        let names: Vec<&str> = registries.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha"]);
        assert_eq!(
            registries[0].server_address,
            "http://10.0.0.9:8080/api/model_registry/v1alpha3"
        );
        assert_eq!(registries[0].display_name, "ZETA");
    }

    #[tokio::test]
    async fn test_list_federated() {
        let repo = ModelRegistryRepository::new();

        let registries = repo
            .list(&discovery(), "kubeflow", RegistryMode::Federated)
            .await
            .unwrap();

        assert_eq!(
            registries[0].server_address,
            "http://zeta.example.com/api/model_registry/v1alpha3"
        );
        // No external address, so the cluster address is kept
        assert_eq!(
            registries[1].server_address,
            "http://10.0.0.5:8080/api/model_registry/v1alpha3"
        );
    }

    #[tokio::test]
    async fn test_list_empty_namespace() {
        let repo = ModelRegistryRepository::new();
        let empty = FixedDiscovery { services: vec![] };

        let registries = repo
            .list(&empty, "empty", RegistryMode::default())
            .await
            .unwrap();

        assert!(registries.is_empty());
    }

    #[tokio::test]
    async fn test_list_failure_is_wrapped() {
        let repo = ModelRegistryRepository::new();

        let err = repo
            .list(&BrokenDiscovery, "kubeflow", RegistryMode::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::LookupAll { ref namespace, .. } if namespace == "kubeflow"));
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert!(err.to_string().contains("services is forbidden"));
        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn test_get() {
        let repo = ModelRegistryRepository::new();

        let registry = repo
            .get(&discovery(), "kubeflow", "zeta", RegistryMode::Federated)
            .await
            .unwrap();

        assert_eq!(registry.name, "zeta");
        assert_eq!(registry.description, "zeta description");
        assert!(!registry.is_https);
        assert_eq!(
            registry.server_address,
            "http://zeta.example.com/api/model_registry/v1alpha3"
        );
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let repo = ModelRegistryRepository::new();

        let err = repo
            .get(&discovery(), "kubeflow", "missing", RegistryMode::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::LookupOne { ref name, .. } if name == "missing"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_get_failure_is_wrapped() {
        let repo = ModelRegistryRepository::new();

        let err = repo
            .get(&BrokenDiscovery, "kubeflow", "zeta", RegistryMode::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("connection refused"));
        assert_eq!(err.kind(), ErrorKind::Connection);

        let source = err.source().unwrap();
        assert!(source.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_dropped_lookup_returns_nothing() {
        let repo = ModelRegistryRepository::new();

        let list = tokio::time::timeout(
            Duration::from_millis(10),
            repo.list(&StalledDiscovery, "kubeflow", RegistryMode::default()),
        )
        .await;
        assert!(list.is_err());

        let get = tokio::time::timeout(
            Duration::from_millis(10),
            repo.get(&StalledDiscovery, "kubeflow", "zeta", RegistryMode::default()),
        )
        .await;
        assert!(get.is_err());
    }
}
