//! A read-only service catalog populated from the configuration file.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use super::{Error, ErrorKind, ServiceDetails, ServiceDiscovery};
use crate::config::ServiceEntry;

#[derive(Debug, Error)]
enum CatalogError {
    #[error("service \"{name}\" is declared twice in namespace \"{namespace}\"")]
    DuplicateService { namespace: String, name: String },
    #[error("a service in namespace \"{0}\" has an empty name")]
    UnnamedService(String),
    #[error("service \"{name}\" does not exist in namespace \"{namespace}\"")]
    NoSuchService { namespace: String, name: String },
}

/// Services grouped by namespace. Within a namespace, services are reported in
/// the order they were declared.
#[derive(Debug, Default)]
pub(crate) struct StaticCatalog {
    namespaces: HashMap<String, Vec<ServiceDetails>>,
}

impl StaticCatalog {
    pub(crate) fn new() -> StaticCatalog {
        StaticCatalog {
            namespaces: HashMap::new(),
        }
    }

    pub(crate) fn from_entries(entries: &[ServiceEntry]) -> Result<StaticCatalog, Error> {
        let mut catalog = StaticCatalog::new();

        for entry in entries {
            catalog.add_service(&entry.namespace, entry.into())?;
        }

        Ok(catalog)
    }

    pub(crate) fn add_service(
        &mut self,
        namespace: &str,
        service: ServiceDetails,
    ) -> Result<(), Error> {
        if service.name.is_empty() {
            return Err(Error::from_source(
                ErrorKind::InvalidConfiguration,
                Box::new(CatalogError::UnnamedService(namespace.to_string())),
            ));
        }

        let services = self.namespaces.entry(namespace.to_string()).or_default();

        if services.iter().any(|s| s.name == service.name) {
            return Err(Error::from_source(
                ErrorKind::InvalidConfiguration,
                Box::new(CatalogError::DuplicateService {
                    namespace: namespace.to_string(),
                    name: service.name,
                }),
            ));
        }

        services.push(service);

        Ok(())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.namespaces.values().all(|services| services.is_empty())
    }
}

#[async_trait]
impl ServiceDiscovery for StaticCatalog {
    async fn service_details(&self, namespace: &str) -> Result<Vec<ServiceDetails>, Error> {
        Ok(self.namespaces.get(namespace).cloned().unwrap_or_default())
    }

    async fn service_details_by_name(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ServiceDetails, Error> {
        self.namespaces
            .get(namespace)
            .and_then(|services| services.iter().find(|s| s.name == name))
            .cloned()
            .ok_or_else(|| {
                Error::from_source(
                    ErrorKind::NotFound,
                    Box::new(CatalogError::NoSuchService {
                        namespace: namespace.to_string(),
                        name: name.to_string(),
                    }),
                )
            })
    }
}
