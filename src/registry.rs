//! The registry turns discovered services into model registries a client can
//! connect to. For every service reported by a [`ServiceDiscovery`] collaborator,
//! it resolves a single base URL for the model registry REST API:
//! ```text
//! <scheme>://<host>[:<port>]/api/model_registry/v1alpha3
//! ```
//!
//! The scheme is `https` exactly when the service reports TLS. The host depends
//! on the [`RegistryMode`]:
//! - In the default mode the cluster-internal IP and port are always used.
//! - In federated mode an externally routable address, when the service has one,
//!   replaces the IP and port. Services without an external address fall back to
//!   the cluster-internal address.
//!
//! [`ServiceDiscovery`]: crate::discovery::ServiceDiscovery

pub(crate) mod model;
pub(crate) mod repository;
pub(crate) mod resolver;

pub(crate) use model::ModelRegistryModel;
pub(crate) use repository::ModelRegistryRepository;
pub(crate) use resolver::RegistryMode;
