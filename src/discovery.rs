//! The boundary between this crate and the cluster's service discovery.
//!
//! Model registries are deployed as Kubernetes services. Enumerating those
//! services is not the job of this crate: it is delegated to a discovery
//! collaborator implementing the [`ServiceDiscovery`] trait. A collaborator must
//! support two operations:
//! - Listing: report every model registry service in a namespace, in whatever
//!   order the collaborator considers canonical.
//! - Lookup: report a single service by name.
//!
//! ## Error Handling
//!
//! Each collaborator has its own failure modes (an API server that refuses the
//! connection, RBAC rules that deny the list, a catalog entry that does not
//! exist). These are encapsulated in [`Error`], and the [`ErrorKind`] enum gives
//! the category. Distinguishing "not found" from transient failure is the
//! collaborator's responsibility; callers of the trait only wrap and forward.

pub(crate) mod catalog;

use async_trait::async_trait;
use std::error::Error as StdError;
use std::fmt;

/// General categories of errors that can be returned by a [`ServiceDiscovery`]
/// implementation.
/// The static catalog only reports `NotFound` and `InvalidConfiguration`, the
/// other categories belong to live cluster collaborators.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorKind {
    /// The requested service does not exist in the namespace.
    NotFound,
    /// Failed to reach the discovery backend.
    Connection,
    /// The discovery backend did not answer in time.
    TimedOut,
    /// The caller is not allowed to read services in the namespace.
    PermissionDenied,
    /// The collaborator itself is misconfigured.
    InvalidConfiguration,
    /// An error that does not fit into any of the other categories.
    UnspecifiedError,
}

#[derive(Debug)]
pub(crate) struct Error {
    kind: ErrorKind,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub(crate) fn from_source(kind: ErrorKind, source: Box<dyn StdError + Send + Sync>) -> Error {
        Error {
            kind,
            source: Some(source),
        }
    }

    pub(crate) fn kind(&self) -> ErrorKind {
        self.kind
    }

    fn message(&self) -> &'static str {
        match self.kind {
            ErrorKind::NotFound => "service not found",
            ErrorKind::Connection => "failed to connect to the discovery backend",
            ErrorKind::TimedOut => "discovery request timed out",
            ErrorKind::PermissionDenied => "not permitted to read services",
            ErrorKind::InvalidConfiguration => "service discovery is misconfigured",
            ErrorKind::UnspecifiedError => "an unspecified discovery error occurred",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {}", self.message(), source),
            None => write!(f, "{}", self.message()),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|e| &**e as _)
    }
}

/// Networking and metadata facts about one discovered model registry service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ServiceDetails {
    /// The service name, unique within its namespace.
    pub name: String,
    pub description: String,
    pub display_name: String,
    /// The cluster-internal IP of the service.
    pub cluster_ip: String,
    /// The port serving the REST API. Kubernetes models ports as `i32`.
    pub http_port: i32,
    pub is_https: bool,
    /// An externally routable `host[:port]`, or empty when the service has none.
    pub external_address_rest: String,
}

/// A trait implemented by all service discovery collaborators.
#[async_trait]
pub(crate) trait ServiceDiscovery: Send + Sync {
    /// Returns every model registry service in `namespace`. A namespace without
    /// services yields an empty list.
    async fn service_details(&self, namespace: &str) -> Result<Vec<ServiceDetails>, Error>;

    /// Returns the service called `name` in `namespace`.
    async fn service_details_by_name(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ServiceDetails, Error>;
}
