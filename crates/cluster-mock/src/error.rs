//! Error types for the mock global cluster client.

use failover_cluster::{ClientErrorKind, GlobalClusterClientError};
use thiserror::Error;

/// Error type for the mock global cluster client.
#[derive(Clone, Debug, Error)]
pub enum Error {
    /// Error when a regional cluster has not been registered.
    #[error("DB cluster not found: {0}")]
    DbClusterNotFound(String),

    /// Error when a global cluster has not been registered.
    #[error("Global cluster not found: {0}")]
    GlobalClusterNotFound(String),

    /// Error injected by the test.
    #[error("Injected failure: {0}")]
    Injected(String),

    /// Error when a scripted response is missing required fields.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Error when the failover target is not a member of the global cluster.
    #[error("Invalid failover target: {0}")]
    InvalidTarget(String),

    /// Error when loading or parsing a fixture file.
    #[error("Fixture error: {0}")]
    Fixture(String),
}

impl GlobalClusterClientError for Error {
    fn kind(&self) -> ClientErrorKind {
        match self {
            Self::DbClusterNotFound(_) | Self::GlobalClusterNotFound(_) => {
                ClientErrorKind::NotFound
            }
            Self::Injected(_) | Self::InvalidTarget(_) => ClientErrorKind::External,
            Self::Malformed(_) => ClientErrorKind::Malformed,
            Self::Fixture(_) => ClientErrorKind::Other,
        }
    }
}
