use failover_cluster::{ClientErrorKind, GlobalClusterClientError};
use thiserror::Error;

/// Result type for the RDS client.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the RDS-backed client.
#[derive(Debug, Error)]
pub enum Error {
    /// Required field absent from a control plane response.
    #[error("missing {0} in response")]
    MissingDetails(&'static str),

    /// The RDS API returned an error.
    #[error(transparent)]
    Rds(#[from] aws_sdk_rds::Error),
}

impl GlobalClusterClientError for Error {
    fn kind(&self) -> ClientErrorKind {
        match self {
            Self::MissingDetails(_) => ClientErrorKind::Malformed,
            Self::Rds(
                aws_sdk_rds::Error::DbClusterNotFoundFault(_)
                | aws_sdk_rds::Error::GlobalClusterNotFoundFault(_),
            ) => ClientErrorKind::NotFound,
            Self::Rds(_) => ClientErrorKind::External,
        }
    }
}
