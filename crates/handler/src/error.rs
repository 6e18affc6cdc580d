use thiserror::Error;

/// Result type for request handling.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop an invocation before an action can be evaluated.
#[derive(Debug, Error)]
pub enum Error {
    /// The target identifier could not be parsed as a cluster ARN.
    #[error("invalid cluster arn '{0}': {1}")]
    InvalidArn(String, &'static str),

    /// The event is missing a required field or has the wrong shape.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    /// No client could be built for the target's region.
    #[error("failed to create client for region {region}: {reason}")]
    ClientUnavailable {
        /// The region parsed from the target ARN.
        region: String,

        /// Why the factory failed.
        reason: String,
    },
}

impl Error {
    /// Whether the error was caused by the caller's input rather than by us.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidArn(..) | Self::InvalidRequest(_))
    }
}
