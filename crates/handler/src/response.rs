//! The normalized response returned to the invoker.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::outcome::{ActionResult, Output};

/// Message when the membership check could not be completed.
pub const VALIDATION_EXCEPTION: &str = "Validation failed with exception";

/// Message when the target is not a member of the global cluster.
pub const VALIDATION_FAILED: &str = "Validation failed";

/// Message after a failover was dispatched.
pub const FAILOVER_COMPLETED: &str = "Failover action completed";

/// Message after a failback was dispatched.
pub const FAILBACK_COMPLETED: &str = "Failback action completed";

/// Message after a status poll.
pub const POLLING_COMPLETED: &str = "Polling action completed";

/// Message for an unrecognized action.
pub const NO_ACTION_MATCHED: &str = "No action matched";

/// Message for an event that could not be turned into a request.
pub const INVALID_REQUEST: &str = "Invalid request";

/// Message when no client could be built for the target's region.
pub const CLIENT_UNAVAILABLE: &str = "Client initialization failed";

/// The JSON document carried in [`Response::body`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseBody {
    /// Human readable summary.
    pub message: String,

    /// Result of a dispatched action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Output>,

    /// Error detail, present whenever something failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The response handed back to the invoking runtime.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP-style status code: 200, 400 or 500.
    #[serde(rename = "statusCode")]
    pub status_code: u16,

    /// JSON-encoded [`ResponseBody`].
    pub body: String,
}

impl Response {
    fn new(status: StatusCode, body: &ResponseBody) -> Self {
        let body = serde_json::to_string(body).unwrap_or_else(|e| {
            error!("failed to encode response body: {}", e);
            format!(r#"{{"Message":"{}"}}"#, body.message)
        });

        Self {
            status_code: status.as_u16(),
            body,
        }
    }

    /// A response carrying only a message.
    #[must_use]
    pub fn message(status: StatusCode, message: &str) -> Self {
        Self::new(
            status,
            &ResponseBody {
                message: message.to_string(),
                output: None,
                error: None,
            },
        )
    }

    /// A response for a failure that happened before any action ran.
    #[must_use]
    pub fn failure(status: StatusCode, message: &str, error: impl ToString) -> Self {
        Self::new(
            status,
            &ResponseBody {
                message: message.to_string(),
                output: None,
                error: Some(error.to_string()),
            },
        )
    }

    /// A response for a dispatched action.
    ///
    /// Failed actions map to 500 like every other failure; converged and
    /// not-yet-converged results are both 200.
    #[must_use]
    pub fn action(message: &str, result: &ActionResult) -> Self {
        let status = match result {
            ActionResult::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ActionResult::Succeeded | ActionResult::NotYet => StatusCode::OK,
        };

        Self::new(
            status,
            &ResponseBody {
                message: message.to_string(),
                output: Some(result.output()),
                error: result.error().map(str::to_string),
            },
        )
    }

    /// Decodes [`Self::body`].
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a valid response document.
    pub fn parse_body(&self) -> serde_json::Result<ResponseBody> {
        serde_json::from_str(&self.body)
    }
}
