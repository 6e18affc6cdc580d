//! The invocation payload.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;

/// The action a caller asks for.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    /// Forced failover to the target, allowing data loss.
    Failover,

    /// Graceful switchover back to the target.
    Failback,

    /// Poll whether the target has converged as writer.
    Status,

    /// Anything else. Validated like any other request, then ignored.
    Unrecognized(String),
}

impl Action {
    /// The wire spelling of the action.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Failover => "failover",
            Self::Failback => "failback",
            Self::Status => "status",
            Self::Unrecognized(action) => action,
        }
    }
}

impl From<String> for Action {
    fn from(action: String) -> Self {
        match action.as_str() {
            "failover" => Self::Failover,
            "failback" => Self::Failback,
            "status" => Self::Status,
            _ => Self::Unrecognized(action),
        }
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Unrecognized(action) => action,
            other => other.as_str().to_string(),
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failover/failback/status request for one member of a global cluster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    /// Name of the global cluster.
    #[serde(rename = "GlobalClusterIdentifier")]
    pub global_cluster_identifier: String,

    /// ARN of the member to act on.
    #[serde(rename = "TargetDbClusterIdentifier")]
    pub target_db_cluster_identifier: String,

    /// What to do.
    #[serde(rename = "Action")]
    pub action: Action,

    /// Any other fields of the event, kept as-is.
    #[serde(flatten)]
    pub passthrough: Map<String, Value>,
}

impl ActionRequest {
    /// Deserializes a request from a raw invocation event.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidRequest`] if a required field is missing
    /// or is not a string.
    pub fn from_event(event: Value) -> Result<Self> {
        Ok(serde_json::from_value(event)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::Error;

    #[test]
    fn test_from_event() {
        let request = ActionRequest::from_event(json!({
            "GlobalClusterIdentifier": "g1",
            "TargetDbClusterIdentifier": "arn:aws:rds:us-west-2:123456789012:cluster:db2",
            "Action": "failback",
            "ExecutionName": "dr-drill-42",
        }))
        .unwrap();

        assert_eq!(request.global_cluster_identifier, "g1");
        assert_eq!(
            request.target_db_cluster_identifier,
            "arn:aws:rds:us-west-2:123456789012:cluster:db2"
        );
        assert_eq!(request.action, Action::Failback);
        assert_eq!(request.passthrough.get("ExecutionName"), Some(&json!("dr-drill-42")));
    }

    #[test]
    fn test_unrecognized_action_is_kept() {
        let request = ActionRequest::from_event(json!({
            "GlobalClusterIdentifier": "g1",
            "TargetDbClusterIdentifier": "arn:aws:rds:us-west-2:123456789012:cluster:db2",
            "Action": "Failover",
        }))
        .unwrap();

        assert_eq!(request.action, Action::Unrecognized("Failover".to_string()));
        assert_eq!(request.action.to_string(), "Failover");
    }

    #[test]
    fn test_missing_field_is_invalid_request() {
        let result = ActionRequest::from_event(json!({
            "GlobalClusterIdentifier": "g1",
            "Action": "status",
        }));

        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_non_string_field_is_invalid_request() {
        let result = ActionRequest::from_event(json!({
            "GlobalClusterIdentifier": "g1",
            "TargetDbClusterIdentifier": 42,
            "Action": "status",
        }));
        assert!(matches!(result, Err(Error::InvalidRequest(_))));

        assert!(matches!(
            ActionRequest::from_event(json!("status")),
            Err(Error::InvalidRequest(_))
        ));
    }
}
