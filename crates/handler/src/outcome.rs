//! Results of validation and of the dispatched actions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const EXCEPTION: &str = "Exception";

/// Whether the target belongs to the named global cluster.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Membership {
    /// The target is a member.
    Member,

    /// The target is not a member, the cluster has no members, or the global
    /// cluster does not exist.
    NotMember,

    /// The control plane could not answer.
    Failed(String),
}

/// Outcome of a failover, failback or status action.
///
/// Callers poll `status` until it leaves `NotYet`; `Failed` means stop polling.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ActionResult {
    /// The request was accepted (failover/failback) or the target has converged (status).
    Succeeded,

    /// The target has not converged yet.
    NotYet,

    /// An error occurred.
    Failed(String),
}

impl ActionResult {
    /// The value reported as `Output` in the response body.
    #[must_use]
    pub const fn output(&self) -> Output {
        match self {
            Self::Succeeded => Output::True,
            Self::NotYet => Output::False,
            Self::Failed(_) => Output::Exception,
        }
    }

    /// The error detail, if the action failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(detail) => Some(detail),
            Self::Succeeded | Self::NotYet => None,
        }
    }
}

/// Wire form of an [`ActionResult`]: `true`, `false` or `"Exception"`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Output {
    /// `true`
    True,

    /// `false`
    False,

    /// `"Exception"`
    Exception,
}

impl Serialize for Output {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::True => serializer.serialize_bool(true),
            Self::False => serializer.serialize_bool(false),
            Self::Exception => serializer.serialize_str(EXCEPTION),
        }
    }
}

impl<'de> Deserialize<'de> for Output {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Bool(true) => Ok(Self::True),
            Raw::Bool(false) => Ok(Self::False),
            Raw::Text(text) if text == EXCEPTION => Ok(Self::Exception),
            Raw::Text(text) => Err(serde::de::Error::custom(format!(
                "unexpected output value: {text}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_output_wire_values() {
        assert_eq!(serde_json::to_value(ActionResult::Succeeded.output()).unwrap(), json!(true));
        assert_eq!(serde_json::to_value(ActionResult::NotYet.output()).unwrap(), json!(false));
        assert_eq!(
            serde_json::to_value(ActionResult::Failed("boom".to_string()).output()).unwrap(),
            json!("Exception")
        );
    }

    #[test]
    fn test_unknown_output_is_rejected() {
        assert!(serde_json::from_value::<Output>(json!("exception")).is_err());
        assert!(serde_json::from_value::<Output>(json!(null)).is_err());
    }

    #[test]
    fn test_error_detail_only_on_failure() {
        assert_eq!(ActionResult::Failed("throttled".to_string()).error(), Some("throttled"));
        assert_eq!(ActionResult::Succeeded.error(), None);
        assert_eq!(ActionResult::NotYet.error(), None);
    }
}
