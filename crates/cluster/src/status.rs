use std::fmt::{self, Display};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const AVAILABLE: &str = "available";

/// Status reported by the control plane for a global or regional cluster.
///
/// Only `available` is meaningful to failover decisions; every other value
/// (`failing-over`, `switching-over`, `modifying`, ...) is kept verbatim.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ClusterStatus {
    /// The cluster is available.
    Available,

    /// Any other status string.
    Other(String),
}

impl ClusterStatus {
    /// Whether the status is `available`.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// The status as the control plane spells it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Available => AVAILABLE,
            Self::Other(status) => status,
        }
    }
}

impl From<&str> for ClusterStatus {
    fn from(status: &str) -> Self {
        if status == AVAILABLE {
            Self::Available
        } else {
            Self::Other(status.to_string())
        }
    }
}

impl From<String> for ClusterStatus {
    fn from(status: String) -> Self {
        if status == AVAILABLE {
            Self::Available
        } else {
            Self::Other(status)
        }
    }
}

impl Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ClusterStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ClusterStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_exact_available_is_available() {
        assert!(ClusterStatus::from("available").is_available());
        assert!(!ClusterStatus::from("Available").is_available());
        assert!(!ClusterStatus::from("failing-over").is_available());
        assert!(!ClusterStatus::from("").is_available());
    }

    #[test]
    fn test_other_status_is_kept_verbatim() {
        let status = ClusterStatus::from("switching-over".to_string());
        assert_eq!(status, ClusterStatus::Other("switching-over".to_string()));
        assert_eq!(status.to_string(), "switching-over");
    }

    #[test]
    fn test_serde_uses_plain_strings() {
        let json = serde_json::to_string(&ClusterStatus::Available).unwrap();
        assert_eq!(json, "\"available\"");

        let status: ClusterStatus = serde_json::from_str("\"modifying\"").unwrap();
        assert_eq!(status.as_str(), "modifying");
    }
}
