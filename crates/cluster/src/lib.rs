//! Abstract interface for describing and re-homing the writer of a globally
//! replicated database cluster.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod status;

pub use status::ClusterStatus;

use std::error::Error;
use std::fmt::{self, Debug, Display};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of a global cluster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GlobalCluster {
    /// The identifier of the global cluster.
    pub identifier: String,

    /// The status of the global cluster as a whole.
    pub status: ClusterStatus,

    /// The member clusters, in the order the control plane returned them.
    pub members: Vec<GlobalClusterMember>,
}

impl GlobalCluster {
    /// Finds the member whose ARN equals `db_cluster_arn`.
    ///
    /// Members are scanned in the order they were returned; the first match wins.
    #[must_use]
    pub fn member(&self, db_cluster_arn: &str) -> Option<&GlobalClusterMember> {
        self.members
            .iter()
            .find(|member| member.db_cluster_arn == db_cluster_arn)
    }

    /// Returns the member currently accepting writes, if any.
    #[must_use]
    pub fn writer(&self) -> Option<&GlobalClusterMember> {
        self.members.iter().find(|member| member.is_writer)
    }
}

/// A database cluster participating in a global cluster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GlobalClusterMember {
    /// The ARN of the member cluster. The region is the fourth colon-delimited segment.
    pub db_cluster_arn: String,

    /// Whether this member is the writer of the global cluster.
    pub is_writer: bool,

    /// ARNs of the members replicating from this one.
    #[serde(default)]
    pub readers: Vec<String>,
}

/// A regional database cluster as seen by its own describe call.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DbCluster {
    /// The identifier (or ARN) the cluster was described by.
    pub identifier: String,

    /// The status of the cluster.
    pub status: ClusterStatus,
}

/// The kind of client error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClientErrorKind {
    /// The named cluster does not exist.
    NotFound,

    /// The control plane answered but the response was missing required fields.
    Malformed,

    /// The control plane rejected or failed the request.
    External,

    /// Other/unknown error
    Other,
}

impl Display for ClientErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Marker trait for `GlobalClusterClient` errors
pub trait GlobalClusterClientError: Debug + Error + Send + Sync {
    /// Returns the kind of this error
    fn kind(&self) -> ClientErrorKind;
}

/// Narrow view of a database control plane, bound to a single region.
#[async_trait]
pub trait GlobalClusterClient
where
    Self: Clone + Send + Sync + 'static,
{
    /// The error type for this client.
    type Error: GlobalClusterClientError;

    /// Describe a global cluster.
    ///
    /// Returns `None` when the control plane has no global cluster with this identifier.
    async fn describe_global_cluster(
        &self,
        global_cluster_identifier: &str,
    ) -> Result<Option<GlobalCluster>, Self::Error>;

    /// Describe a single regional database cluster.
    async fn describe_db_cluster(
        &self,
        db_cluster_identifier: &str,
    ) -> Result<DbCluster, Self::Error>;

    /// Request a forced failover of the global cluster to the target member.
    ///
    /// The request is asynchronous: success means the control plane accepted it.
    async fn failover_global_cluster(
        &self,
        global_cluster_identifier: &str,
        target_db_cluster_identifier: &str,
        allow_data_loss: bool,
    ) -> Result<(), Self::Error>;

    /// Request a graceful switchover of the global cluster to the target member.
    ///
    /// The request is asynchronous: success means the control plane accepted it.
    async fn switchover_global_cluster(
        &self,
        global_cluster_identifier: &str,
        target_db_cluster_identifier: &str,
    ) -> Result<(), Self::Error>;
}

/// Builds clients bound to a region.
#[async_trait]
pub trait ClientFactory
where
    Self: Send + Sync + 'static,
{
    /// The client type this factory produces.
    type Client: GlobalClusterClient;

    /// The error type returned when a client cannot be built.
    type Error: Debug + Error + Send + Sync;

    /// Returns a client talking to the control plane of `region`.
    async fn client_for_region(&self, region: &str) -> Result<Self::Client, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(arn: &str, is_writer: bool) -> GlobalClusterMember {
        GlobalClusterMember {
            db_cluster_arn: arn.to_string(),
            is_writer,
            readers: Vec::new(),
        }
    }

    #[test]
    fn test_member_lookup_is_exact() {
        let cluster = GlobalCluster {
            identifier: "g1".to_string(),
            status: ClusterStatus::Available,
            members: vec![
                member("arn:aws:rds:us-east-1:123456789012:cluster:db1", true),
                member("arn:aws:rds:us-west-2:123456789012:cluster:db10", false),
            ],
        };

        let found = cluster
            .member("arn:aws:rds:us-west-2:123456789012:cluster:db10")
            .unwrap();
        assert!(!found.is_writer);

        assert!(cluster.member("arn:aws:rds:us-west-2:123456789012:cluster:db1").is_none());
        assert!(cluster.member("db10").is_none());
    }

    #[test]
    fn test_writer() {
        let cluster = GlobalCluster {
            identifier: "g1".to_string(),
            status: ClusterStatus::Available,
            members: vec![
                member("arn:aws:rds:us-west-2:123456789012:cluster:db2", false),
                member("arn:aws:rds:us-east-1:123456789012:cluster:db1", true),
            ],
        };

        assert_eq!(
            cluster.writer().map(|m| m.db_cluster_arn.as_str()),
            Some("arn:aws:rds:us-east-1:123456789012:cluster:db1")
        );

        let empty = GlobalCluster {
            identifier: "g2".to_string(),
            status: ClusterStatus::Available,
            members: Vec::new(),
        };
        assert!(empty.writer().is_none());
    }
}
