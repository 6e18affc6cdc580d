//! In-memory implementation of the global cluster client for tests and local runs.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use failover_cluster::{
    ClientFactory, ClusterStatus, DbCluster, GlobalCluster, GlobalClusterClient,
};
use parking_lot::Mutex;
use serde_json::Value;

/// Status a global cluster moves to when a failover is accepted.
pub const FAILING_OVER: &str = "failing-over";

/// Status a global cluster moves to when a switchover is accepted.
pub const SWITCHING_OVER: &str = "switching-over";

/// Status the promoted cluster reports until the role change completes.
pub const MODIFYING: &str = "modifying";

/// An operation of the client interface, used to inject failures.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operation {
    /// `describe_global_cluster`
    DescribeGlobalCluster,

    /// `describe_db_cluster`
    DescribeDbCluster,

    /// `failover_global_cluster`
    FailoverGlobalCluster,

    /// `switchover_global_cluster`
    SwitchoverGlobalCluster,
}

/// A call received by the mock, in arrival order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Call {
    /// `describe_global_cluster`
    DescribeGlobalCluster(String),

    /// `describe_db_cluster`
    DescribeDbCluster(String),

    /// `failover_global_cluster`
    FailoverGlobalCluster {
        /// Global cluster identifier.
        global_cluster_identifier: String,
        /// Target member ARN.
        target_db_cluster_identifier: String,
        /// Whether data loss was allowed.
        allow_data_loss: bool,
    },

    /// `switchover_global_cluster`
    SwitchoverGlobalCluster {
        /// Global cluster identifier.
        global_cluster_identifier: String,
        /// Target member ARN.
        target_db_cluster_identifier: String,
    },
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Call>,
    db_clusters: HashMap<String, ClusterStatus>,
    failures: HashMap<Operation, String>,
    global_clusters: HashMap<String, GlobalCluster>,
    malformed: HashSet<String>,
}

impl State {
    fn check(&self, operation: Operation) -> Result<(), Error> {
        self.failures
            .get(&operation)
            .map_or(Ok(()), |message| Err(Error::Injected(message.clone())))
    }

    fn promote(
        &mut self,
        global_cluster_identifier: &str,
        target_db_cluster_identifier: &str,
        transitional_status: &str,
    ) -> Result<(), Error> {
        let cluster = self
            .global_clusters
            .get_mut(global_cluster_identifier)
            .ok_or_else(|| Error::GlobalClusterNotFound(global_cluster_identifier.to_string()))?;

        if cluster.member(target_db_cluster_identifier).is_none() {
            return Err(Error::InvalidTarget(
                target_db_cluster_identifier.to_string(),
            ));
        }

        for member in &mut cluster.members {
            member.is_writer = member.db_cluster_arn == target_db_cluster_identifier;
        }
        cluster.status = ClusterStatus::from(transitional_status);

        self.db_clusters.insert(
            target_db_cluster_identifier.to_string(),
            ClusterStatus::from(MODIFYING),
        );

        Ok(())
    }
}

/// Mock implementation of the global cluster client.
///
/// Clones share state, so a test can keep one handle to script the control
/// plane while the code under test holds another.
#[derive(Clone, Debug, Default)]
pub struct MockClusterClient {
    state: Arc<Mutex<State>>,
}

impl MockClusterClient {
    /// Create an empty mock control plane.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock control plane from a JSON fixture file.
    ///
    /// The fixture has the shape
    /// `{"global_clusters": [GlobalCluster, ...], "db_clusters": {"<arn>": "<status>"}}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid fixture.
    pub fn from_fixture_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Fixture(format!("Failed to read fixture file: {e}")))?;

        let fixture: Value = serde_json::from_str(&content)
            .map_err(|e| Error::Fixture(format!("Failed to parse fixture file: {e}")))?;

        let global_clusters: Vec<GlobalCluster> = serde_json::from_value(
            fixture
                .get("global_clusters")
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
        )
        .map_err(|e| Error::Fixture(format!("Invalid global_clusters: {e}")))?;

        let db_clusters: HashMap<String, ClusterStatus> = serde_json::from_value(
            fixture
                .get("db_clusters")
                .cloned()
                .unwrap_or_else(|| Value::Object(serde_json::Map::new())),
        )
        .map_err(|e| Error::Fixture(format!("Invalid db_clusters: {e}")))?;

        let mock = Self::new();
        for cluster in global_clusters {
            mock.add_global_cluster(cluster);
        }
        for (identifier, status) in db_clusters {
            mock.set_db_cluster_status(&identifier, status);
        }

        Ok(mock)
    }

    /// Register (or replace) a global cluster.
    pub fn add_global_cluster(&self, cluster: GlobalCluster) {
        self.state
            .lock()
            .global_clusters
            .insert(cluster.identifier.clone(), cluster);
    }

    /// Set the status of a registered global cluster.
    pub fn set_global_cluster_status(&self, identifier: &str, status: impl Into<ClusterStatus>) {
        if let Some(cluster) = self.state.lock().global_clusters.get_mut(identifier) {
            cluster.status = status.into();
        }
    }

    /// Set (or register) the status of a regional cluster.
    pub fn set_db_cluster_status(&self, identifier: &str, status: impl Into<ClusterStatus>) {
        self.state
            .lock()
            .db_clusters
            .insert(identifier.to_string(), status.into());
    }

    /// Finish an in-flight role change: the global cluster and its writer become available.
    pub fn complete_role_change(&self, global_cluster_identifier: &str) {
        let mut state = self.state.lock();

        let Some(cluster) = state.global_clusters.get_mut(global_cluster_identifier) else {
            return;
        };
        cluster.status = ClusterStatus::Available;

        let writer = cluster.writer().map(|m| m.db_cluster_arn.clone());
        if let Some(writer) = writer {
            state.db_clusters.insert(writer, ClusterStatus::Available);
        }
    }

    /// Make every call of `operation` fail with `message` until cleared.
    pub fn fail(&self, operation: Operation, message: &str) {
        self.state
            .lock()
            .failures
            .insert(operation, message.to_string());
    }

    /// Stop failing `operation`.
    pub fn clear_failure(&self, operation: Operation) {
        self.state.lock().failures.remove(&operation);
    }

    /// Make describe calls for this global cluster return a response the
    /// control plane would never produce (no cluster in the list).
    pub fn return_malformed(&self, global_cluster_identifier: &str) {
        self.state
            .lock()
            .malformed
            .insert(global_cluster_identifier.to_string());
    }

    /// Calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// Whether any failover or switchover was requested.
    #[must_use]
    pub fn mutated(&self) -> bool {
        self.state.lock().calls.iter().any(|call| {
            matches!(
                call,
                Call::FailoverGlobalCluster { .. } | Call::SwitchoverGlobalCluster { .. }
            )
        })
    }
}

#[async_trait]
impl GlobalClusterClient for MockClusterClient {
    type Error = Error;

    async fn describe_global_cluster(
        &self,
        global_cluster_identifier: &str,
    ) -> Result<Option<GlobalCluster>, Self::Error> {
        let mut state = self.state.lock();
        state.calls.push(Call::DescribeGlobalCluster(
            global_cluster_identifier.to_string(),
        ));
        state.check(Operation::DescribeGlobalCluster)?;

        if state.malformed.contains(global_cluster_identifier) {
            return Err(Error::Malformed("empty global cluster list".to_string()));
        }

        Ok(state.global_clusters.get(global_cluster_identifier).cloned())
    }

    async fn describe_db_cluster(
        &self,
        db_cluster_identifier: &str,
    ) -> Result<DbCluster, Self::Error> {
        let mut state = self.state.lock();
        state
            .calls
            .push(Call::DescribeDbCluster(db_cluster_identifier.to_string()));
        state.check(Operation::DescribeDbCluster)?;

        state
            .db_clusters
            .get(db_cluster_identifier)
            .map(|status| DbCluster {
                identifier: db_cluster_identifier.to_string(),
                status: status.clone(),
            })
            .ok_or_else(|| Error::DbClusterNotFound(db_cluster_identifier.to_string()))
    }

    async fn failover_global_cluster(
        &self,
        global_cluster_identifier: &str,
        target_db_cluster_identifier: &str,
        allow_data_loss: bool,
    ) -> Result<(), Self::Error> {
        let mut state = self.state.lock();
        state.calls.push(Call::FailoverGlobalCluster {
            global_cluster_identifier: global_cluster_identifier.to_string(),
            target_db_cluster_identifier: target_db_cluster_identifier.to_string(),
            allow_data_loss,
        });
        state.check(Operation::FailoverGlobalCluster)?;

        state.promote(
            global_cluster_identifier,
            target_db_cluster_identifier,
            FAILING_OVER,
        )
    }

    async fn switchover_global_cluster(
        &self,
        global_cluster_identifier: &str,
        target_db_cluster_identifier: &str,
    ) -> Result<(), Self::Error> {
        let mut state = self.state.lock();
        state.calls.push(Call::SwitchoverGlobalCluster {
            global_cluster_identifier: global_cluster_identifier.to_string(),
            target_db_cluster_identifier: target_db_cluster_identifier.to_string(),
        });
        state.check(Operation::SwitchoverGlobalCluster)?;

        state.promote(
            global_cluster_identifier,
            target_db_cluster_identifier,
            SWITCHING_OVER,
        )
    }
}

/// Factory that hands out clones of one `MockClusterClient` and records the
/// regions it was asked for.
#[derive(Clone, Debug, Default)]
pub struct MockClientFactory {
    client: MockClusterClient,
    failure: Arc<Mutex<Option<String>>>,
    regions: Arc<Mutex<Vec<String>>>,
}

impl MockClientFactory {
    /// Create a factory serving `client` for every region.
    #[must_use]
    pub fn new(client: MockClusterClient) -> Self {
        Self {
            client,
            failure: Arc::new(Mutex::new(None)),
            regions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make client construction fail with `message`.
    pub fn fail(&self, message: &str) {
        *self.failure.lock() = Some(message.to_string());
    }

    /// Regions requested so far, in order.
    #[must_use]
    pub fn regions(&self) -> Vec<String> {
        self.regions.lock().clone()
    }
}

#[async_trait]
impl ClientFactory for MockClientFactory {
    type Client = MockClusterClient;
    type Error = Error;

    async fn client_for_region(&self, region: &str) -> Result<MockClusterClient, Error> {
        self.regions.lock().push(region.to_string());

        if let Some(message) = self.failure.lock().clone() {
            return Err(Error::Injected(message));
        }

        Ok(self.client.clone())
    }
}

#[cfg(test)]
mod tests {
    use failover_cluster::GlobalClusterMember;

    use super::*;

    const DB1: &str = "arn:aws:rds:us-east-1:123456789012:cluster:db1";
    const DB2: &str = "arn:aws:rds:us-west-2:123456789012:cluster:db2";

    fn two_region_mock() -> MockClusterClient {
        let mock = MockClusterClient::new();
        mock.add_global_cluster(GlobalCluster {
            identifier: "g1".to_string(),
            status: ClusterStatus::Available,
            members: vec![
                GlobalClusterMember {
                    db_cluster_arn: DB1.to_string(),
                    is_writer: true,
                    readers: vec![DB2.to_string()],
                },
                GlobalClusterMember {
                    db_cluster_arn: DB2.to_string(),
                    is_writer: false,
                    readers: Vec::new(),
                },
            ],
        });
        mock.set_db_cluster_status(DB1, "available");
        mock.set_db_cluster_status(DB2, "available");
        mock
    }

    #[tokio::test]
    async fn test_describe() {
        let mock = two_region_mock();

        let cluster = mock.describe_global_cluster("g1").await.unwrap().unwrap();
        assert_eq!(cluster.members.len(), 2);
        assert!(mock.describe_global_cluster("g2").await.unwrap().is_none());

        let db = mock.describe_db_cluster(DB2).await.unwrap();
        assert!(db.status.is_available());
        assert!(matches!(
            mock.describe_db_cluster("missing").await,
            Err(Error::DbClusterNotFound(_))
        ));

        assert!(!mock.mutated());
    }

    #[tokio::test]
    async fn test_failover_moves_writer() {
        let mock = two_region_mock();

        mock.failover_global_cluster("g1", DB2, true).await.unwrap();

        let cluster = mock.describe_global_cluster("g1").await.unwrap().unwrap();
        assert_eq!(cluster.status.as_str(), FAILING_OVER);
        assert!(cluster.member(DB2).unwrap().is_writer);
        assert!(!cluster.member(DB1).unwrap().is_writer);
        assert_eq!(
            mock.describe_db_cluster(DB2).await.unwrap().status.as_str(),
            MODIFYING
        );

        mock.complete_role_change("g1");

        let cluster = mock.describe_global_cluster("g1").await.unwrap().unwrap();
        assert!(cluster.status.is_available());
        assert!(mock.describe_db_cluster(DB2).await.unwrap().status.is_available());
        assert!(mock.mutated());
    }

    #[tokio::test]
    async fn test_switchover_rejects_non_member() {
        let mock = two_region_mock();

        let result = mock
            .switchover_global_cluster("g1", "arn:aws:rds:eu-west-1:123456789012:cluster:db3")
            .await;

        assert!(matches!(result, Err(Error::InvalidTarget(_))));
        let cluster = mock.describe_global_cluster("g1").await.unwrap().unwrap();
        assert!(cluster.status.is_available());
    }

    #[tokio::test]
    async fn test_injected_failure_is_recorded() {
        let mock = two_region_mock();
        mock.fail(Operation::DescribeGlobalCluster, "throttled");

        assert!(matches!(
            mock.describe_global_cluster("g1").await,
            Err(Error::Injected(m)) if m == "throttled"
        ));
        assert_eq!(mock.calls(), vec![Call::DescribeGlobalCluster("g1".to_string())]);

        mock.clear_failure(Operation::DescribeGlobalCluster);
        assert!(mock.describe_global_cluster("g1").await.is_ok());
    }

    #[tokio::test]
    async fn test_factory_records_regions() {
        let factory = MockClientFactory::new(two_region_mock());

        factory.client_for_region("us-west-2").await.unwrap();
        factory.fail("no credentials");
        assert!(factory.client_for_region("us-east-1").await.is_err());

        assert_eq!(factory.regions(), vec!["us-west-2", "us-east-1"]);
    }
}
