//! Mapping from RDS API shapes to the failover domain types.

use aws_sdk_rds::types;
use failover_cluster::{DbCluster, GlobalCluster, GlobalClusterMember};

use crate::{Error, Result};

/// Picks the global cluster named `identifier` out of a describe response.
///
/// An empty list is malformed (the API reports an unknown identifier with a
/// fault, not an empty list). A non-empty list without a matching entry means
/// the named cluster does not exist.
pub fn select_global_cluster(
    clusters: Option<Vec<types::GlobalCluster>>,
    identifier: &str,
) -> Result<Option<GlobalCluster>> {
    let clusters = clusters.unwrap_or_default();

    if clusters.is_empty() {
        return Err(Error::MissingDetails("global_clusters"));
    }

    clusters
        .into_iter()
        .find(|c| {
            c.global_cluster_identifier.as_deref() == Some(identifier)
                || c.global_cluster_arn.as_deref() == Some(identifier)
        })
        .map(global_cluster)
        .transpose()
}

fn global_cluster(cluster: types::GlobalCluster) -> Result<GlobalCluster> {
    Ok(GlobalCluster {
        identifier: cluster
            .global_cluster_identifier
            .ok_or(Error::MissingDetails("global_cluster_identifier"))?,
        status: cluster
            .status
            .ok_or(Error::MissingDetails("global cluster status"))?
            .into(),
        members: cluster
            .global_cluster_members
            .ok_or(Error::MissingDetails("global_cluster_members"))?
            .into_iter()
            .map(member)
            .collect::<Result<Vec<_>>>()?,
    })
}

fn member(member: types::GlobalClusterMember) -> Result<GlobalClusterMember> {
    Ok(GlobalClusterMember {
        db_cluster_arn: member
            .db_cluster_arn
            .ok_or(Error::MissingDetails("db_cluster_arn"))?,
        is_writer: member.is_writer.ok_or(Error::MissingDetails("is_writer"))?,
        readers: member.readers.unwrap_or_default(),
    })
}

/// Takes the first cluster of a `DescribeDBClusters` response.
pub fn first_db_cluster(
    clusters: Option<Vec<types::DbCluster>>,
    identifier: &str,
) -> Result<DbCluster> {
    let cluster = clusters
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or(Error::MissingDetails("db_clusters"))?;

    Ok(DbCluster {
        identifier: cluster
            .db_cluster_identifier
            .unwrap_or_else(|| identifier.to_string()),
        status: cluster
            .status
            .ok_or(Error::MissingDetails("db cluster status"))?
            .into(),
    })
}

#[cfg(test)]
mod tests {
    use failover_cluster::ClusterStatus;
    use pretty_assertions::assert_eq;

    use super::*;

    const DB1: &str = "arn:aws:rds:us-east-1:123456789012:cluster:db1";
    const DB2: &str = "arn:aws:rds:us-west-2:123456789012:cluster:db2";

    fn sdk_member(arn: &str, is_writer: bool) -> types::GlobalClusterMember {
        types::GlobalClusterMember::builder()
            .db_cluster_arn(arn)
            .is_writer(is_writer)
            .build()
    }

    #[test]
    fn test_select_global_cluster() {
        let clusters = vec![
            types::GlobalCluster::builder()
                .global_cluster_identifier("g1")
                .status("failing-over")
                .global_cluster_members(
                    types::GlobalClusterMember::builder()
                        .db_cluster_arn(DB1)
                        .is_writer(true)
                        .readers(DB2)
                        .build(),
                )
                .global_cluster_members(sdk_member(DB2, false))
                .build(),
        ];

        let cluster = select_global_cluster(Some(clusters), "g1").unwrap().unwrap();

        assert_eq!(
            cluster,
            GlobalCluster {
                identifier: "g1".to_string(),
                status: ClusterStatus::Other("failing-over".to_string()),
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
            }
        );
    }

    #[test]
    fn test_select_by_arn() {
        let clusters = vec![
            types::GlobalCluster::builder()
                .global_cluster_identifier("g1")
                .global_cluster_arn("arn:aws:rds::123456789012:global-cluster:g1")
                .status("available")
                .set_global_cluster_members(Some(Vec::new()))
                .build(),
        ];

        let cluster =
            select_global_cluster(Some(clusters), "arn:aws:rds::123456789012:global-cluster:g1")
                .unwrap()
                .unwrap();

        assert_eq!(cluster.identifier, "g1");
        assert!(cluster.members.is_empty());
    }

    #[test]
    fn test_unknown_identifier_is_none() {
        let clusters = vec![
            types::GlobalCluster::builder()
                .global_cluster_identifier("other")
                .status("available")
                .build(),
        ];

        assert!(select_global_cluster(Some(clusters), "g1").unwrap().is_none());
    }

    #[test]
    fn test_empty_response_is_malformed() {
        assert!(matches!(
            select_global_cluster(None, "g1"),
            Err(Error::MissingDetails("global_clusters"))
        ));
        assert!(matches!(
            select_global_cluster(Some(Vec::new()), "g1"),
            Err(Error::MissingDetails("global_clusters"))
        ));
    }

    #[test]
    fn test_missing_member_fields_are_malformed() {
        let missing_members = vec![
            types::GlobalCluster::builder()
                .global_cluster_identifier("g1")
                .status("available")
                .build(),
        ];
        assert!(matches!(
            select_global_cluster(Some(missing_members), "g1"),
            Err(Error::MissingDetails("global_cluster_members"))
        ));

        let missing_writer_flag = vec![
            types::GlobalCluster::builder()
                .global_cluster_identifier("g1")
                .status("available")
                .global_cluster_members(
                    types::GlobalClusterMember::builder()
                        .db_cluster_arn(DB1)
                        .build(),
                )
                .build(),
        ];
        assert!(matches!(
            select_global_cluster(Some(missing_writer_flag), "g1"),
            Err(Error::MissingDetails("is_writer"))
        ));
    }

    #[test]
    fn test_first_db_cluster() {
        let clusters = vec![
            types::DbCluster::builder()
                .db_cluster_identifier("db1")
                .status("backing-up")
                .build(),
        ];

        let cluster = first_db_cluster(Some(clusters), DB1).unwrap();
        assert_eq!(cluster.identifier, "db1");
        assert_eq!(cluster.status, ClusterStatus::Other("backing-up".to_string()));

        assert!(matches!(
            first_db_cluster(Some(Vec::new()), DB1),
            Err(Error::MissingDetails("db_clusters"))
        ));
    }
}
