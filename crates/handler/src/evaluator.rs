//! Membership validation and the failover, failback and status actions.
//!
//! Every remote error is caught here and folded into [`Membership`] or
//! [`ActionResult`]; nothing in this module returns `Err`.

use failover_cluster::{GlobalClusterClient, GlobalClusterClientError};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::outcome::{ActionResult, Membership};
use crate::request::ActionRequest;

#[derive(Debug, Error)]
enum PollError<E> {
    #[error("global cluster {0} not found")]
    GlobalClusterNotFound(String),

    #[error("{target} is not a member of global cluster {global_cluster}")]
    NotAMember {
        global_cluster: String,
        target: String,
    },

    #[error("{0}")]
    Remote(E),
}

/// Evaluates requests against one region's control plane.
#[derive(Clone, Debug)]
pub struct Evaluator<C>
where
    C: GlobalClusterClient,
{
    client: C,
}

impl<C> Evaluator<C>
where
    C: GlobalClusterClient,
{
    /// Creates an evaluator issuing calls through `client`.
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    /// Checks that the target is a member of the named global cluster.
    pub async fn validate(&self, request: &ActionRequest) -> Membership {
        info!("validation started");

        let membership = match self
            .client
            .describe_global_cluster(&request.global_cluster_identifier)
            .await
        {
            Ok(Some(cluster)) => {
                info!(
                    "global cluster {} has {} members",
                    cluster.identifier,
                    cluster.members.len()
                );

                if cluster.member(&request.target_db_cluster_identifier).is_some() {
                    info!("target database cluster identifier matched");
                    Membership::Member
                } else {
                    warn!(
                        "{} is not a member of global cluster {}",
                        request.target_db_cluster_identifier, request.global_cluster_identifier
                    );
                    Membership::NotMember
                }
            }
            Ok(None) => {
                warn!(
                    "global cluster {} does not exist",
                    request.global_cluster_identifier
                );
                Membership::NotMember
            }
            Err(e) => {
                error!("unexpected {} error in validation: {}", e.kind(), e);
                Membership::Failed(e.to_string())
            }
        };

        info!("validation completed: {:?}", membership);

        membership
    }

    /// Requests a forced failover to the target, allowing data loss.
    pub async fn failover(&self, request: &ActionRequest) -> ActionResult {
        info!("failover started");

        let result = match self
            .client
            .failover_global_cluster(
                &request.global_cluster_identifier,
                &request.target_db_cluster_identifier,
                true,
            )
            .await
        {
            Ok(()) => ActionResult::Succeeded,
            Err(e) => {
                error!("unexpected {} error in failover: {}", e.kind(), e);
                ActionResult::Failed(e.to_string())
            }
        };

        info!("failover completed: {:?}", result);

        result
    }

    /// Requests a graceful switchover to the target.
    pub async fn failback(&self, request: &ActionRequest) -> ActionResult {
        info!("failback started");

        let result = match self
            .client
            .switchover_global_cluster(
                &request.global_cluster_identifier,
                &request.target_db_cluster_identifier,
            )
            .await
        {
            Ok(()) => ActionResult::Succeeded,
            Err(e) => {
                error!("unexpected {} error in failback: {}", e.kind(), e);
                ActionResult::Failed(e.to_string())
            }
        };

        info!("failback completed: {:?}", result);

        result
    }

    /// Reports whether the target is the writer and both the global cluster
    /// and the target cluster are available.
    pub async fn status(&self, request: &ActionRequest) -> ActionResult {
        info!("polling started");

        let result = match self.poll(request).await {
            Ok(result) => result,
            Err(e) => {
                error!("unexpected error in polling: {}", e);
                ActionResult::Failed(e.to_string())
            }
        };

        info!("polling completed: {:?}", result);

        result
    }

    async fn poll(&self, request: &ActionRequest) -> Result<ActionResult, PollError<C::Error>> {
        let global_cluster = &request.global_cluster_identifier;
        let target = &request.target_db_cluster_identifier;

        let cluster = self
            .client
            .describe_global_cluster(global_cluster)
            .await
            .map_err(PollError::Remote)?
            .ok_or_else(|| PollError::GlobalClusterNotFound(global_cluster.clone()))?;

        info!("global cluster status: {}", cluster.status);

        let member = cluster
            .member(target)
            .ok_or_else(|| PollError::NotAMember {
                global_cluster: global_cluster.clone(),
                target: target.clone(),
            })?;

        if !member.is_writer {
            warn!("target database cluster is not writer yet");
            return Ok(ActionResult::NotYet);
        }

        info!(
            "target database cluster is the writer with {} readers",
            member.readers.len()
        );

        if !cluster.status.is_available() {
            warn!("global database cluster status is not available");
            return Ok(ActionResult::NotYet);
        }

        let db_cluster = self
            .client
            .describe_db_cluster(target)
            .await
            .map_err(PollError::Remote)?;

        info!("target database cluster status: {}", db_cluster.status);

        if db_cluster.status.is_available() {
            Ok(ActionResult::Succeeded)
        } else {
            warn!("target database cluster status is not available");
            Ok(ActionResult::NotYet)
        }
    }
}
