//! The top-level request handler.

use failover_cluster::ClientFactory;
use http::StatusCode;
use serde_json::Value;
use tracing::{Instrument, error, info, info_span, warn};

use crate::arn::ClusterArn;
use crate::evaluator::Evaluator;
use crate::outcome::Membership;
use crate::request::{Action, ActionRequest};
use crate::response::{
    CLIENT_UNAVAILABLE, FAILBACK_COMPLETED, FAILOVER_COMPLETED, INVALID_REQUEST,
    NO_ACTION_MATCHED, POLLING_COMPLETED, Response, VALIDATION_EXCEPTION, VALIDATION_FAILED,
};
use crate::{Error, Result};

/// Turns invocation events into control plane calls and normalized responses.
#[derive(Clone, Debug)]
pub struct FailoverHandler<F>
where
    F: ClientFactory,
{
    factory: F,
}

impl<F> FailoverHandler<F>
where
    F: ClientFactory,
{
    /// Creates a handler obtaining per-region clients from `factory`.
    pub const fn new(factory: F) -> Self {
        Self { factory }
    }

    /// Handles one invocation. Always produces a response.
    pub async fn handle(&self, event: Value) -> Response {
        info!("event received: {}", event);

        let request = match ActionRequest::from_event(event) {
            Ok(request) => request,
            Err(e) => {
                warn!("rejecting event: {}", e);
                return Response::failure(StatusCode::BAD_REQUEST, INVALID_REQUEST, e);
            }
        };

        let span = info_span!(
            "invocation",
            global_cluster = %request.global_cluster_identifier,
            target = %request.target_db_cluster_identifier,
            action = %request.action,
        );

        match self.handle_request(&request).instrument(span).await {
            Ok(response) => response,
            Err(e) if e.is_client_error() => {
                warn!("rejecting request: {}", e);
                Response::failure(StatusCode::BAD_REQUEST, INVALID_REQUEST, e)
            }
            Err(e) => {
                error!("invocation failed: {}", e);
                Response::failure(StatusCode::INTERNAL_SERVER_ERROR, CLIENT_UNAVAILABLE, e)
            }
        }
    }

    async fn handle_request(&self, request: &ActionRequest) -> Result<Response> {
        let arn = ClusterArn::parse(&request.target_db_cluster_identifier)?;

        info!("resolved region {} for {}", arn.region, arn);

        let client = self
            .factory
            .client_for_region(arn.region)
            .await
            .map_err(|e| Error::ClientUnavailable {
                region: arn.region.to_string(),
                reason: e.to_string(),
            })?;

        let evaluator = Evaluator::new(client);

        let response = match evaluator.validate(request).await {
            Membership::Failed(e) => Response::failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                VALIDATION_EXCEPTION,
                e,
            ),
            Membership::NotMember => {
                Response::message(StatusCode::INTERNAL_SERVER_ERROR, VALIDATION_FAILED)
            }
            Membership::Member => match &request.action {
                Action::Failover => {
                    Response::action(FAILOVER_COMPLETED, &evaluator.failover(request).await)
                }
                Action::Failback => {
                    Response::action(FAILBACK_COMPLETED, &evaluator.failback(request).await)
                }
                Action::Status => {
                    Response::action(POLLING_COMPLETED, &evaluator.status(request).await)
                }
                Action::Unrecognized(action) => {
                    warn!("no action matched for {}", action);
                    Response::message(StatusCode::OK, NO_ACTION_MATCHED)
                }
            },
        };

        info!("responding with status {}", response.status_code);

        Ok(response)
    }
}
