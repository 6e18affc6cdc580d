//! Drives failover, failback and status polling for a globally replicated
//! database cluster.
//!
//! Each invocation validates that the target is a member of the named global
//! cluster, issues at most one control plane action, and reports a tri-state
//! result: succeeded, not yet converged, or failed. Polling until convergence
//! is left to the caller.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod arn;
mod error;
mod evaluator;
mod handler;
mod outcome;
mod request;
mod response;

pub use arn::ClusterArn;
pub use error::{Error, Result};
pub use evaluator::Evaluator;
pub use handler::FailoverHandler;
pub use outcome::{ActionResult, Membership, Output};
pub use request::{Action, ActionRequest};
pub use response::{
    CLIENT_UNAVAILABLE, FAILBACK_COMPLETED, FAILOVER_COMPLETED, INVALID_REQUEST,
    NO_ACTION_MATCHED, POLLING_COMPLETED, Response, ResponseBody, VALIDATION_EXCEPTION,
    VALIDATION_FAILED,
};
