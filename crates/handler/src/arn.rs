//! Parsing of cluster ARNs (`arn:partition:service:region:account:resource`).

use std::fmt::{self, Display};

use crate::{Error, Result};

const SEPARATOR: char = ':';
const REGION_SEGMENT: usize = 3;

/// The parts of a cluster ARN the handler cares about.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClusterArn<'a> {
    /// The partition, e.g. `aws`.
    pub partition: &'a str,

    /// The service namespace, e.g. `rds`.
    pub service: &'a str,

    /// The region whose control plane owns the cluster.
    pub region: &'a str,

    /// Everything after the region (account and resource).
    pub resource: &'a str,
}

impl<'a> ClusterArn<'a> {
    /// Splits `arn` on `:` and takes the region from the fourth segment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArn`] when there are fewer than four segments
    /// or the region segment is empty.
    pub fn parse(arn: &'a str) -> Result<Self> {
        let mut segments = arn.splitn(REGION_SEGMENT + 2, SEPARATOR);

        let (Some(_prefix), Some(partition), Some(service), Some(region)) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(Error::InvalidArn(
                arn.to_string(),
                "expected at least 4 colon-delimited segments",
            ));
        };

        if region.is_empty() {
            return Err(Error::InvalidArn(arn.to_string(), "region segment is empty"));
        }

        Ok(Self {
            partition,
            service,
            region,
            resource: segments.next().unwrap_or_default(),
        })
    }
}

impl Display for ClusterArn<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.resource
        )
    }
}
