//! Implementation of the global cluster client using the Amazon RDS API.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::result_large_err)]

mod convert;
mod error;

pub use error::{Error, Result};

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_rds::Client;
use failover_cluster::{ClientFactory, DbCluster, GlobalCluster, GlobalClusterClient};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Options for the RDS client.
#[derive(Clone, Debug)]
pub struct RdsClientOptions {
    /// Overrides the RDS endpoint, e.g. for a local emulator.
    pub endpoint_url: Option<String>,

    /// The region whose control plane to talk to.
    pub region: String,
}

/// Global cluster client backed by the RDS control plane of one region.
#[derive(Clone, Debug)]
pub struct RdsClusterClient {
    client: Client,
}

impl RdsClusterClient {
    /// Creates a new instance of `RdsClusterClient`.
    pub async fn new(
        RdsClientOptions {
            endpoint_url,
            region,
        }: RdsClientOptions,
    ) -> Self {
        let mut loader = aws_config::from_env().region(Region::new(region));

        if let Some(endpoint_url) = endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let config = loader.load().await;

        Self {
            client: Client::new(&config),
        }
    }
}

#[async_trait]
impl GlobalClusterClient for RdsClusterClient {
    type Error = Error;

    async fn describe_global_cluster(
        &self,
        global_cluster_identifier: &str,
    ) -> Result<Option<GlobalCluster>> {
        let resp = self
            .client
            .describe_global_clusters()
            .global_cluster_identifier(global_cluster_identifier)
            .send()
            .await;

        match resp {
            Ok(resp) => {
                debug!("describe global clusters response: {:?}", resp);
                convert::select_global_cluster(resp.global_clusters, global_cluster_identifier)
            }
            Err(e) => {
                let e = e.into_service_error();
                if e.is_global_cluster_not_found_fault() {
                    debug!("global cluster {} not found", global_cluster_identifier);
                    Ok(None)
                } else {
                    Err(Error::Rds(e.into()))
                }
            }
        }
    }

    async fn describe_db_cluster(&self, db_cluster_identifier: &str) -> Result<DbCluster> {
        let resp = self
            .client
            .describe_db_clusters()
            .db_cluster_identifier(db_cluster_identifier)
            .send()
            .await
            .map_err(|e| Error::Rds(e.into()))?;

        debug!("describe db clusters response: {:?}", resp);

        convert::first_db_cluster(resp.db_clusters, db_cluster_identifier)
    }

    async fn failover_global_cluster(
        &self,
        global_cluster_identifier: &str,
        target_db_cluster_identifier: &str,
        allow_data_loss: bool,
    ) -> Result<()> {
        let resp = self
            .client
            .failover_global_cluster()
            .global_cluster_identifier(global_cluster_identifier)
            .target_db_cluster_identifier(target_db_cluster_identifier)
            .allow_data_loss(allow_data_loss)
            .send()
            .await
            .map_err(|e| Error::Rds(e.into()))?;

        info!("failover global cluster response: {:?}", resp);

        Ok(())
    }

    async fn switchover_global_cluster(
        &self,
        global_cluster_identifier: &str,
        target_db_cluster_identifier: &str,
    ) -> Result<()> {
        let resp = self
            .client
            .switchover_global_cluster()
            .global_cluster_identifier(global_cluster_identifier)
            .target_db_cluster_identifier(target_db_cluster_identifier)
            .send()
            .await
            .map_err(|e| Error::Rds(e.into()))?;

        info!("switchover global cluster response: {:?}", resp);

        Ok(())
    }
}

/// Hands out one `RdsClusterClient` per region, reusing clients across
/// invocations of a warm process.
#[derive(Clone, Debug, Default)]
pub struct RdsClientFactory {
    clients: Arc<RwLock<HashMap<String, RdsClusterClient>>>,
    endpoint_url: Option<String>,
}

impl RdsClientFactory {
    /// Creates a factory. `endpoint_url` overrides the RDS endpoint for every region.
    #[must_use]
    pub fn new(endpoint_url: Option<String>) -> Self {
        Self {
            clients: Arc::new(RwLock::new(HashMap::new())),
            endpoint_url,
        }
    }
}

#[async_trait]
impl ClientFactory for RdsClientFactory {
    type Client = RdsClusterClient;
    type Error = Infallible;

    async fn client_for_region(
        &self,
        region: &str,
    ) -> std::result::Result<RdsClusterClient, Infallible> {
        if let Some(client) = self.clients.read().await.get(region) {
            return Ok(client.clone());
        }

        let mut clients = self.clients.write().await;

        // Re-check under the write lock.
        if let Some(client) = clients.get(region) {
            return Ok(client.clone());
        }

        info!("creating rds client for region {}", region);

        let client = RdsClusterClient::new(RdsClientOptions {
            endpoint_url: self.endpoint_url.clone(),
            region: region.to_string(),
        })
        .await;

        clients.insert(region.to_string(), client.clone());

        Ok(client)
    }
}
