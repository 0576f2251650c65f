use crate::{client::KubeCluster, cluster::ClusterClient};
use anyhow::Result;
use std::sync::Arc;

/// Builds a cluster client for a single request.
///
/// The request's `Authorization` header is handed to the factory so that an
/// implementation can act on behalf of the caller.
pub trait ClientFactory: Send + Sync + 'static {
    fn build_client(&self, authorization: Option<&str>) -> Result<ClusterClient>;
}

/// Hands each request a handle to the process's cluster client. Handles
/// share one connection pool.
#[derive(Clone)]
pub struct KubeClientFactory {
    client: kube::Client,
}

impl KubeClientFactory {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }
}

impl ClientFactory for KubeClientFactory {
    fn build_client(&self, _authorization: Option<&str>) -> Result<ClusterClient> {
        // TODO: impersonate the caller once bearer tokens can be mapped onto
        // cluster identities; until then every request acts as the shim.
        let cluster = KubeCluster::new(self.client.clone());
        Ok(ClusterClient::new(Arc::new(cluster)))
    }
}
