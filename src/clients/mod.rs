//! Per-cluster Kubernetes client providers

mod rancher;

pub use rancher::RancherProxy;

use std::collections::BTreeMap;
use std::future::Future;

use kube::Client;

use crate::{Error, Result};

/// Hands out a Kubernetes client for a downstream cluster
pub trait ClusterClientProvider {
    /// Get a client for the cluster identified by `cluster_id`
    fn downstream_client(&self, cluster_id: &str)
        -> impl Future<Output = Result<Client>> + Send;
}

/// Fixed set of pre-built clients keyed by cluster id
#[derive(Clone, Default)]
pub struct StaticClusters {
    clients: BTreeMap<String, Client>,
}

impl StaticClusters {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client under `cluster_id`, replacing any previous one
    pub fn with_cluster(mut self, cluster_id: impl Into<String>, client: Client) -> Self {
        self.clients.insert(cluster_id.into(), client);
        self
    }
}

impl ClusterClientProvider for StaticClusters {
    async fn downstream_client(&self, cluster_id: &str) -> Result<Client> {
        self.clients
            .get(cluster_id)
            .cloned()
            .ok_or_else(|| Error::UnknownCluster(cluster_id.to_string()))
    }
}
