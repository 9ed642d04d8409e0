//! Clients for downstream clusters reached through a Rancher server proxy

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use serde_json::json;
use tracing::debug;

use super::ClusterClientProvider;
use crate::{Error, Result};

/// Builds clients against `{host}/k8s/clusters/{cluster_id}`
#[derive(Clone)]
pub struct RancherProxy {
    host: String,
    token: String,
    insecure: bool,
}

impl std::fmt::Debug for RancherProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RancherProxy")
            .field("host", &self.host)
            .field("insecure", &self.insecure)
            .finish_non_exhaustive()
    }
}

impl RancherProxy {
    /// Create a proxy for `host` authenticated with a bearer `token`
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: normalize_host(&host.into()),
            token: token.into(),
            insecure: false,
        }
    }

    /// Skip TLS verification of the Rancher server certificate
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Base URL of the server
    pub fn host(&self) -> &str {
        &self.host
    }

    /// API server URL for a downstream cluster
    pub fn cluster_url(&self, cluster_id: &str) -> String {
        format!("{}/k8s/clusters/{}", self.host, cluster_id)
    }

    fn kubeconfig(&self, cluster_id: &str) -> Result<Kubeconfig> {
        let kubeconfig = json!({
            "apiVersion": "v1",
            "kind": "Config",
            "clusters": [{
                "name": cluster_id,
                "cluster": {
                    "server": self.cluster_url(cluster_id),
                    "insecure-skip-tls-verify": self.insecure,
                },
            }],
            "users": [{
                "name": "rancher",
                "user": { "token": self.token },
            }],
            "contexts": [{
                "name": cluster_id,
                "context": { "cluster": cluster_id, "user": "rancher" },
            }],
            "current-context": cluster_id,
        });

        serde_json::from_value(kubeconfig).map_err(|e| Error::ClusterClient {
            cluster_id: cluster_id.to_string(),
            source: e.into(),
        })
    }
}

impl ClusterClientProvider for RancherProxy {
    async fn downstream_client(&self, cluster_id: &str) -> Result<Client> {
        if cluster_id.is_empty() {
            return Err(Error::ClusterClient {
                cluster_id: String::new(),
                source: "cluster id is empty".into(),
            });
        }

        debug!("Building client for cluster {} via {}", cluster_id, self.host);

        let kubeconfig = self.kubeconfig(cluster_id)?;
        let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .map_err(|e| Error::ClusterClient {
                cluster_id: cluster_id.to_string(),
                source: e.into(),
            })?;

        Ok(Client::try_from(config)?)
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}
