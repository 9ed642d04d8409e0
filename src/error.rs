//! Error types for cluster secret helpers

/// Result type for the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the crate
///
/// Errors from the Kubernetes client and from conversion are carried
/// unchanged so callers can match on the underlying cause.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Kubernetes API error
    #[error(transparent)]
    Kube(#[from] kube::Error),

    /// Failed to build a client for a cluster
    #[error("Cluster client error for {cluster_id:?}: {source}")]
    ClusterClient {
        cluster_id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No client registered for the cluster
    #[error("Unknown cluster: {0}")]
    UnknownCluster(String),

    /// Untyped object could not be converted to a typed resource
    #[error(transparent)]
    Conversion(#[from] serde_json::Error),

    /// Fetched object is not the expected kind
    #[error("Unexpected object {api_version}/{kind}, expected v1/Secret")]
    UnexpectedKind { api_version: String, kind: String },

    /// Secret error
    #[error("Secret error: {0}")]
    SecretError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
