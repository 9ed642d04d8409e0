//! Test configuration loaded from YAML
//!
//! The file location is taken from the `CATTLE_TEST_CONFIG` environment
//! variable:
//!
//! ```yaml
//! rancher:
//!   host: rancher.example.com
//!   adminToken: token-abc:xyz
//!   insecure: true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clients::RancherProxy;
use crate::{Error, Result};

/// Environment variable holding the config file path
pub const CONFIG_ENV_VAR: &str = "CATTLE_TEST_CONFIG";

/// Top-level test configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConfig {
    /// Rancher server connection
    pub rancher: RancherConfig,
}

/// Rancher server connection settings
#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RancherConfig {
    /// Server host, with or without scheme
    pub host: String,

    /// Bearer token used against the cluster proxy
    pub admin_token: String,

    /// Skip TLS verification
    #[serde(default)]
    pub insecure: bool,
}

impl std::fmt::Debug for RancherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RancherConfig")
            .field("host", &self.host)
            .field("admin_token", &"<redacted>")
            .field("insecure", &self.insecure)
            .finish()
    }
}

impl RancherConfig {
    /// Cluster client provider for this server
    pub fn proxy(&self) -> RancherProxy {
        RancherProxy::new(&self.host, &self.admin_token).insecure(self.insecure)
    }
}

impl TestConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: TestConfig = serde_yaml::from_str(yaml)
            .map_err(|e| Error::ConfigError(format!("Invalid test config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Load from the file named by `CATTLE_TEST_CONFIG`
    pub fn from_env() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV_VAR)
            .map_err(|_| Error::ConfigError(format!("{} is not set", CONFIG_ENV_VAR)))?;
        Self::from_path(path)
    }

    fn validate(&self) -> Result<()> {
        if self.rancher.host.trim().is_empty() {
            return Err(Error::ConfigError("rancher.host must not be empty".to_string()));
        }
        if self.rancher.admin_token.is_empty() {
            return Err(Error::ConfigError(
                "rancher.adminToken must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
