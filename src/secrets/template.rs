//! Secret template builder

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;

/// Kubernetes secret type
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SecretType {
    #[default]
    Opaque,
    ServiceAccountToken,
    Dockercfg,
    DockerConfigJson,
    BasicAuth,
    SshAuth,
    Tls,
    BootstrapToken,
    /// Any type not listed above
    Other(String),
}

impl SecretType {
    /// Wire value of the type
    pub fn as_str(&self) -> &str {
        match self {
            SecretType::Opaque => "Opaque",
            SecretType::ServiceAccountToken => "kubernetes.io/service-account-token",
            SecretType::Dockercfg => "kubernetes.io/dockercfg",
            SecretType::DockerConfigJson => "kubernetes.io/dockerconfigjson",
            SecretType::BasicAuth => "kubernetes.io/basic-auth",
            SecretType::SshAuth => "kubernetes.io/ssh-auth",
            SecretType::Tls => "kubernetes.io/tls",
            SecretType::BootstrapToken => "bootstrap.kubernetes.io/token",
            SecretType::Other(other) => other,
        }
    }
}

impl fmt::Display for SecretType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for SecretType {
    fn from(value: &str) -> Self {
        match value {
            "Opaque" => SecretType::Opaque,
            "kubernetes.io/service-account-token" => SecretType::ServiceAccountToken,
            "kubernetes.io/dockercfg" => SecretType::Dockercfg,
            "kubernetes.io/dockerconfigjson" => SecretType::DockerConfigJson,
            "kubernetes.io/basic-auth" => SecretType::BasicAuth,
            "kubernetes.io/ssh-auth" => SecretType::SshAuth,
            "kubernetes.io/tls" => SecretType::Tls,
            "bootstrap.kubernetes.io/token" => SecretType::BootstrapToken,
            other => SecretType::Other(other.to_string()),
        }
    }
}

impl FromStr for SecretType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SecretType::from(s))
    }
}

/// Build a Secret template
///
/// Missing annotation, label and data maps are replaced with empty ones, so
/// the returned Secret always carries all three.
pub fn new_secret_template(
    name: &str,
    secret_type: SecretType,
    namespace: &str,
    annotations: Option<BTreeMap<String, String>>,
    labels: Option<BTreeMap<String, String>>,
    data: Option<BTreeMap<String, ByteString>>,
) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            annotations: Some(annotations.unwrap_or_default()),
            labels: Some(labels.unwrap_or_default()),
            ..Default::default()
        },
        data: Some(data.unwrap_or_default()),
        type_: Some(secret_type.to_string()),
        ..Default::default()
    }
}
