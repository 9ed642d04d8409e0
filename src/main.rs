//! Cluster secrets debugging tool
//!
//! Fetches a Secret from a downstream cluster using the test configuration
//! named by `CATTLE_TEST_CONFIG`, or prints an empty Secret template.
//!
//! Usage:
//!   cluster-secrets get <cluster-id> <namespace> <name> [resource-version]
//!   cluster-secrets template <name> <namespace> [type]

use anyhow::{bail, Context as _};
use k8s_openapi::api::core::v1::Secret;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cluster_secrets::{
    config::TestConfig,
    secrets::{get_secret_by_name, new_secret_template, GetOptions, SecretType},
};

const USAGE: &str = "usage:
  cluster-secrets get <cluster-id> <namespace> <name> [resource-version]
  cluster-secrets template <name> <namespace> [type]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["get", cluster_id, namespace, name, rest @ ..] if rest.len() <= 1 => {
            let config = TestConfig::from_env().context("Failed to load test config")?;
            let provider = config.rancher.proxy();

            let opts = match rest.first() {
                Some(rv) => GetOptions::at(rv),
                None => GetOptions::default(),
            };

            info!("Fetching secret {}/{} from cluster {}", namespace, name, cluster_id);
            let secret = get_secret_by_name(&provider, cluster_id, namespace, name, &opts)
                .await
                .with_context(|| format!("Failed to get secret {}/{}", namespace, name))?;

            print!("{}", render_redacted(&secret)?);
        }
        ["template", name, namespace, rest @ ..] if rest.len() <= 1 => {
            let secret_type = rest.first().map(|t| SecretType::from(*t)).unwrap_or_default();
            let secret = new_secret_template(name, secret_type, namespace, None, None, None);
            print!("{}", serde_yaml::to_string(&secret)?);
        }
        _ => bail!(USAGE),
    }

    Ok(())
}

/// Render a secret as YAML with data values replaced by their sizes
fn render_redacted(secret: &Secret) -> anyhow::Result<String> {
    let sizes: serde_json::Map<String, serde_json::Value> = secret
        .data
        .iter()
        .flatten()
        .map(|(key, value)| (key.clone(), format!("<{} bytes>", value.0.len()).into()))
        .collect();

    let mut value = serde_json::to_value(Secret {
        data: None,
        string_data: None,
        ..secret.clone()
    })?;
    if let Some(object) = value.as_object_mut() {
        object.insert("data".to_string(), serde_json::Value::Object(sizes));
    }

    Ok(serde_yaml::to_string(&value)?)
}

/// Initialize tracing subscriber
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,cluster_secrets=debug,kube=warn,hyper=warn")
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
        .init();
}
