//! Secret retrieval through the dynamic client

use k8s_openapi::api::core::v1::Secret;
use kube::core::{ApiResource, DynamicObject, TypeMeta};
use kube::Api;
use tracing::{debug, instrument, warn};

use crate::clients::ClusterClientProvider;
use crate::{Error, Result};

/// Options for a single get request (optionally pins a resourceVersion)
pub type GetOptions = kube::api::GetParams;

/// API group of core resources
pub const SECRET_GROUP: &str = "";
/// API version of Secrets
pub const SECRET_VERSION: &str = "v1";
/// Plural resource name of Secrets
pub const SECRET_RESOURCE: &str = "secrets";
/// Kind of Secrets
pub const SECRET_KIND: &str = "Secret";

/// Dynamic resource description for Secrets (`""`, `v1`, `secrets`)
pub fn secret_api_resource() -> ApiResource {
    ApiResource {
        group: SECRET_GROUP.to_string(),
        version: SECRET_VERSION.to_string(),
        api_version: SECRET_VERSION.to_string(),
        kind: SECRET_KIND.to_string(),
        plural: SECRET_RESOURCE.to_string(),
    }
}

/// Fetch a secret by name from a namespace on a specific cluster
///
/// Client acquisition, fetch and conversion errors are returned as-is.
/// Nothing is retried.
#[instrument(skip(provider, opts))]
pub async fn get_secret_by_name<P>(
    provider: &P,
    cluster_id: &str,
    namespace: &str,
    name: &str,
    opts: &GetOptions,
) -> Result<Secret>
where
    P: ClusterClientProvider,
{
    let client = provider.downstream_client(cluster_id).await?;

    let secrets: Api<DynamicObject> =
        Api::namespaced_with(client, namespace, &secret_api_resource());

    let object = secrets.get_with(name, opts).await.map_err(|e| {
        warn!("Failed to get secret {}/{}: {}", namespace, name, e);
        e
    })?;
    debug!("Fetched secret {}/{}", namespace, name);

    secret_from_dynamic(object)
}

/// Convert an untyped object into a typed Secret
///
/// Objects carrying a different apiVersion or kind are rejected. Objects with
/// no type information are assumed to be Secrets.
pub fn secret_from_dynamic(mut object: DynamicObject) -> Result<Secret> {
    // A partial type meta (only one of apiVersion/kind) is left in `data`.
    let types = match object.types.take() {
        Some(types) => types,
        None => TypeMeta {
            api_version: take_type_field(&mut object.data, "apiVersion", SECRET_VERSION),
            kind: take_type_field(&mut object.data, "kind", SECRET_KIND),
        },
    };
    if types.api_version != SECRET_VERSION || types.kind != SECRET_KIND {
        return Err(Error::UnexpectedKind {
            api_version: types.api_version,
            kind: types.kind,
        });
    }
    object.types = Some(types);

    let value = serde_json::to_value(&object)?;
    let secret: Secret = serde_json::from_value(value)?;
    debug!(
        "Converted secret {} with {} data keys",
        secret.metadata.name.as_deref().unwrap_or_default(),
        secret.data.as_ref().map_or(0, |d| d.len())
    );
    Ok(secret)
}

/// Remove a type meta field from the untyped body, falling back to `default`
fn take_type_field(data: &mut serde_json::Value, field: &str, default: &str) -> String {
    match data.as_object_mut().and_then(|body| body.remove(field)) {
        Some(serde_json::Value::String(value)) => value,
        Some(other) => other.to_string(),
        None => default.to_string(),
    }
}

/// Read a data key of a fetched secret as UTF-8
pub fn get_secret_key(secret: &Secret, key: &str) -> Result<String> {
    let secret_name = secret.metadata.name.as_deref().unwrap_or("<unnamed>");

    let bytes = match &secret.data {
        Some(data) => data.get(key).ok_or_else(|| {
            Error::SecretError(format!("Secret {} has no key '{}'", secret_name, key))
        })?,
        None => {
            return Err(Error::SecretError(format!(
                "Secret {} has no data",
                secret_name
            )))
        }
    };

    std::str::from_utf8(&bytes.0)
        .map(str::to_string)
        .map_err(|e| {
            Error::SecretError(format!(
                "Key '{}' of secret {} is not valid UTF-8: {}",
                key, secret_name, e
            ))
        })
}
