//! Helpers shared by the repositories for reading object metadata and for
//! translating cluster failures.

use crate::cluster::{ClusterClient, ClusterError, Object, Selector};
use cf_api_shim_core::{Error, Metadata, ResourceType, Result};
use cf_api_shim_k8s_api::{ObjectMeta, Time};
use std::collections::BTreeMap;

/// Label and annotation keys under this domain belong to the API itself and
/// are not reported back as user metadata.
const RESERVED_DOMAIN: &str = "cloudfoundry.org";

/// Finds the single object named `guid` across all namespaces.
pub(crate) async fn find_by_guid<K: Object>(
    client: &ClusterClient,
    resource: ResourceType,
    guid: &str,
) -> Result<K> {
    let objects = client
        .list::<K>(None, &Selector::default())
        .await
        .map_err(|error| to_error(error, resource))?;
    single(
        objects
            .into_iter()
            .filter(|o| o.meta().name.as_deref() == Some(guid)),
        resource,
    )
}

/// Returns the only item, failing if there are none or several.
pub(crate) fn single<T>(items: impl IntoIterator<Item = T>, resource: ResourceType) -> Result<T> {
    let mut items = items.into_iter();
    let item = items.next().ok_or(Error::NotFound(resource))?;
    if items.next().is_some() {
        return Err(Error::DuplicateExists(resource));
    }
    Ok(item)
}

pub(crate) fn to_error(error: ClusterError, resource: ResourceType) -> Error {
    match error {
        ClusterError::NotFound => Error::NotFound(resource),
        ClusterError::Unauthorized(_) => Error::PermissionDeniedOrNotFound(resource),
        ClusterError::Denied(denial) if denial.is_duplicate() => Error::UniquenessViolation {
            resource,
            message: denial.message,
        },
        ClusterError::Denied(denial) => Error::ValidationFailure(denial.message),
        ClusterError::AlreadyExists => Error::UniquenessViolation {
            resource,
            message: format!("{resource} already exists"),
        },
        error @ (ClusterError::Decode(_) | ClusterError::Other(_)) => {
            Error::Unexpected(anyhow::Error::new(error))
        }
    }
}

pub(crate) fn guid(meta: &ObjectMeta) -> String {
    meta.name.clone().unwrap_or_default()
}

pub(crate) fn namespace(meta: &ObjectMeta) -> String {
    meta.namespace.clone().unwrap_or_default()
}

pub(crate) fn created_at(meta: &ObjectMeta) -> String {
    meta.creation_timestamp
        .as_ref()
        .map(format_time)
        .unwrap_or_default()
}

/// The latest managed-fields write time, falling back to the creation time
/// for objects that have never been updated.
pub(crate) fn updated_at(meta: &ObjectMeta) -> String {
    meta.managed_fields
        .iter()
        .flatten()
        .filter_map(|entry| entry.time.as_ref())
        .map(format_time)
        .max()
        .unwrap_or_else(|| created_at(meta))
}

/// RFC3339 timestamps with second precision sort lexically, so strings are
/// compared directly.
fn format_time(time: &Time) -> String {
    match serde_json::to_value(time) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

pub(crate) fn user_metadata(meta: &ObjectMeta) -> Metadata {
    Metadata {
        labels: visible(meta.labels.as_ref()),
        annotations: visible(meta.annotations.as_ref()),
    }
}

/// Drops reserved keys from user-supplied labels or annotations before they
/// are written.
pub(crate) fn without_reserved(entries: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    visible(Some(entries))
}

fn visible(entries: Option<&BTreeMap<String, String>>) -> BTreeMap<String, String> {
    entries
        .into_iter()
        .flatten()
        .filter(|(k, _)| !is_reserved(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn is_reserved(key: &str) -> bool {
    match key.split_once('/') {
        Some((prefix, _)) => prefix == RESERVED_DOMAIN || prefix.ends_with(".cloudfoundry.org"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_api_shim_k8s_api::labels;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ManagedFieldsEntry;
    use maplit::btreemap;

    fn time(s: &str) -> Time {
        serde_json::from_value(serde_json::Value::String(s.to_string())).unwrap()
    }

    #[test]
    fn updated_at_falls_back_to_created_at() {
        let meta = ObjectMeta {
            creation_timestamp: Some(time("2022-01-01T10:00:00Z")),
            ..Default::default()
        };
        assert_eq!(created_at(&meta), "2022-01-01T10:00:00Z");
        assert_eq!(updated_at(&meta), "2022-01-01T10:00:00Z");
    }

    #[test]
    fn updated_at_is_latest_write() {
        let entry = |t: &str| ManagedFieldsEntry {
            time: Some(time(t)),
            ..Default::default()
        };
        let meta = ObjectMeta {
            creation_timestamp: Some(time("2022-01-01T10:00:00Z")),
            managed_fields: Some(vec![
                entry("2022-01-01T12:00:00Z"),
                entry("2022-01-01T11:00:00Z"),
            ]),
            ..Default::default()
        };
        assert_eq!(updated_at(&meta), "2022-01-01T12:00:00Z");
    }

    #[test]
    fn reserved_labels_are_hidden() {
        let meta = ObjectMeta {
            labels: Some(btreemap! {
                labels::APP_GUID.to_string() => "app-guid".to_string(),
                labels::ORG_NAME.to_string() => "org".to_string(),
                "team".to_string() => "a".to_string(),
                "example.com/tier".to_string() => "gold".to_string(),
            }),
            ..Default::default()
        };
        let md = user_metadata(&meta);
        assert_eq!(
            md.labels,
            btreemap! {
                "team".to_string() => "a".to_string(),
                "example.com/tier".to_string() => "gold".to_string(),
            }
        );
        assert!(md.annotations.is_empty());
    }

    #[test]
    fn single_detects_duplicates() {
        assert_eq!(single(vec![1], ResourceType::App).unwrap(), 1);
        assert!(matches!(
            single(Vec::<i32>::new(), ResourceType::App),
            Err(Error::NotFound(ResourceType::App))
        ));
        assert!(matches!(
            single(vec![1, 2], ResourceType::App),
            Err(Error::DuplicateExists(ResourceType::App))
        ));
    }
}
