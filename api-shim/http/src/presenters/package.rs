use super::{metadata, to_one, Link, MetadataView, Relationship, UrlBuilder};
use cf_api_shim_core::PackageRecord;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Serialize)]
pub struct PackageResponse {
    pub guid: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub data: BTreeMap<String, String>,
    pub state: &'static str,
    pub created_at: String,
    pub updated_at: String,
    pub relationships: PackageRelationships,
    pub metadata: MetadataView,
    pub links: PackageLinks,
}

#[derive(Clone, Debug, Serialize)]
pub struct PackageRelationships {
    pub app: Relationship,
}

#[derive(Clone, Debug, Serialize)]
pub struct PackageLinks {
    #[serde(rename = "self")]
    pub self_: Link,
    pub upload: Link,
    pub download: Link,
    pub app: Link,
}

pub fn package(record: &PackageRecord, urls: &UrlBuilder) -> PackageResponse {
    let package = urls.path(["v3", "packages", record.guid.as_str()]);
    PackageResponse {
        guid: record.guid.clone(),
        type_: record.type_.clone(),
        data: BTreeMap::new(),
        state: record.state.as_str(),
        created_at: record.created_at.clone(),
        updated_at: record.updated_at.clone(),
        relationships: PackageRelationships {
            app: to_one(&record.app_guid),
        },
        metadata: metadata(&record.metadata),
        links: PackageLinks {
            self_: Link::get(package.build()),
            upload: package.link(["upload"]).with_method("POST"),
            download: package.link(["download"]).with_method("GET"),
            app: urls.link(["v3", "apps", record.app_guid.as_str()]),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_api_shim_core::{Metadata, PackageState};
    use serde_json::json;

    fn record(image: &str) -> PackageRecord {
        PackageRecord {
            guid: "package-1".to_string(),
            type_: "bits".to_string(),
            app_guid: "app-1".to_string(),
            space_guid: "space-1".to_string(),
            state: PackageState::from_source_image(image),
            source_image_ref: image.to_string(),
            registry_secret_name: "registry".to_string(),
            metadata: Metadata::default(),
            created_at: "2024-01-02T03:04:05Z".to_string(),
            updated_at: "2024-01-02T03:04:05Z".to_string(),
        }
    }

    #[test]
    fn renders_package() {
        let urls = UrlBuilder::new("https://api.example.com");
        let view = serde_json::to_value(package(&record(""), &urls)).unwrap();
        assert_eq!(view["state"], "AWAITING_UPLOAD");
        assert_eq!(view["data"], json!({}));
        assert_eq!(view["relationships"], json!({"app": {"data": {"guid": "app-1"}}}));
        assert_eq!(
            view["links"]["upload"],
            json!({
                "href": "https://api.example.com/v3/packages/package-1/upload",
                "method": "POST",
            })
        );

        let view = serde_json::to_value(package(&record("registry/package-1"), &urls)).unwrap();
        assert_eq!(view["state"], "PROCESSING_UPLOAD");
    }
}
