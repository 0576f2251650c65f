use super::{lifecycle, metadata, to_one, LifecycleView, Link, MetadataView, Relationship, UrlBuilder};
use cf_api_shim_core::{BuildRecord, DropletRecord};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Serialize)]
pub struct BuildResponse {
    pub guid: String,
    pub created_at: String,
    pub updated_at: String,
    pub created_by: BTreeMap<String, String>,
    pub state: &'static str,
    pub staging_memory_in_mb: i64,
    pub staging_disk_in_mb: i64,
    pub error: Option<String>,
    pub lifecycle: LifecycleView,
    pub package: Guid,
    pub droplet: Option<Guid>,
    pub relationships: BuildRelationships,
    pub metadata: MetadataView,
    pub links: BuildLinks,
}

#[derive(Clone, Debug, Serialize)]
pub struct Guid {
    pub guid: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct BuildRelationships {
    pub app: Relationship,
}

#[derive(Clone, Debug, Serialize)]
pub struct BuildLinks {
    #[serde(rename = "self")]
    pub self_: Link,
    pub app: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub droplet: Option<Link>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DropletResponse {
    pub guid: String,
    pub state: &'static str,
    pub error: Option<String>,
    pub lifecycle: DropletLifecycleView,
    pub execution_metadata: String,
    pub process_types: BTreeMap<String, String>,
    pub checksum: Option<String>,
    pub buildpacks: Vec<String>,
    pub stack: String,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub relationships: BuildRelationships,
    pub metadata: MetadataView,
    pub links: DropletLinks,
}

/// Droplets report their lifecycle type only.
#[derive(Clone, Debug, Serialize)]
pub struct DropletLifecycleView {
    #[serde(rename = "type")]
    pub type_: String,
    pub data: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DropletLinks {
    #[serde(rename = "self")]
    pub self_: Link,
    pub package: Link,
    pub app: Link,
    pub assign_current_droplet: Link,
}

/// The droplet is linked only once the build has staged.
pub fn build(record: &BuildRecord, urls: &UrlBuilder) -> BuildResponse {
    let droplet_guid = record.state.droplet_guid();
    BuildResponse {
        guid: record.guid.clone(),
        created_at: record.created_at.clone(),
        updated_at: record.updated_at.clone(),
        created_by: BTreeMap::new(),
        state: record.state.as_str(),
        staging_memory_in_mb: record.staging_memory_mb,
        staging_disk_in_mb: record.staging_disk_mb,
        error: record.state.error().map(str::to_string),
        lifecycle: lifecycle(&record.lifecycle),
        package: Guid {
            guid: record.package_guid.clone(),
        },
        droplet: droplet_guid.map(|guid| Guid {
            guid: guid.to_string(),
        }),
        relationships: BuildRelationships {
            app: to_one(&record.app_guid),
        },
        metadata: metadata(&record.metadata),
        links: BuildLinks {
            self_: urls.link(["v3", "builds", record.guid.as_str()]),
            app: urls.link(["v3", "apps", record.app_guid.as_str()]),
            droplet: droplet_guid.map(|guid| urls.link(["v3", "droplets", guid])),
        },
    }
}

pub fn droplet(record: &DropletRecord, urls: &UrlBuilder) -> DropletResponse {
    DropletResponse {
        guid: record.guid.clone(),
        state: "STAGED",
        error: None,
        lifecycle: DropletLifecycleView {
            type_: record.lifecycle.type_.clone(),
            data: BTreeMap::new(),
        },
        execution_metadata: String::new(),
        process_types: record.process_types.clone(),
        checksum: None,
        buildpacks: record.lifecycle.data.buildpacks.clone(),
        stack: record.stack.clone(),
        image: Some(&record.image)
            .filter(|image| !image.is_empty())
            .cloned(),
        created_at: record.created_at.clone(),
        updated_at: record.updated_at.clone(),
        relationships: BuildRelationships {
            app: to_one(&record.app_guid),
        },
        metadata: metadata(&record.metadata),
        links: DropletLinks {
            self_: urls.link(["v3", "droplets", record.guid.as_str()]),
            package: urls.link(["v3", "packages", record.package_guid.as_str()]),
            app: urls.link(["v3", "apps", record.app_guid.as_str()]),
            assign_current_droplet: urls
                .link([
                    "v3",
                    "apps",
                    record.app_guid.as_str(),
                    "relationships",
                    "current_droplet",
                ])
                .with_method("PATCH"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_api_shim_core::{BuildState, LifecycleConfig, Metadata};
    use maplit::btreemap;
    use serde_json::json;

    fn record(state: BuildState) -> BuildRecord {
        BuildRecord {
            guid: "build-1".to_string(),
            space_guid: "space-1".to_string(),
            state,
            staging_memory_mb: 1024,
            staging_disk_mb: 2048,
            lifecycle: LifecycleConfig::default().default_lifecycle(),
            package_guid: "package-1".to_string(),
            app_guid: "app-1".to_string(),
            metadata: Metadata::default(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn staging() {
        let urls = UrlBuilder::new("https://api.example.com");
        let view = serde_json::to_value(build(&record(BuildState::Staging), &urls)).unwrap();
        assert_eq!(view["state"], "STAGING");
        assert_eq!(view["droplet"], json!(null));
        assert_eq!(view["error"], json!(null));
        assert_eq!(view["created_by"], json!({}));
        assert_eq!(view["package"], json!({"guid": "package-1"}));
        assert_eq!(view["staging_disk_in_mb"], 2048);
        assert!(view["links"].get("droplet").is_none());
    }

    #[test]
    fn staged() {
        let urls = UrlBuilder::new("https://api.example.com");
        let state = BuildState::Staged {
            droplet_guid: "build-1".to_string(),
        };
        let view = serde_json::to_value(build(&record(state), &urls)).unwrap();
        assert_eq!(view["state"], "STAGED");
        assert_eq!(view["droplet"], json!({"guid": "build-1"}));
        assert_eq!(view["error"], json!(null));
        assert_eq!(
            view["links"]["droplet"],
            json!({"href": "https://api.example.com/v3/droplets/build-1"})
        );
    }

    #[test]
    fn failed() {
        let urls = UrlBuilder::new("https://api.example.com");
        let state = BuildState::Failed {
            error: "no buildpack detected".to_string(),
        };
        let view = serde_json::to_value(build(&record(state), &urls)).unwrap();
        assert_eq!(view["state"], "FAILED");
        assert_eq!(view["error"], "no buildpack detected");
        assert_eq!(view["droplet"], json!(null));
    }

    #[test]
    fn renders_droplet() {
        let urls = UrlBuilder::new("https://api.example.com");
        let record = DropletRecord {
            guid: "build-1".to_string(),
            stack: "cflinuxfs3".to_string(),
            lifecycle: LifecycleConfig::default().default_lifecycle(),
            process_types: btreemap! { "web".to_string() => "bundle exec rackup".to_string() },
            app_guid: "app-1".to_string(),
            package_guid: "package-1".to_string(),
            image: "registry.example.com/droplets/build-1".to_string(),
            ..Default::default()
        };
        let view = serde_json::to_value(droplet(&record, &urls)).unwrap();
        assert_eq!(view["state"], "STAGED");
        assert_eq!(view["image"], "registry.example.com/droplets/build-1");
        assert_eq!(view["lifecycle"], json!({"type": "buildpack", "data": {}}));
        assert_eq!(view["process_types"], json!({"web": "bundle exec rackup"}));
        assert_eq!(
            view["links"]["assign_current_droplet"],
            json!({
                "href": "https://api.example.com/v3/apps/app-1/relationships/current_droplet",
                "method": "PATCH",
            })
        );

        let record = DropletRecord {
            image: String::new(),
            ..record
        };
        let view = serde_json::to_value(droplet(&record, &urls)).unwrap();
        assert_eq!(view["image"], json!(null));
    }
}
