use super::{lifecycle, metadata, to_one, LifecycleView, Link, MetadataView, Relationship, UrlBuilder};
use cf_api_shim_core::AppRecord;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct AppResponse {
    pub guid: String,
    pub name: String,
    pub state: &'static str,
    pub created_at: String,
    pub updated_at: String,
    pub lifecycle: LifecycleView,
    pub relationships: AppRelationships,
    pub metadata: MetadataView,
    pub links: AppLinks,
}

#[derive(Clone, Debug, Serialize)]
pub struct AppRelationships {
    pub space: Relationship,
}

#[derive(Clone, Debug, Serialize)]
pub struct AppLinks {
    #[serde(rename = "self")]
    pub self_: Link,
    pub space: Link,
    pub processes: Link,
    pub packages: Link,
    pub environment_variables: Link,
    pub current_droplet: Link,
    pub droplets: Link,
    pub tasks: Link,
    pub start: Link,
    pub stop: Link,
    pub revisions: Link,
    pub deployed_revisions: Link,
    pub features: Link,
}

pub fn app(record: &AppRecord, urls: &UrlBuilder) -> AppResponse {
    let app = urls.path(["v3", "apps", record.guid.as_str()]);
    AppResponse {
        guid: record.guid.clone(),
        name: record.name.clone(),
        state: record.state.as_str(),
        created_at: record.created_at.clone(),
        updated_at: record.updated_at.clone(),
        lifecycle: lifecycle(&record.lifecycle),
        relationships: AppRelationships {
            space: to_one(&record.space_guid),
        },
        metadata: metadata(&record.metadata),
        links: AppLinks {
            self_: Link::get(app.build()),
            space: urls.link(["v3", "spaces", record.space_guid.as_str()]),
            processes: app.link(["processes"]),
            packages: app.link(["packages"]),
            environment_variables: app.link(["environment_variables"]),
            current_droplet: app.link(["droplets", "current"]),
            droplets: app.link(["droplets"]),
            tasks: app.link(["tasks"]),
            start: app.link(["actions", "start"]).with_method("POST"),
            stop: app.link(["actions", "stop"]).with_method("POST"),
            revisions: app.link(["revisions"]),
            deployed_revisions: app.link(["revisions", "deployed"]),
            features: app.link(["features"]),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_api_shim_core::LifecycleConfig;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn renders_app() {
        let record = AppRecord {
            guid: "app-1".to_string(),
            name: "my-app".to_string(),
            space_guid: "space-1".to_string(),
            lifecycle: LifecycleConfig::default().default_lifecycle(),
            created_at: "2024-01-02T03:04:05Z".to_string(),
            updated_at: "2024-01-02T03:04:05Z".to_string(),
            ..Default::default()
        };
        let urls = UrlBuilder::new("https://api.example.com");
        assert_eq!(
            serde_json::to_value(app(&record, &urls)).unwrap(),
            json!({
                "guid": "app-1",
                "name": "my-app",
                "state": "STOPPED",
                "created_at": "2024-01-02T03:04:05Z",
                "updated_at": "2024-01-02T03:04:05Z",
                "lifecycle": {
                    "type": "buildpack",
                    "data": {"buildpacks": [], "stack": "cflinuxfs3"},
                },
                "relationships": {"space": {"data": {"guid": "space-1"}}},
                "metadata": {"labels": {}, "annotations": {}},
                "links": {
                    "self": {"href": "https://api.example.com/v3/apps/app-1"},
                    "space": {"href": "https://api.example.com/v3/spaces/space-1"},
                    "processes": {"href": "https://api.example.com/v3/apps/app-1/processes"},
                    "packages": {"href": "https://api.example.com/v3/apps/app-1/packages"},
                    "environment_variables": {
                        "href": "https://api.example.com/v3/apps/app-1/environment_variables"
                    },
                    "current_droplet": {
                        "href": "https://api.example.com/v3/apps/app-1/droplets/current"
                    },
                    "droplets": {"href": "https://api.example.com/v3/apps/app-1/droplets"},
                    "tasks": {"href": "https://api.example.com/v3/apps/app-1/tasks"},
                    "start": {
                        "href": "https://api.example.com/v3/apps/app-1/actions/start",
                        "method": "POST"
                    },
                    "stop": {
                        "href": "https://api.example.com/v3/apps/app-1/actions/stop",
                        "method": "POST"
                    },
                    "revisions": {"href": "https://api.example.com/v3/apps/app-1/revisions"},
                    "deployed_revisions": {
                        "href": "https://api.example.com/v3/apps/app-1/revisions/deployed"
                    },
                    "features": {"href": "https://api.example.com/v3/apps/app-1/features"},
                },
            })
        );
    }
}
