use super::{metadata, Link, MetadataView, UrlBuilder};
use cf_api_shim_core::ProcessRecord;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct ProcessResponse {
    pub guid: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub command: Option<String>,
    pub instances: i32,
    pub memory_in_mb: i64,
    pub disk_in_mb: i64,
    pub health_check: HealthCheckView,
    pub created_at: String,
    pub updated_at: String,
    pub metadata: MetadataView,
    pub links: ProcessLinks,
}

#[derive(Clone, Debug, Serialize)]
pub struct HealthCheckView {
    #[serde(rename = "type")]
    pub type_: String,
    pub data: HealthCheckDataView,
}

/// Unset values render as `null`.
#[derive(Clone, Debug, Serialize)]
pub struct HealthCheckDataView {
    pub timeout: Option<i64>,
    pub invocation_timeout: Option<i64>,
    pub endpoint: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProcessLinks {
    #[serde(rename = "self")]
    pub self_: Link,
    pub scale: Link,
    pub app: Link,
    pub space: Link,
    pub stats: Link,
}

pub fn process(record: &ProcessRecord, urls: &UrlBuilder) -> ProcessResponse {
    let process = urls.path(["v3", "processes", record.guid.as_str()]);
    let data = &record.health_check.data;
    ProcessResponse {
        guid: record.guid.clone(),
        type_: record.type_.clone(),
        command: Some(record.command.clone()).filter(|c| !c.is_empty()),
        instances: record.instances,
        memory_in_mb: record.memory_mb,
        disk_in_mb: record.disk_quota_mb,
        health_check: HealthCheckView {
            type_: record.health_check.type_.clone(),
            data: HealthCheckDataView {
                timeout: Some(data.timeout_seconds).filter(|t| *t > 0),
                invocation_timeout: Some(data.invocation_timeout_seconds).filter(|t| *t > 0),
                endpoint: Some(data.http_endpoint.clone()).filter(|e| !e.is_empty()),
            },
        },
        created_at: record.created_at.clone(),
        updated_at: record.updated_at.clone(),
        metadata: metadata(&record.metadata),
        links: ProcessLinks {
            self_: Link::get(process.build()),
            scale: process.link(["actions", "scale"]).with_method("POST"),
            app: urls.link(["v3", "apps", record.app_guid.as_str()]),
            space: urls.link(["v3", "spaces", record.space_guid.as_str()]),
            stats: process.link(["stats"]),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_api_shim_core::{HealthCheck, HealthCheckData};
    use serde_json::json;

    #[test]
    fn renders_process() {
        let record = ProcessRecord {
            guid: "process-1".to_string(),
            space_guid: "space-1".to_string(),
            app_guid: "app-1".to_string(),
            type_: "web".to_string(),
            command: "bundle exec rackup".to_string(),
            instances: 2,
            memory_mb: 256,
            disk_quota_mb: 1024,
            health_check: HealthCheck {
                type_: "http".to_string(),
                data: HealthCheckData {
                    timeout_seconds: 0,
                    invocation_timeout_seconds: 5,
                    http_endpoint: "/healthz".to_string(),
                },
            },
            ..Default::default()
        };
        let view = serde_json::to_value(process(&record, &UrlBuilder::new("https://api.example.com")))
            .unwrap();
        assert_eq!(view["type"], "web");
        assert_eq!(view["instances"], 2);
        assert_eq!(view["memory_in_mb"], 256);
        assert_eq!(view["disk_in_mb"], 1024);
        assert_eq!(
            view["health_check"],
            json!({
                "type": "http",
                "data": {"timeout": null, "invocation_timeout": 5, "endpoint": "/healthz"},
            })
        );
        assert_eq!(
            view["links"]["scale"],
            json!({
                "href": "https://api.example.com/v3/processes/process-1/actions/scale",
                "method": "POST",
            })
        );
        assert_eq!(
            view["links"]["app"]["href"],
            "https://api.example.com/v3/apps/app-1"
        );
    }
}
