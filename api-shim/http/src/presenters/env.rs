use super::{Link, UrlBuilder};
use cf_api_shim_core::EnvVarsRecord;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Serialize)]
pub struct EnvVarsResponse {
    pub var: BTreeMap<String, String>,
    pub links: EnvVarsLinks,
}

#[derive(Clone, Debug, Serialize)]
pub struct EnvVarsLinks {
    #[serde(rename = "self")]
    pub self_: Link,
    pub app: Link,
}

pub fn env_vars(record: &EnvVarsRecord, urls: &UrlBuilder) -> EnvVarsResponse {
    let app = urls.path(["v3", "apps", record.app_guid.as_str()]);
    EnvVarsResponse {
        var: record.environment_variables.clone(),
        links: EnvVarsLinks {
            self_: app.link(["environment_variables"]),
            app: Link::get(app.build()),
        },
    }
}
