//! Response views in the legacy wire format.
//!
//! Every link is built by a [`UrlBuilder`] rooted at the configured server
//! URL. Empty maps and lists are always rendered; the only `null`s are the
//! ones the wire format requires.

mod app;
mod build;
mod env;
mod org;
mod package;
mod process;
mod role;
mod root;
mod route;

pub use self::{
    app::{app, AppResponse},
    build::{build, droplet, BuildResponse, DropletResponse},
    env::{env_vars, EnvVarsResponse},
    org::{org, space, OrgResponse, SpaceResponse},
    package::{package, PackageResponse},
    process::{process, ProcessResponse},
    role::{role, RoleResponse},
    root::{root, v3_root, RootResponse, V3RootResponse},
    route::{domain, route, DomainResponse, RouteResponse},
};

use cf_api_shim_core::{Lifecycle, Metadata};
use serde::Serialize;
use std::collections::BTreeMap;

/// Builds URLs under the server's base URL.
///
/// ```
/// # use cf_api_shim_http::presenters::UrlBuilder;
/// let urls = UrlBuilder::new("https://api.example.com/");
/// assert_eq!(
///     urls.path(["v3", "apps"]).query("page=1").build(),
///     "https://api.example.com/v3/apps?page=1",
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlBuilder {
    base: String,
    path: Vec<String>,
    query: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<&'static str>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ListResponse<T> {
    pub pagination: Pagination,
    pub resources: Vec<T>,
}

/// Lists are never paged: every matching resource is returned on a single
/// page.
#[derive(Clone, Debug, Serialize)]
pub struct Pagination {
    pub total_results: usize,
    pub total_pages: usize,
    pub first: Link,
    pub last: Link,
    pub next: Option<Link>,
    pub previous: Option<Link>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MetadataView {
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Relationship {
    pub data: Option<RelationshipData>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RelationshipData {
    pub guid: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct LifecycleView {
    #[serde(rename = "type")]
    pub type_: String,
    pub data: LifecycleDataView,
}

#[derive(Clone, Debug, Serialize)]
pub struct LifecycleDataView {
    pub buildpacks: Vec<String>,
    pub stack: String,
}

// === impl UrlBuilder ===

impl UrlBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            path: Vec::new(),
            query: None,
        }
    }

    /// Returns a builder with the given segments appended to the path.
    pub fn path<I, S>(&self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut next = self.clone();
        next.path.extend(
            segments
                .into_iter()
                .map(|s| s.as_ref().trim_matches('/').to_string())
                .filter(|s| !s.is_empty()),
        );
        next
    }

    /// Returns a builder with the given raw query.
    pub fn query(&self, query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..self.clone()
        }
    }

    pub fn build(&self) -> String {
        let mut url = self.base.trim_end_matches('/').to_string();
        for segment in &self.path {
            url.push('/');
            url.push_str(segment);
        }
        if let Some(query) = &self.query {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    pub(crate) fn link<I, S>(&self, segments: I) -> Link
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Link::get(self.path(segments).build())
    }
}

// === impl Link ===

impl Link {
    pub fn get(href: String) -> Self {
        Self { href, method: None }
    }

    pub fn with_method(self, method: &'static str) -> Self {
        Self {
            method: Some(method),
            ..self
        }
    }
}

// === impl ListResponse ===

impl<T> ListResponse<T> {
    /// Wraps `resources` listed at the collection `path`.
    pub fn new(resources: Vec<T>, urls: &UrlBuilder, path: &[&str]) -> Self {
        let page = urls.path(path).query("page=1").build();
        Self {
            pagination: Pagination {
                total_results: resources.len(),
                total_pages: 1,
                first: Link::get(page.clone()),
                last: Link::get(page),
                next: None,
                previous: None,
            },
            resources,
        }
    }
}

pub(crate) fn metadata(metadata: &Metadata) -> MetadataView {
    MetadataView {
        labels: metadata.labels.clone(),
        annotations: metadata.annotations.clone(),
    }
}

pub(crate) fn to_one(guid: &str) -> Relationship {
    Relationship {
        data: Some(RelationshipData {
            guid: guid.to_string(),
        }),
    }
}

pub(crate) fn lifecycle(lifecycle: &Lifecycle) -> LifecycleView {
    LifecycleView {
        type_: lifecycle.type_.clone(),
        data: LifecycleDataView {
            buildpacks: lifecycle.data.buildpacks.clone(),
            stack: lifecycle.data.stack.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn urls() {
        let urls = UrlBuilder::new("https://api.example.com");
        assert_eq!(urls.build(), "https://api.example.com");
        assert_eq!(
            urls.path(["v3", "apps", "guid-1"]).build(),
            "https://api.example.com/v3/apps/guid-1"
        );
        assert_eq!(
            urls.path(["/v3/", "spaces"]).path(["s1"]).build(),
            "https://api.example.com/v3/spaces/s1"
        );
        assert_eq!(
            UrlBuilder::new("http://localhost:9000/")
                .path(["v3"])
                .query("names=a,b")
                .build(),
            "http://localhost:9000/v3?names=a,b"
        );
    }

    #[test]
    fn links() {
        let urls = UrlBuilder::new("https://api.example.com");
        assert_eq!(
            serde_json::to_value(urls.link(["v3", "apps"])).unwrap(),
            json!({"href": "https://api.example.com/v3/apps"})
        );
        assert_eq!(
            serde_json::to_value(urls.link(["v3", "apps"]).with_method("POST")).unwrap(),
            json!({"href": "https://api.example.com/v3/apps", "method": "POST"})
        );
    }

    #[test]
    fn pagination() {
        let urls = UrlBuilder::new("https://api.example.com");
        let list = ListResponse::new(vec![json!({}), json!({})], &urls, &["v3", "apps"]);
        assert_eq!(
            serde_json::to_value(list).unwrap(),
            json!({
                "pagination": {
                    "total_results": 2,
                    "total_pages": 1,
                    "first": {"href": "https://api.example.com/v3/apps?page=1"},
                    "last": {"href": "https://api.example.com/v3/apps?page=1"},
                    "next": null,
                    "previous": null,
                },
                "resources": [{}, {}],
            })
        );
    }

    #[test]
    fn empty_metadata_renders_maps() {
        assert_eq!(
            serde_json::to_value(metadata(&Metadata::default())).unwrap(),
            json!({"labels": {}, "annotations": {}})
        );
    }
}
