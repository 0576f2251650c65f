use super::{Link, UrlBuilder};
use serde::Serialize;
use std::collections::BTreeMap;

/// The API version advertised to clients.
pub const API_VERSION: &str = "3.117.0+cf-k8s";

/// The collections listed by the `/v3` index.
const COLLECTIONS: &[&str] = &[
    "apps",
    "builds",
    "domains",
    "droplets",
    "organizations",
    "packages",
    "processes",
    "roles",
    "routes",
    "spaces",
];

#[derive(Clone, Debug, Serialize)]
pub struct RootResponse {
    pub links: RootLinks,
}

/// Services the shim does not provide are advertised as `null`.
#[derive(Clone, Debug, Serialize)]
pub struct RootLinks {
    #[serde(rename = "self")]
    pub self_: Link,
    pub bits_service: Option<Link>,
    pub cloud_controller_v2: Option<Link>,
    pub cloud_controller_v3: VersionedLink,
    pub network_policy_v0: Option<Link>,
    pub network_policy_v1: Option<Link>,
    pub login: Option<Link>,
    pub uaa: Option<Link>,
    pub credhub: Option<Link>,
    pub routing: Option<Link>,
    pub logging: Option<Link>,
    pub log_cache: Option<Link>,
    pub log_stream: Option<Link>,
    pub app_ssh: Option<Link>,
}

#[derive(Clone, Debug, Serialize)]
pub struct VersionedLink {
    pub href: String,
    pub meta: Version,
}

#[derive(Clone, Debug, Serialize)]
pub struct Version {
    pub version: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct V3RootResponse {
    pub links: BTreeMap<&'static str, Link>,
}

pub fn root(urls: &UrlBuilder) -> RootResponse {
    RootResponse {
        links: RootLinks {
            self_: Link::get(urls.build()),
            bits_service: None,
            cloud_controller_v2: None,
            cloud_controller_v3: VersionedLink {
                href: urls.path(["v3"]).build(),
                meta: Version {
                    version: API_VERSION,
                },
            },
            network_policy_v0: None,
            network_policy_v1: None,
            login: None,
            uaa: None,
            credhub: None,
            routing: None,
            logging: None,
            log_cache: None,
            log_stream: None,
            app_ssh: None,
        },
    }
}

pub fn v3_root(urls: &UrlBuilder) -> V3RootResponse {
    let v3 = urls.path(["v3"]);
    let mut links = COLLECTIONS
        .iter()
        .map(|c| (*c, v3.link([c])))
        .collect::<BTreeMap<_, _>>();
    links.insert("self", Link::get(v3.build()));
    V3RootResponse { links }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_root() {
        let view = serde_json::to_value(root(&UrlBuilder::new("https://api.example.com"))).unwrap();
        assert_eq!(view["links"]["self"], json!({"href": "https://api.example.com"}));
        assert_eq!(
            view["links"]["cloud_controller_v3"],
            json!({"href": "https://api.example.com/v3", "meta": {"version": API_VERSION}})
        );
        assert_eq!(view["links"]["uaa"], json!(null));
        assert_eq!(view["links"]["app_ssh"], json!(null));
    }

    #[test]
    fn renders_v3_index() {
        let view = serde_json::to_value(v3_root(&UrlBuilder::new("https://api.example.com"))).unwrap();
        assert_eq!(
            view["links"]["self"],
            json!({"href": "https://api.example.com/v3"})
        );
        assert_eq!(
            view["links"]["apps"],
            json!({"href": "https://api.example.com/v3/apps"})
        );
        assert_eq!(view["links"].as_object().unwrap().len(), COLLECTIONS.len() + 1);
    }
}
