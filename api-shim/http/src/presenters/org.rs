use super::{metadata, to_one, Link, MetadataView, Relationship, UrlBuilder};
use cf_api_shim_core::{OrgRecord, SpaceRecord};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct OrgResponse {
    pub guid: String,
    pub name: String,
    pub suspended: bool,
    pub created_at: String,
    pub updated_at: String,
    pub metadata: MetadataView,
    pub links: OrgLinks,
}

#[derive(Clone, Debug, Serialize)]
pub struct OrgLinks {
    #[serde(rename = "self")]
    pub self_: Link,
    pub domains: Link,
    pub default_domain: Link,
}

#[derive(Clone, Debug, Serialize)]
pub struct SpaceResponse {
    pub guid: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
    pub relationships: SpaceRelationships,
    pub metadata: MetadataView,
    pub links: SpaceLinks,
}

#[derive(Clone, Debug, Serialize)]
pub struct SpaceRelationships {
    pub organization: Relationship,
}

#[derive(Clone, Debug, Serialize)]
pub struct SpaceLinks {
    #[serde(rename = "self")]
    pub self_: Link,
    pub organization: Link,
}

pub fn org(record: &OrgRecord, urls: &UrlBuilder) -> OrgResponse {
    let org = urls.path(["v3", "organizations", record.guid.as_str()]);
    OrgResponse {
        guid: record.guid.clone(),
        name: record.name.clone(),
        suspended: record.suspended,
        created_at: record.created_at.clone(),
        updated_at: record.updated_at.clone(),
        metadata: metadata(&record.metadata),
        links: OrgLinks {
            self_: Link::get(org.build()),
            domains: org.link(["domains"]),
            default_domain: org.link(["domains", "default"]),
        },
    }
}

pub fn space(record: &SpaceRecord, urls: &UrlBuilder) -> SpaceResponse {
    SpaceResponse {
        guid: record.guid.clone(),
        name: record.name.clone(),
        created_at: record.created_at.clone(),
        updated_at: record.updated_at.clone(),
        relationships: SpaceRelationships {
            organization: to_one(&record.organization_guid),
        },
        metadata: metadata(&record.metadata),
        links: SpaceLinks {
            self_: urls.link(["v3", "spaces", record.guid.as_str()]),
            organization: urls.link(["v3", "organizations", record.organization_guid.as_str()]),
        },
    }
}
