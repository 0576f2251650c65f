use super::{metadata, to_one, Link, MetadataView, Relationship, UrlBuilder};
use cf_api_shim_core::{route::HTTP_PROTOCOL, Destination, DomainRecord, Metadata, RouteRecord};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct RouteResponse {
    pub guid: String,
    pub port: Option<i32>,
    pub host: String,
    pub path: String,
    pub protocol: String,
    pub url: String,
    pub created_at: String,
    pub updated_at: String,
    pub destinations: Vec<DestinationView>,
    pub relationships: RouteRelationships,
    pub metadata: MetadataView,
    pub links: RouteLinks,
}

#[derive(Clone, Debug, Serialize)]
pub struct DestinationView {
    pub guid: String,
    pub app: DestinationApp,
    pub weight: Option<i32>,
    pub port: i32,
    pub protocol: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct DestinationApp {
    pub guid: String,
    pub process: DestinationProcess,
}

#[derive(Clone, Debug, Serialize)]
pub struct DestinationProcess {
    #[serde(rename = "type")]
    pub type_: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct RouteRelationships {
    pub space: Relationship,
    pub domain: Relationship,
}

#[derive(Clone, Debug, Serialize)]
pub struct RouteLinks {
    #[serde(rename = "self")]
    pub self_: Link,
    pub space: Link,
    pub domain: Link,
    pub destinations: Link,
}

#[derive(Clone, Debug, Serialize)]
pub struct DomainResponse {
    pub guid: String,
    pub name: String,
    pub internal: bool,
    pub router_group: Option<String>,
    pub supported_protocols: Vec<&'static str>,
    pub created_at: String,
    pub updated_at: String,
    pub metadata: MetadataView,
    pub relationships: DomainRelationships,
    pub links: DomainLinks,
}

#[derive(Clone, Debug, Serialize)]
pub struct DomainRelationships {
    pub organization: Relationship,
    pub shared_organizations: SharedOrganizations,
}

#[derive(Clone, Debug, Serialize)]
pub struct SharedOrganizations {
    pub data: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DomainLinks {
    #[serde(rename = "self")]
    pub self_: Link,
    pub route_reservations: Link,
    pub router_group: Option<Link>,
}

pub fn route(record: &RouteRecord, urls: &UrlBuilder) -> RouteResponse {
    let route = urls.path(["v3", "routes", record.guid.as_str()]);
    RouteResponse {
        guid: record.guid.clone(),
        port: None,
        host: record.host.clone(),
        path: record.path.clone(),
        protocol: record.protocol.clone(),
        url: record.url(),
        created_at: record.created_at.clone(),
        updated_at: record.updated_at.clone(),
        destinations: record.destinations.iter().map(destination).collect(),
        relationships: RouteRelationships {
            space: to_one(&record.space_guid),
            domain: to_one(&record.domain.guid),
        },
        metadata: metadata(&record.metadata),
        links: RouteLinks {
            self_: Link::get(route.build()),
            space: urls.link(["v3", "spaces", record.space_guid.as_str()]),
            domain: urls.link(["v3", "domains", record.domain.guid.as_str()]),
            destinations: route.link(["destinations"]),
        },
    }
}

fn destination(destination: &Destination) -> DestinationView {
    DestinationView {
        guid: destination.guid.clone(),
        app: DestinationApp {
            guid: destination.app_guid.clone(),
            process: DestinationProcess {
                type_: destination.process_type.clone(),
            },
        },
        weight: None,
        port: destination.port,
        protocol: destination.protocol.clone(),
    }
}

/// Domains are shared across organizations.
pub fn domain(record: &DomainRecord, urls: &UrlBuilder) -> DomainResponse {
    let domain = urls.path(["v3", "domains", record.guid.as_str()]);
    DomainResponse {
        guid: record.guid.clone(),
        name: record.name.clone(),
        internal: false,
        router_group: None,
        supported_protocols: vec![HTTP_PROTOCOL],
        created_at: record.created_at.clone(),
        updated_at: record.updated_at.clone(),
        metadata: metadata(&Metadata::default()),
        relationships: DomainRelationships {
            organization: Relationship { data: None },
            shared_organizations: SharedOrganizations { data: Vec::new() },
        },
        links: DomainLinks {
            self_: Link::get(domain.build()),
            route_reservations: domain.link(["route_reservations"]),
            router_group: None,
        },
    }
}
