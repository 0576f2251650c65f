use crate::Metadata;

pub const HTTP_PROTOCOL: &str = "http";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteRecord {
    pub guid: String,
    pub space_guid: String,
    pub domain: DomainRef,
    pub host: String,
    pub path: String,
    pub protocol: String,
    pub destinations: Vec<Destination>,
    pub metadata: Metadata,
    pub created_at: String,
    pub updated_at: String,
}

/// A route's domain. The name is filled in when the domain is resolved and
/// may be empty on records read straight from the cluster.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DomainRef {
    pub guid: String,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Destination {
    pub guid: String,
    pub app_guid: String,
    pub process_type: String,
    pub port: i32,
    pub protocol: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DomainRecord {
    pub guid: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl RouteRecord {
    /// The route's URL. It is always derived and never stored.
    pub fn url(&self) -> String {
        if self.host.is_empty() {
            format!("{}{}", self.domain.name, self.path)
        } else {
            format!("{}.{}{}", self.host, self.domain.name, self.path)
        }
    }
}
