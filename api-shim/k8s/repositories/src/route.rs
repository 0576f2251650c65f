use crate::{
    app::non_empty,
    cluster::{ClusterClient, Selector},
    meta,
};
use cf_api_shim_core::{
    Destination, DomainRecord, DomainRef, Error, ResourceType, Result, RouteRecord,
};
use cf_api_shim_k8s_api::{
    labels,
    networking::{self, CFRouteSpec, DomainReference},
    CFDomain, CFRoute, LocalObjectReference, ObjectMeta,
};

#[derive(Clone, Debug)]
pub struct RouteRepo {
    client: ClusterClient,
}

#[derive(Clone, Debug)]
pub struct DomainRepo {
    client: ClusterClient,
}

/// Narrows a route listing. Empty lists do not filter.
#[derive(Clone, Debug, Default)]
pub struct RouteListFilter {
    pub space_guids: Vec<String>,
    pub domain_guids: Vec<String>,
    pub hosts: Vec<String>,
    pub paths: Vec<String>,
}

// === impl RouteRepo ===

impl RouteRepo {
    pub fn new(client: ClusterClient) -> Self {
        Self { client }
    }

    /// Creates a route. The domain name on the record is carried through to
    /// the result but is not stored.
    pub async fn create(&self, record: &RouteRecord) -> Result<RouteRecord> {
        let mut route_labels = record.metadata.labels.clone();
        route_labels.insert(labels::ROUTE_GUID.to_string(), record.guid.clone());

        let route = CFRoute {
            metadata: ObjectMeta {
                name: Some(record.guid.clone()),
                namespace: Some(record.space_guid.clone()),
                labels: Some(route_labels),
                annotations: non_empty(&record.metadata.annotations),
                ..Default::default()
            },
            spec: CFRouteSpec {
                host: record.host.clone(),
                path: record.path.clone(),
                protocol: record.protocol.clone(),
                domain_ref: DomainReference {
                    name: record.domain.guid.clone(),
                },
                destinations: record
                    .destinations
                    .iter()
                    .map(|d| networking::Destination {
                        guid: d.guid.clone(),
                        port: d.port,
                        app_ref: LocalObjectReference {
                            name: d.app_guid.clone(),
                        },
                        process_type: d.process_type.clone(),
                        protocol: d.protocol.clone(),
                    })
                    .collect(),
            },
        };

        tracing::debug!(guid = %record.guid, host = %record.host, domain = %record.domain.name, "Creating route");
        let created = self.client.create(&route).await.map_err(|error| {
            match meta::to_error(error, ResourceType::Route) {
                Error::UniquenessViolation { resource, .. } => Error::UniquenessViolation {
                    resource,
                    message: format!(
                        "Route already exists with host '{}' for domain '{}'.",
                        record.host, record.domain.name
                    ),
                },
                error => error,
            }
        })?;

        let mut created = to_record(created);
        created.domain.name = record.domain.name.clone();
        Ok(created)
    }

    pub async fn get(&self, guid: &str) -> Result<RouteRecord> {
        let route = meta::find_by_guid::<CFRoute>(&self.client, ResourceType::Route, guid).await?;
        Ok(to_record(route))
    }

    pub async fn list(&self, filter: &RouteListFilter) -> Result<Vec<RouteRecord>> {
        let routes = self
            .client
            .list::<CFRoute>(None, &Selector::default())
            .await
            .map_err(|e| meta::to_error(e, ResourceType::Route))?;

        let any_of = |values: &[String], value: &str| {
            values.is_empty() || values.iter().any(|v| v == value)
        };
        let mut records = routes
            .into_iter()
            .map(to_record)
            .filter(|r| {
                any_of(&filter.space_guids, &r.space_guid)
                    && any_of(&filter.domain_guids, &r.domain.guid)
                    && any_of(&filter.hosts, &r.host)
                    && any_of(&filter.paths, &r.path)
            })
            .collect::<Vec<_>>();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.guid.cmp(&b.guid)));
        Ok(records)
    }
}

fn to_record(route: CFRoute) -> RouteRecord {
    RouteRecord {
        guid: meta::guid(&route.metadata),
        space_guid: meta::namespace(&route.metadata),
        metadata: meta::user_metadata(&route.metadata),
        created_at: meta::created_at(&route.metadata),
        updated_at: meta::updated_at(&route.metadata),
        domain: DomainRef {
            guid: route.spec.domain_ref.name,
            name: String::new(),
        },
        host: route.spec.host,
        path: route.spec.path,
        protocol: route.spec.protocol,
        destinations: route
            .spec
            .destinations
            .into_iter()
            .map(|d| Destination {
                guid: d.guid,
                app_guid: d.app_ref.name,
                process_type: d.process_type,
                port: d.port,
                protocol: d.protocol,
            })
            .collect(),
    }
}

// === impl DomainRepo ===

impl DomainRepo {
    pub fn new(client: ClusterClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, guid: &str) -> Result<DomainRecord> {
        let domain = self
            .client
            .get::<CFDomain>(None, guid)
            .await
            .map_err(|e| meta::to_error(e, ResourceType::Domain))?;
        Ok(to_domain_record(domain))
    }

    /// Lists domains, optionally limited to the given names.
    pub async fn list(&self, names: &[String]) -> Result<Vec<DomainRecord>> {
        let domains = self
            .client
            .list::<CFDomain>(None, &Selector::default())
            .await
            .map_err(|e| meta::to_error(e, ResourceType::Domain))?;
        let mut records = domains
            .into_iter()
            .filter(|d| names.is_empty() || names.contains(&d.spec.name))
            .map(to_domain_record)
            .collect::<Vec<_>>();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }
}

fn to_domain_record(domain: CFDomain) -> DomainRecord {
    DomainRecord {
        guid: meta::guid(&domain.metadata),
        created_at: meta::created_at(&domain.metadata),
        updated_at: meta::updated_at(&domain.metadata),
        name: domain.spec.name,
    }
}
