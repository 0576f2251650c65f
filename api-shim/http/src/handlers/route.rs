use super::{
    create_error, created, lookup_error, new_guid, ok, parent_error, unknown, ApiState,
    Authorization, Rendered, INVALID_DOMAIN, INVALID_SPACE,
};
use crate::{
    error::ApiError,
    payloads::{decode, NamesQuery, RouteCreate, RouteListQuery},
    presenters::{self, DomainResponse, ListResponse, RouteResponse},
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Extension,
};
use axum_extra::extract::WithRejection;
use cf_api_shim_core::RouteRecord;
use cf_api_shim_k8s_repositories::{DomainRepo, OrgRepo, RouteRepo};
use std::collections::HashMap;

pub(crate) async fn create(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    body: Bytes,
) -> Rendered<RouteResponse> {
    let payload = decode::<RouteCreate>(&body)?;
    let client = state.client(&auth)?;

    let space_guid = payload.space_guid();
    OrgRepo::new(client.clone(), &state.config().root_namespace)
        .get_space(space_guid)
        .await
        .map_err(|e| parent_error(e, INVALID_SPACE, space_guid))?;

    let domain_guid = payload.domain_guid();
    let domain = DomainRepo::new(client.clone())
        .get(domain_guid)
        .await
        .map_err(|e| parent_error(e, INVALID_DOMAIN, domain_guid))?;

    let guid = new_guid();
    let record = payload.to_record(&guid, &domain);
    let route = RouteRepo::new(client)
        .create(&record)
        .await
        .map_err(|e| create_error(e, &guid))?;

    tracing::info!(%guid, space = %route.space_guid, url = %route.url(), "Created route");
    created(presenters::route(&route, state.urls()))
}

pub(crate) async fn get(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    Path(guid): Path<String>,
) -> Rendered<RouteResponse> {
    let client = state.client(&auth)?;
    let mut route = RouteRepo::new(client.clone())
        .get(&guid)
        .await
        .map_err(|e| lookup_error(e, &guid))?;
    let domain = DomainRepo::new(client)
        .get(&route.domain.guid)
        .await
        .map_err(|e| unknown(e, &guid))?;
    route.domain.name = domain.name;
    ok(presenters::route(&route, state.urls()))
}

pub(crate) async fn list(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    WithRejection(Query(query), _): WithRejection<Query<RouteListQuery>, ApiError>,
) -> Rendered<ListResponse<RouteResponse>> {
    let client = state.client(&auth)?;
    let routes = RouteRepo::new(client.clone())
        .list(&query.to_filter())
        .await
        .map_err(|e| unknown(e, ""))?;
    let routes = resolve_domains(&DomainRepo::new(client), routes).await?;
    let views = routes
        .iter()
        .map(|route| presenters::route(route, state.urls()))
        .collect();
    ok(ListResponse::new(views, state.urls(), &["v3", "routes"]))
}

/// Fills in the domain name of each route. Domains are few, so they are
/// listed once rather than fetched per route.
async fn resolve_domains(
    domains: &DomainRepo,
    mut routes: Vec<RouteRecord>,
) -> Result<Vec<RouteRecord>, ApiError> {
    if routes.is_empty() {
        return Ok(routes);
    }
    let names = domains
        .list(&[])
        .await
        .map_err(|e| unknown(e, ""))?
        .into_iter()
        .map(|d| (d.guid, d.name))
        .collect::<HashMap<_, _>>();
    for route in &mut routes {
        match names.get(&route.domain.guid) {
            Some(name) => route.domain.name = name.clone(),
            None => {
                tracing::warn!(route = %route.guid, domain = %route.domain.guid, "Route references a missing domain")
            }
        }
    }
    Ok(routes)
}

pub(crate) async fn get_domain(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    Path(guid): Path<String>,
) -> Rendered<DomainResponse> {
    let client = state.client(&auth)?;
    let domain = DomainRepo::new(client)
        .get(&guid)
        .await
        .map_err(|e| lookup_error(e, &guid))?;
    ok(presenters::domain(&domain, state.urls()))
}

pub(crate) async fn list_domains(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    WithRejection(Query(query), _): WithRejection<Query<NamesQuery>, ApiError>,
) -> Rendered<ListResponse<DomainResponse>> {
    let client = state.client(&auth)?;
    let domains = DomainRepo::new(client)
        .list(&query.names())
        .await
        .map_err(|e| unknown(e, ""))?;
    let views = domains
        .iter()
        .map(|domain| presenters::domain(domain, state.urls()))
        .collect();
    ok(ListResponse::new(views, state.urls(), &["v3", "domains"]))
}
