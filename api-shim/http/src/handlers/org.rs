use super::{
    create_error, created, lookup_error, new_guid, ok, parent_error, unknown, ApiState,
    Authorization, Rendered, INVALID_ORG,
};
use crate::{
    error::ApiError,
    payloads::{decode, NamesQuery, OrgCreate, SpaceCreate, SpaceListQuery},
    presenters::{self, ListResponse, OrgResponse, SpaceResponse},
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Extension,
};
use axum_extra::extract::WithRejection;
use cf_api_shim_k8s_repositories::OrgRepo;
use http::StatusCode;

pub(crate) async fn create_org(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    body: Bytes,
) -> Rendered<OrgResponse> {
    let payload = decode::<OrgCreate>(&body)?;
    let client = state.client(&auth)?;

    let guid = new_guid();
    let org = OrgRepo::new(client, &state.config().root_namespace)
        .create_org(&payload.to_record(&guid))
        .await
        .map_err(|e| create_error(e, &guid))?;

    tracing::info!(%guid, name = %org.name, "Created organization");
    created(presenters::org(&org, state.urls()))
}

pub(crate) async fn get_org(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    Path(guid): Path<String>,
) -> Rendered<OrgResponse> {
    let client = state.client(&auth)?;
    let org = OrgRepo::new(client, &state.config().root_namespace)
        .get_org(&guid)
        .await
        .map_err(|e| lookup_error(e, &guid))?;
    ok(presenters::org(&org, state.urls()))
}

/// Removes the org's anchor. Its namespace and spaces are torn down by the
/// hierarchy controller after the response is sent.
pub(crate) async fn delete_org(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    Path(guid): Path<String>,
) -> Result<StatusCode, ApiError> {
    let client = state.client(&auth)?;
    OrgRepo::new(client, &state.config().root_namespace)
        .delete_org(&guid)
        .await
        .map_err(|e| lookup_error(e, &guid))?;
    tracing::info!(%guid, "Deleted organization");
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn list_orgs(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    WithRejection(Query(query), _): WithRejection<Query<NamesQuery>, ApiError>,
) -> Rendered<ListResponse<OrgResponse>> {
    let client = state.client(&auth)?;
    let orgs = OrgRepo::new(client, &state.config().root_namespace)
        .list_orgs(&query.names())
        .await
        .map_err(|e| unknown(e, ""))?;
    let views = orgs
        .iter()
        .map(|org| presenters::org(org, state.urls()))
        .collect();
    ok(ListResponse::new(views, state.urls(), &["v3", "organizations"]))
}

pub(crate) async fn create_space(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    body: Bytes,
) -> Rendered<SpaceResponse> {
    let payload = decode::<SpaceCreate>(&body)?;
    let client = state.client(&auth)?;
    let orgs = OrgRepo::new(client, &state.config().root_namespace);

    let org_guid = payload.organization_guid();
    orgs.get_org(org_guid)
        .await
        .map_err(|e| parent_error(e, INVALID_ORG, org_guid))?;

    let guid = new_guid();
    let space = orgs
        .create_space(&payload.to_record(&guid))
        .await
        .map_err(|e| create_error(e, &guid))?;

    tracing::info!(%guid, org = %space.organization_guid, name = %space.name, "Created space");
    created(presenters::space(&space, state.urls()))
}

pub(crate) async fn get_space(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    Path(guid): Path<String>,
) -> Rendered<SpaceResponse> {
    let client = state.client(&auth)?;
    let space = OrgRepo::new(client, &state.config().root_namespace)
        .get_space(&guid)
        .await
        .map_err(|e| lookup_error(e, &guid))?;
    ok(presenters::space(&space, state.urls()))
}

pub(crate) async fn delete_space(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    Path(guid): Path<String>,
) -> Result<StatusCode, ApiError> {
    let client = state.client(&auth)?;
    OrgRepo::new(client, &state.config().root_namespace)
        .delete_space(&guid)
        .await
        .map_err(|e| lookup_error(e, &guid))?;
    tracing::info!(%guid, "Deleted space");
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn list_spaces(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    WithRejection(Query(query), _): WithRejection<Query<SpaceListQuery>, ApiError>,
) -> Rendered<ListResponse<SpaceResponse>> {
    let client = state.client(&auth)?;
    let spaces = OrgRepo::new(client, &state.config().root_namespace)
        .list_spaces(&query.to_filter())
        .await
        .map_err(|e| unknown(e, ""))?;
    let views = spaces
        .iter()
        .map(|space| presenters::space(space, state.urls()))
        .collect();
    ok(ListResponse::new(views, state.urls(), &["v3", "spaces"]))
}
