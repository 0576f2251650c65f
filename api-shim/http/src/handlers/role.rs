use super::{
    create_error, created, new_guid, parent_error, ApiState, Authorization, Rendered, INVALID_ORG,
    INVALID_SPACE,
};
use crate::{
    error::ApiError,
    payloads::{decode, RoleCreate},
    presenters::{self, RoleResponse},
};
use axum::{body::Bytes, extract::State, Extension};
use cf_api_shim_k8s_repositories::{OrgRepo, RoleRepo};

/// Grants a user a role in a space or organization. The target must exist
/// and be visible to the caller.
pub(crate) async fn create(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    body: Bytes,
) -> Rendered<RoleResponse> {
    let payload = decode::<RoleCreate>(&body)?;
    let client = state.client(&auth)?;
    let orgs = OrgRepo::new(client.clone(), &state.config().root_namespace);

    if let Some(space_guid) = payload.space_guid() {
        orgs.get_space(space_guid)
            .await
            .map_err(|e| parent_error(e, INVALID_SPACE, space_guid))?;
    }
    if let Some(org_guid) = payload.organization_guid() {
        orgs.get_org(org_guid)
            .await
            .map_err(|e| parent_error(e, INVALID_ORG, org_guid))?;
    }

    let guid = new_guid();
    let record = payload
        .to_record(&guid)
        .ok_or_else(|| ApiError::unprocessable(format!("Invalid role type '{}'", payload.type_)))?;
    let role = RoleRepo::new(client, state.config().role_mappings.clone())
        .create(&record)
        .await
        .map_err(|e| create_error(e, &guid))?;

    tracing::info!(%guid, role_type = %role.type_, user = %role.user, "Created role");
    created(presenters::role(&role, state.urls()))
}
