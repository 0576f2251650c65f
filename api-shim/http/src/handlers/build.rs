use super::{
    create_error, created, lookup_error, new_guid, ok, parent_error, ApiState, Authorization,
    Rendered, INVALID_APP, INVALID_PACKAGE,
};
use crate::{
    payloads::{decode, BuildCreate},
    presenters::{self, BuildResponse, DropletResponse},
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    Extension,
};
use cf_api_shim_k8s_repositories::{AppRepo, BuildRepo, PackageRepo};

/// Stages a package. The build runs in the package's space with the
/// package's app.
pub(crate) async fn create(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    body: Bytes,
) -> Rendered<BuildResponse> {
    let payload = decode::<BuildCreate>(&body)?;
    let client = state.client(&auth)?;

    let package_guid = payload.package.guid.as_str();
    let package = PackageRepo::new(client.clone())
        .get(package_guid)
        .await
        .map_err(|e| parent_error(e, INVALID_PACKAGE, package_guid))?;
    let app = AppRepo::new(client.clone())
        .get(&package.app_guid)
        .await
        .map_err(|e| parent_error(e, INVALID_APP, &package.app_guid))?;

    let guid = new_guid();
    let record = payload.to_record(&guid, &package, &app, &state.config().lifecycle);
    let build = BuildRepo::new(client)
        .create(&record)
        .await
        .map_err(|e| create_error(e, &guid))?;

    tracing::info!(%guid, package = %package.guid, app = %app.guid, "Created build");
    created(presenters::build(&build, state.urls()))
}

pub(crate) async fn get(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    Path(guid): Path<String>,
) -> Rendered<BuildResponse> {
    let client = state.client(&auth)?;
    let build = BuildRepo::new(client)
        .get(&guid)
        .await
        .map_err(|e| lookup_error(e, &guid))?;
    ok(presenters::build(&build, state.urls()))
}

pub(crate) async fn get_droplet(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    Path(guid): Path<String>,
) -> Rendered<DropletResponse> {
    let client = state.client(&auth)?;
    let droplet = BuildRepo::new(client)
        .get_droplet(&guid)
        .await
        .map_err(|e| lookup_error(e, &guid))?;
    ok(presenters::droplet(&droplet, state.urls()))
}
