use super::{
    create_error, created, lookup_error, new_guid, ok, parent_error, ApiState, Authorization,
    Rendered, INVALID_APP,
};
use crate::{
    payloads::{decode, PackageCreate},
    presenters::{self, PackageResponse},
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    Extension,
};
use cf_api_shim_k8s_repositories::{AppRepo, PackageRepo};

pub(crate) async fn create(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    body: Bytes,
) -> Rendered<PackageResponse> {
    let payload = decode::<PackageCreate>(&body)?;
    let client = state.client(&auth)?;

    let app_guid = payload.app_guid();
    let app = AppRepo::new(client.clone())
        .get(app_guid)
        .await
        .map_err(|e| parent_error(e, INVALID_APP, app_guid))?;

    let guid = new_guid();
    let record = payload.to_record(&guid, &app, &state.config().package_registry_secret_name);
    let package = PackageRepo::new(client)
        .create(&record)
        .await
        .map_err(|e| create_error(e, &guid))?;

    tracing::info!(%guid, app = %app.guid, "Created package");
    created(presenters::package(&package, state.urls()))
}

pub(crate) async fn get(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    Path(guid): Path<String>,
) -> Rendered<PackageResponse> {
    let client = state.client(&auth)?;
    let package = PackageRepo::new(client)
        .get(&guid)
        .await
        .map_err(|e| lookup_error(e, &guid))?;
    ok(presenters::package(&package, state.urls()))
}
