use super::{
    create_error, created, lookup_error, new_guid, ok, parent_error, unknown, ApiState,
    Authorization, Rendered, INVALID_SPACE,
};
use crate::{
    error::ApiError,
    actions,
    payloads::{decode, AppCreate, AppListQuery, EnvVarsPatch, ProcessScale},
    presenters::{self, AppResponse, EnvVarsResponse, ListResponse, ProcessResponse},
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Extension,
};
use axum_extra::extract::WithRejection;
use cf_api_shim_core::EnvVarsRecord;
use cf_api_shim_k8s_repositories::{AppRepo, EnvRepo, OrgRepo, ProcessRepo};

pub(crate) async fn create(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    body: Bytes,
) -> Rendered<AppResponse> {
    let payload = decode::<AppCreate>(&body)?;
    let client = state.client(&auth)?;

    let space_guid = payload.space_guid();
    OrgRepo::new(client.clone(), &state.config().root_namespace)
        .get_space(space_guid)
        .await
        .map_err(|e| parent_error(e, INVALID_SPACE, space_guid))?;

    let guid = new_guid();
    let record = payload.to_record(&guid, &state.config().lifecycle);
    let app = AppRepo::new(client.clone())
        .create(&record)
        .await
        .map_err(|e| create_error(e, &guid))?;

    if let Some(vars) = &payload.environment_variables {
        EnvRepo::new(client)
            .create(&EnvVarsRecord {
                app_guid: app.guid.clone(),
                space_guid: app.space_guid.clone(),
                name: app.env_secret_name.clone(),
                environment_variables: vars.clone(),
            })
            .await
            .map_err(|e| unknown(e, &guid))?;
    }

    tracing::info!(%guid, space = %app.space_guid, name = %app.name, "Created app");
    created(presenters::app(&app, state.urls()))
}

pub(crate) async fn get(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    Path(guid): Path<String>,
) -> Rendered<AppResponse> {
    let client = state.client(&auth)?;
    let app = AppRepo::new(client)
        .get(&guid)
        .await
        .map_err(|e| lookup_error(e, &guid))?;
    ok(presenters::app(&app, state.urls()))
}

pub(crate) async fn list(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    WithRejection(Query(query), _): WithRejection<Query<AppListQuery>, ApiError>,
) -> Rendered<ListResponse<AppResponse>> {
    let client = state.client(&auth)?;
    let apps = AppRepo::new(client)
        .list(&query.to_filter())
        .await
        .map_err(|e| unknown(e, ""))?;
    let views = apps
        .iter()
        .map(|app| presenters::app(app, state.urls()))
        .collect();
    ok(ListResponse::new(views, state.urls(), &["v3", "apps"]))
}

pub(crate) async fn list_processes(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    Path(guid): Path<String>,
) -> Rendered<ListResponse<ProcessResponse>> {
    let client = state.client(&auth)?;
    let app = AppRepo::new(client.clone())
        .get(&guid)
        .await
        .map_err(|e| lookup_error(e, &guid))?;
    let processes = ProcessRepo::new(client)
        .list_for_app(&app.guid, &app.space_guid)
        .await
        .map_err(|e| unknown(e, &guid))?;
    let views = processes
        .iter()
        .map(|p| presenters::process(p, state.urls()))
        .collect();
    ok(ListResponse::new(
        views,
        state.urls(),
        &["v3", "apps", guid.as_str(), "processes"],
    ))
}

pub(crate) async fn scale_process(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    Path((guid, process_type)): Path<(String, String)>,
    body: Bytes,
) -> Rendered<ProcessResponse> {
    let payload = decode::<ProcessScale>(&body)?;
    let client = state.client(&auth)?;
    let process = actions::scale_app_process(
        &AppRepo::new(client.clone()),
        &ProcessRepo::new(client),
        &guid,
        &process_type,
        &payload.to_message(),
    )
    .await
    .map_err(|e| lookup_error(e, &guid))?;
    ok(presenters::process(&process, state.urls()))
}

pub(crate) async fn get_env(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    Path(guid): Path<String>,
) -> Rendered<EnvVarsResponse> {
    let client = state.client(&auth)?;
    let app = AppRepo::new(client.clone())
        .get(&guid)
        .await
        .map_err(|e| lookup_error(e, &guid))?;
    let env = EnvRepo::new(client)
        .get(&app)
        .await
        .map_err(|e| unknown(e, &guid))?;
    ok(presenters::env_vars(&env, state.urls()))
}

pub(crate) async fn patch_env(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    Path(guid): Path<String>,
    body: Bytes,
) -> Rendered<EnvVarsResponse> {
    let payload = decode::<EnvVarsPatch>(&body)?;
    let client = state.client(&auth)?;
    let app = AppRepo::new(client.clone())
        .get(&guid)
        .await
        .map_err(|e| lookup_error(e, &guid))?;
    let env = EnvRepo::new(client)
        .patch(&app, &payload.var)
        .await
        .map_err(|e| unknown(e, &guid))?;
    ok(presenters::env_vars(&env, state.urls()))
}
