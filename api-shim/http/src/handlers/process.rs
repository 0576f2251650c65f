use super::{lookup_error, ok, ApiState, Authorization, Rendered};
use crate::{
    actions,
    payloads::{decode, ProcessScale},
    presenters::{self, ProcessResponse},
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    Extension,
};
use cf_api_shim_k8s_repositories::ProcessRepo;

pub(crate) async fn get(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    Path(guid): Path<String>,
) -> Rendered<ProcessResponse> {
    let client = state.client(&auth)?;
    let process = ProcessRepo::new(client)
        .get(&guid)
        .await
        .map_err(|e| lookup_error(e, &guid))?;
    ok(presenters::process(&process, state.urls()))
}

pub(crate) async fn scale(
    State(state): State<ApiState>,
    Extension(auth): Extension<Authorization>,
    Path(guid): Path<String>,
    body: Bytes,
) -> Rendered<ProcessResponse> {
    let payload = decode::<ProcessScale>(&body)?;
    let client = state.client(&auth)?;
    let process = actions::scale_process(&ProcessRepo::new(client), &guid, &payload.to_message())
        .await
        .map_err(|e| lookup_error(e, &guid))?;
    ok(presenters::process(&process, state.urls()))
}
