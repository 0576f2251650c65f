use super::{ok, ApiState, Rendered};
use crate::presenters::{self, RootResponse, V3RootResponse};
use axum::extract::State;

/// Served without authentication.
pub(crate) async fn root(State(state): State<ApiState>) -> Rendered<RootResponse> {
    ok(presenters::root(state.urls()))
}

pub(crate) async fn v3_root(State(state): State<ApiState>) -> Rendered<V3RootResponse> {
    ok(presenters::v3_root(state.urls()))
}
