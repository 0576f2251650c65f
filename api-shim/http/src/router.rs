use crate::{
    error::ApiError,
    handlers::{app, build, org, package, process, role, root, route, ApiState, Authorization},
};
use axum::{
    body::Body,
    extract::State,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use http::{header, HeaderValue, Request};

/// Paths served to unauthenticated callers.
const PUBLIC_PATHS: &[&str] = &["/", "/v3"];

/// Builds the API router over the shared state.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(root::root))
        .route("/v3", get(root::v3_root))
        .route("/v3/apps", get(app::list).post(app::create))
        .route("/v3/apps/{guid}", get(app::get))
        .route("/v3/apps/{guid}/processes", get(app::list_processes))
        .route(
            "/v3/apps/{guid}/processes/{type}/actions/scale",
            post(app::scale_process),
        )
        .route(
            "/v3/apps/{guid}/environment_variables",
            get(app::get_env).patch(app::patch_env),
        )
        .route("/v3/processes/{guid}", get(process::get))
        .route("/v3/processes/{guid}/actions/scale", post(process::scale))
        .route("/v3/packages", post(package::create))
        .route("/v3/packages/{guid}", get(package::get))
        .route("/v3/builds", post(build::create))
        .route("/v3/builds/{guid}", get(build::get))
        .route("/v3/droplets/{guid}", get(build::get_droplet))
        .route("/v3/routes", get(route::list).post(route::create))
        .route("/v3/routes/{guid}", get(route::get))
        .route("/v3/domains", get(route::list_domains))
        .route("/v3/domains/{guid}", get(route::get_domain))
        .route("/v3/organizations", get(org::list_orgs).post(org::create_org))
        .route(
            "/v3/organizations/{guid}",
            get(org::get_org).delete(org::delete_org),
        )
        .route("/v3/spaces", get(org::list_spaces).post(org::create_space))
        .route("/v3/spaces/{guid}", get(org::get_space).delete(org::delete_space))
        .route("/v3/roles", post(role::create))
        .fallback(unknown_request)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(middleware::from_fn(json_content_type))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn unknown_request() -> ApiError {
    ApiError::unknown_request()
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

/// Records the caller's `Authorization` header for the client factory. When
/// authentication is enabled, requests without one are rejected.
async fn authenticate(
    State(state): State<ApiState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if token.is_none()
        && state.config().auth_enabled
        && !PUBLIC_PATHS.contains(&request.uri().path())
    {
        tracing::debug!(path = %request.uri().path(), "Rejecting unauthenticated request");
        return ApiError::unauthorized().into_response();
    }

    request.extensions_mut().insert(Authorization(token));
    next.run(request).await
}

async fn json_content_type(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    tracing::debug!(
        %method,
        path = %uri.path(),
        query = uri.query().unwrap_or(""),
        status = response.status().as_u16(),
        "Handled request"
    );
    response
}
