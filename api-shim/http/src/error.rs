use axum::{
    extract::rejection::QueryRejection,
    response::{IntoResponse, Response},
    Json,
};
use cf_api_shim_core::ResourceType;
use http::StatusCode;
use serde::Serialize;

/// An error rendered in the legacy API's envelope:
/// `{"errors":[{"code":N,"title":T,"detail":D}]}`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{title} ({code}): {detail}")]
pub struct ApiError {
    status: StatusCode,
    code: u32,
    title: &'static str,
    detail: String,
}

#[derive(Serialize)]
struct Envelope<'a> {
    errors: [Entry<'a>; 1],
}

#[derive(Serialize)]
struct Entry<'a> {
    code: u32,
    title: &'a str,
    detail: &'a str,
}

impl ApiError {
    fn new(status: StatusCode, code: u32, title: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status,
            code,
            title,
            detail: detail.into(),
        }
    }

    pub fn not_found(resource: ResourceType) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            10010,
            "CF-ResourceNotFound",
            format!("{resource} not found"),
        )
    }

    /// Carries no detail about the failure; callers log it instead.
    pub fn unknown() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            10001,
            "UnknownError",
            "An unknown error occurred.",
        )
    }

    pub fn message_parse() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            1001,
            "CF-MessageParseError",
            "Request invalid due to parse error: invalid request body",
        )
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            10008,
            "CF-UnprocessableEntity",
            detail,
        )
    }

    pub fn uniqueness(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            10016,
            "CF-UniquenessError",
            detail,
        )
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            10002,
            "CF-NotAuthenticated",
            "Authentication error",
        )
    }

    pub fn bad_query_parameter(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            10005,
            "CF-BadQueryParameter",
            detail,
        )
    }

    pub fn unknown_request() -> Self {
        Self::new(StatusCode::NOT_FOUND, 10000, "CF-NotFound", "Unknown request")
    }

    pub fn method_not_allowed() -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            10000,
            "CF-NotFound",
            "Unknown request",
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn title(&self) -> &str {
        self.title
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(%rejection, "Rejecting query string");
        Self::bad_query_parameter(format!(
            "The query parameter is invalid: {}",
            rejection.body_text()
        ))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Envelope {
            errors: [Entry {
                code: self.code,
                title: self.title,
                detail: &self.detail,
            }],
        };
        (self.status, Json(body)).into_response()
    }
}
