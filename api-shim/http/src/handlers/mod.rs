//! Endpoint handlers.
//!
//! Every handler follows the same pipeline: decode the body, build a cluster
//! client for the request, resolve parent resources, create or read through
//! the repositories and render the result. Failures are mapped onto the
//! error envelope here, since the same internal error means different things
//! depending on whether the primary resource or a parent was being resolved.

pub(crate) mod app;
pub(crate) mod build;
pub(crate) mod org;
pub(crate) mod package;
pub(crate) mod process;
pub(crate) mod role;
pub(crate) mod root;
pub(crate) mod route;

use crate::{error::ApiError, presenters::UrlBuilder};
use axum::Json;
use cf_api_shim_core::{Error, LifecycleConfig};
use cf_api_shim_k8s_repositories::{ClientFactory, ClusterClient, RoleMappings};
use http::StatusCode;
use std::sync::Arc;

pub(crate) const INVALID_SPACE: &str =
    "Invalid space. Ensure that the space exists and you have access to it.";
pub(crate) const INVALID_ORG: &str =
    "Invalid organization. Ensure the organization exists and you have access to it.";
pub(crate) const INVALID_APP: &str = "App is invalid. Ensure it exists and you have access to it.";
pub(crate) const INVALID_PACKAGE: &str =
    "Unable to use package. Ensure that the package exists and you have access to it.";
pub(crate) const INVALID_DOMAIN: &str =
    "Invalid domain. Ensure that the domain exists and you have access to it.";

/// Shared by every request. Read-only once the server is running.
#[derive(Clone)]
pub struct ApiState {
    factory: Arc<dyn ClientFactory>,
    urls: UrlBuilder,
    config: Arc<HandlerConfig>,
}

#[derive(Clone, Debug, Default)]
pub struct HandlerConfig {
    pub server_url: String,
    pub root_namespace: String,
    pub lifecycle: LifecycleConfig,
    pub package_registry_secret_name: String,
    pub role_mappings: Arc<RoleMappings>,
    pub auth_enabled: bool,
}

/// The request's `Authorization` header, if any. Inserted by the
/// authentication layer and handed to the client factory.
#[derive(Clone, Debug, Default)]
pub struct Authorization(pub Option<String>);

// === impl ApiState ===

impl ApiState {
    pub fn new(factory: Arc<dyn ClientFactory>, config: HandlerConfig) -> Self {
        Self {
            factory,
            urls: UrlBuilder::new(config.server_url.clone()),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    pub(crate) fn urls(&self) -> &UrlBuilder {
        &self.urls
    }

    /// Builds a cluster client for one request. Clients are never reused
    /// across requests.
    pub(crate) fn client(&self, auth: &Authorization) -> Result<ClusterClient, ApiError> {
        self.factory
            .build_client(auth.0.as_deref())
            .map_err(|error| {
                tracing::error!(%error, "Failed to build cluster client");
                ApiError::unknown()
            })
    }
}

impl std::fmt::Debug for ApiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiState")
            .field("urls", &self.urls)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Maps a failure to resolve the primary resource of a request.
pub(crate) fn lookup_error(error: Error, guid: &str) -> ApiError {
    match error {
        Error::NotFound(resource) | Error::PermissionDeniedOrNotFound(resource) => {
            ApiError::not_found(resource)
        }
        error => unknown(error, guid),
    }
}

/// Maps a failure to resolve a resource referenced by a request. Absence and
/// lack of access are reported alike, with `detail`.
pub(crate) fn parent_error(error: Error, detail: &str, guid: &str) -> ApiError {
    if error.is_not_found() {
        tracing::debug!(%guid, %error, "Referenced resource is not usable");
        return ApiError::unprocessable(detail);
    }
    unknown(error, guid)
}

/// Maps a failure to create a resource.
pub(crate) fn create_error(error: Error, guid: &str) -> ApiError {
    match error {
        Error::UniquenessViolation { message, .. } => ApiError::uniqueness(message),
        Error::ValidationFailure(message) => ApiError::unprocessable(message),
        error => unknown(error, guid),
    }
}

/// Unknown errors carry no detail to the caller; it is logged instead.
pub(crate) fn unknown(error: Error, guid: &str) -> ApiError {
    tracing::error!(%guid, %error, "Request failed");
    ApiError::unknown()
}

pub(crate) fn new_guid() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) type Rendered<T> = Result<(StatusCode, Json<T>), ApiError>;

pub(crate) fn ok<T>(view: T) -> Rendered<T> {
    Ok((StatusCode::OK, Json(view)))
}

pub(crate) fn created<T>(view: T) -> Rendered<T> {
    Ok((StatusCode::CREATED, Json(view)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_api_shim_core::ResourceType;

    #[test]
    fn lookup_errors() {
        let err = lookup_error(Error::NotFound(ResourceType::App), "g");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.detail(), "App not found");

        let err = lookup_error(Error::PermissionDeniedOrNotFound(ResourceType::Space), "g");
        assert_eq!(err.detail(), "Space not found");

        let err = lookup_error(Error::DuplicateExists(ResourceType::App), "g");
        assert_eq!(err, ApiError::unknown());
    }

    #[test]
    fn parent_errors() {
        let err = parent_error(Error::NotFound(ResourceType::Space), INVALID_SPACE, "g");
        assert_eq!(err, ApiError::unprocessable(INVALID_SPACE));

        let err = parent_error(
            Error::PermissionDeniedOrNotFound(ResourceType::Space),
            INVALID_SPACE,
            "g",
        );
        assert_eq!(err, ApiError::unprocessable(INVALID_SPACE));

        let err = parent_error(Error::Unexpected(anyhow::anyhow!("boom")), INVALID_SPACE, "g");
        assert_eq!(err, ApiError::unknown());
    }

    #[test]
    fn create_errors() {
        let err = create_error(
            Error::UniquenessViolation {
                resource: ResourceType::App,
                message: "App with the name 'x' already exists.".to_string(),
            },
            "g",
        );
        assert_eq!(err, ApiError::uniqueness("App with the name 'x' already exists."));

        let err = create_error(Error::ValidationFailure("bad".to_string()), "g");
        assert_eq!(err, ApiError::unprocessable("bad"));

        let err = create_error(Error::NotFound(ResourceType::App), "g");
        assert_eq!(err, ApiError::unknown());
    }
}
