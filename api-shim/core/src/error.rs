use std::fmt;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The kinds of resource the API serves, used to qualify errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceType {
    App,
    Process,
    Package,
    Build,
    Droplet,
    Route,
    Domain,
    Org,
    Space,
    Role,
    EnvVars,
}

/// Internal failure kinds. Handlers decide how each maps onto the HTTP error
/// taxonomy, since the same kind means different things on different
/// endpoints.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(ResourceType),

    /// The cluster refused access. Existence is not disclosed.
    #[error("{0} not found or permission denied")]
    PermissionDeniedOrNotFound(ResourceType),

    /// More than one object carries an identifier that must be unique.
    #[error("duplicate {0} records exist")]
    DuplicateExists(ResourceType),

    #[error("{resource} violates a uniqueness constraint: {message}")]
    UniquenessViolation {
        resource: ResourceType,
        message: String,
    },

    #[error("{0}")]
    ValidationFailure(String),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

// === impl ResourceType ===

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::App => "App",
            Self::Process => "Process",
            Self::Package => "Package",
            Self::Build => "Build",
            Self::Droplet => "Droplet",
            Self::Route => "Route",
            Self::Domain => "Domain",
            Self::Org => "Organization",
            Self::Space => "Space",
            Self::Role => "Role",
            Self::EnvVars => "Environment variables",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// === impl Error ===

impl Error {
    /// True for the kinds a handler treats as "the referenced resource is not
    /// usable", whether absent or hidden.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::PermissionDeniedOrNotFound(_))
    }
}
