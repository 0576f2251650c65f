use crate::{Lifecycle, Metadata};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildState {
    Staging,
    /// Staging succeeded and produced the droplet with the given GUID.
    Staged { droplet_guid: String },
    /// Staging failed with the given message.
    Failed { error: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildRecord {
    pub guid: String,
    pub space_guid: String,
    pub state: BuildState,
    pub staging_memory_mb: i64,
    pub staging_disk_mb: i64,
    pub lifecycle: Lifecycle,
    pub package_guid: String,
    pub app_guid: String,
    pub metadata: Metadata,
    pub created_at: String,
    pub updated_at: String,
}

/// The staged artifact of a successful build. It shares its build's GUID.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DropletRecord {
    pub guid: String,
    pub stack: String,
    pub lifecycle: Lifecycle,
    pub image: String,
    pub process_types: BTreeMap<String, String>,
    pub ports: Vec<i32>,
    pub app_guid: String,
    pub package_guid: String,
    pub metadata: Metadata,
    pub created_at: String,
    pub updated_at: String,
}

// === impl BuildState ===

impl BuildState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staging => "STAGING",
            Self::Staged { .. } => "STAGED",
            Self::Failed { .. } => "FAILED",
        }
    }

    pub fn droplet_guid(&self) -> Option<&str> {
        match self {
            Self::Staged { droplet_guid } => Some(droplet_guid),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error } => Some(error),
            _ => None,
        }
    }
}
