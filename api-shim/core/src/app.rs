use crate::{Lifecycle, Metadata};
use std::collections::BTreeMap;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DesiredState {
    Started,
    #[default]
    Stopped,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppRecord {
    pub guid: String,
    pub name: String,
    pub space_guid: String,
    pub state: DesiredState,
    pub lifecycle: Lifecycle,
    pub metadata: Metadata,
    pub env_secret_name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// An app's environment variables, stored as an opaque secret.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvVarsRecord {
    pub app_guid: String,
    pub space_guid: String,
    /// The name of the backing secret.
    pub name: String,
    pub environment_variables: BTreeMap<String, String>,
}

impl DesiredState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "STARTED",
            Self::Stopped => "STOPPED",
        }
    }
}

impl AppRecord {
    /// The name of the secret holding the environment variables of the app
    /// with the given GUID.
    pub fn env_secret_name_for(guid: &str) -> String {
        format!("{guid}-env")
    }
}
