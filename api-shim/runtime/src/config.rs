//! Configuration is read from a directory of YAML files.
//!
//! Files are read in lexical order of their names and merged key by key, so
//! a later file overrides the top-level keys it sets. Files whose names begin
//! with `.` are skipped; mounted config maps keep their data under such
//! names.

use cf_api_shim_core::LifecycleConfig;
use cf_api_shim_http::HandlerConfig;
use cf_api_shim_k8s_repositories::RoleMappings;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub server_url: String,
    pub server_port: u16,
    pub root_namespace: String,
    pub package_registry_secret_name: String,
    pub default_lifecycle_config: LifecycleConfig,
    pub auth_enabled: bool,
    pub role_mappings: RoleMappings,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{} must contain a mapping", .path.display())]
    NotAMapping { path: PathBuf },

    #[error("invalid configuration: {0}")]
    Invalid(#[source] serde_yaml::Error),

    #[error("missing required configuration key {0:?}")]
    Missing(&'static str),
}

// Unknown keys are ignored. `packageRegistryBase` is still accepted from
// deployed config maps but nothing is pushed to the registry.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Raw {
    #[serde(rename = "serverURL")]
    server_url: Option<String>,
    server_port: Option<u16>,
    root_namespace: Option<String>,
    package_registry_secret_name: String,
    default_lifecycle_config: Option<LifecycleConfig>,
    auth_enabled: bool,
    role_mappings: BTreeMap<String, ClusterRole>,
}

#[derive(Debug, Deserialize)]
struct ClusterRole {
    name: String,
}

// === impl Config ===

impl Config {
    pub fn load(dir: &Path) -> Result<Self, Error> {
        let merged = merge_dir(dir)?;
        Self::from_value(Value::Mapping(merged))
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        let raw = serde_yaml::from_value::<Raw>(value).map_err(Error::Invalid)?;
        Ok(Self {
            server_url: raw.server_url.ok_or(Error::Missing("serverURL"))?,
            server_port: raw.server_port.ok_or(Error::Missing("serverPort"))?,
            root_namespace: raw.root_namespace.ok_or(Error::Missing("rootNamespace"))?,
            package_registry_secret_name: raw.package_registry_secret_name,
            default_lifecycle_config: raw.default_lifecycle_config.unwrap_or_default(),
            auth_enabled: raw.auth_enabled,
            role_mappings: raw
                .role_mappings
                .into_iter()
                .map(|(role, cluster_role)| (role, cluster_role.name))
                .collect(),
        })
    }

    pub fn handler_config(&self) -> HandlerConfig {
        HandlerConfig {
            server_url: self.server_url.clone(),
            root_namespace: self.root_namespace.clone(),
            lifecycle: self.default_lifecycle_config.clone(),
            package_registry_secret_name: self.package_registry_secret_name.clone(),
            role_mappings: Arc::new(self.role_mappings.clone()),
            auth_enabled: self.auth_enabled,
        }
    }
}

fn merge_dir(dir: &Path) -> Result<Mapping, Error> {
    let mut paths = std::fs::read_dir(dir)
        .map_err(read_error(dir))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error(dir))?;
    paths.retain(|path| {
        path.is_file()
            && !path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'))
    });
    paths.sort();

    let mut merged = Mapping::new();
    for path in paths {
        let contents = std::fs::read_to_string(&path).map_err(read_error(&path))?;
        let value = serde_yaml::from_str::<Value>(&contents).map_err(|source| Error::Parse {
            path: path.clone(),
            source,
        })?;
        match value {
            Value::Mapping(mapping) => {
                tracing::debug!(path = %path.display(), keys = mapping.len(), "Read configuration file");
                merged.extend(mapping);
            }
            Value::Null => {}
            _ => return Err(Error::NotAMapping { path }),
        }
    }
    Ok(merged)
}

fn read_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error {
    let path = path.to_path_buf();
    move |source| Error::Read { path, source }
}
