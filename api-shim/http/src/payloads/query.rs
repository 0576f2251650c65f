//! List query parameters. Every filter is a comma-separated list; empty
//! elements are dropped and an empty list does not filter.

use super::comma_list;
use cf_api_shim_k8s_repositories::{AppListFilter, RouteListFilter, SpaceListFilter};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NamesQuery {
    pub names: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppListQuery {
    pub names: Option<String>,
    pub space_guids: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SpaceListQuery {
    pub names: Option<String>,
    pub organization_guids: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RouteListQuery {
    pub space_guids: Option<String>,
    pub domain_guids: Option<String>,
    pub hosts: Option<String>,
    pub paths: Option<String>,
}

impl NamesQuery {
    pub fn names(&self) -> Vec<String> {
        comma_list(self.names.as_deref())
    }
}

impl AppListQuery {
    pub fn to_filter(&self) -> AppListFilter {
        AppListFilter {
            names: comma_list(self.names.as_deref()),
            space_guids: comma_list(self.space_guids.as_deref()),
        }
    }
}

impl SpaceListQuery {
    pub fn to_filter(&self) -> SpaceListFilter {
        SpaceListFilter {
            organization_guids: comma_list(self.organization_guids.as_deref()),
            names: comma_list(self.names.as_deref()),
        }
    }
}

impl RouteListQuery {
    pub fn to_filter(&self) -> RouteListFilter {
        RouteListFilter {
            space_guids: comma_list(self.space_guids.as_deref()),
            domain_guids: comma_list(self.domain_guids.as_deref()),
            hosts: comma_list(self.hosts.as_deref()),
            paths: comma_list(self.paths.as_deref()),
        }
    }
}
