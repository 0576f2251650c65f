use crate::LocalObjectReference;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// A route binds `host.domain/path` to a set of app process destinations.
#[derive(Clone, Debug, Default, PartialEq, CustomResource, Deserialize, Serialize)]
#[kube(
    group = "networking.cloudfoundry.org",
    version = "v1alpha1",
    kind = "CFRoute",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct CFRouteSpec {
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub path: String,

    pub protocol: String,

    pub domain_ref: DomainReference,

    #[serde(default)]
    pub destinations: Vec<Destination>,
}

/// Domains are cluster-scoped, so the reference carries only a name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DomainReference {
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub guid: String,

    #[serde(default)]
    pub port: i32,

    pub app_ref: LocalObjectReference,

    #[serde(default)]
    pub process_type: String,

    #[serde(default)]
    pub protocol: String,
}

#[derive(Clone, Debug, Default, PartialEq, CustomResource, Deserialize, Serialize)]
#[kube(
    group = "networking.cloudfoundry.org",
    version = "v1alpha1",
    kind = "CFDomain",
    schema = "disabled"
)]
pub struct CFDomainSpec {
    /// The DNS name routes are created under, e.g. `apps.example.com`.
    pub name: String,
}
