#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

//! Domain records exchanged between the repositories and the HTTP handlers.
//!
//! Records are deliberately plain: they carry the API's view of a resource
//! and know nothing about the cluster objects that back them.

pub mod app;
pub mod build;
mod error;
mod lifecycle;
pub mod package;
pub mod process;
pub mod route;
pub mod tenancy;

pub use self::{
    app::{AppRecord, DesiredState, EnvVarsRecord},
    build::{BuildRecord, BuildState, DropletRecord},
    error::{Error, ResourceType, Result},
    lifecycle::{Lifecycle, LifecycleConfig, LifecycleData, BUILDPACK_LIFECYCLE},
    package::{PackageRecord, PackageState},
    process::{HealthCheck, HealthCheckData, ProcessRecord, ScaleMessage},
    route::{Destination, DomainRecord, DomainRef, RouteRecord},
    tenancy::{OrgRecord, RoleRecord, RoleType, SpaceRecord},
};

use std::collections::BTreeMap;

/// User-supplied labels and annotations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}
