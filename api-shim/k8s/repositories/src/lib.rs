#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

//! Repositories translate domain records to and from the custom resources
//! that back them.
//!
//! Every repository is built from a [`ClusterClient`] that was created for
//! the request being served, so access to the cluster is always evaluated with
//! that request's credentials.

mod app;
mod build;
mod client;
mod cluster;
mod env;
mod factory;
#[cfg(any(test, feature = "test-util"))]
pub mod fake;
mod meta;
mod org;
mod package;
mod process;
mod role;
mod route;

pub use self::{
    app::{AppListFilter, AppRepo},
    build::BuildRepo,
    client::KubeCluster,
    cluster::{Cluster, ClusterClient, ClusterError, Denial, Object, Selector},
    env::EnvRepo,
    factory::{ClientFactory, KubeClientFactory},
    org::{OrgRepo, SpaceListFilter},
    package::PackageRepo,
    process::ProcessRepo,
    role::{RoleMappings, RoleRepo},
    route::{DomainRepo, RouteListFilter, RouteRepo},
};
