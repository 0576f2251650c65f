#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod hnc;
pub mod labels;
pub mod networking;
pub mod workloads;

pub use self::{
    hnc::SubnamespaceAnchor,
    networking::{CFDomain, CFRoute},
    workloads::{CFApp, CFBuild, CFPackage, CFProcess},
};
pub use k8s_openapi::{
    api::{
        core::v1::{Namespace, Secret},
        rbac::v1::{RoleBinding, RoleRef, Subject},
    },
    apimachinery::pkg::apis::meta::v1::Time,
    ByteString,
};
pub use kube::{
    api::{ObjectMeta, ResourceExt},
    core::{ApiResource, DynamicObject, TypeMeta},
    Resource,
};

/// References another object in the same namespace by name.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct LocalObjectReference {
    pub name: String,
}
