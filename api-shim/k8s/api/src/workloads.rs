use crate::LocalObjectReference;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

pub const GROUP: &str = "workloads.cloudfoundry.org";

/// An application: the user-facing unit that owns processes, packages and
/// builds.
#[derive(Clone, Debug, Default, PartialEq, CustomResource, Deserialize, Serialize)]
#[kube(
    group = "workloads.cloudfoundry.org",
    version = "v1alpha1",
    kind = "CFApp",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct CFAppSpec {
    /// The app's name, unique within its space.
    pub name: String,

    pub desired_state: DesiredState,

    pub lifecycle: Lifecycle,

    /// Name of the opaque secret holding the app's environment variables.
    #[serde(default)]
    pub env_secret_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_droplet_ref: Option<LocalObjectReference>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum DesiredState {
    #[serde(rename = "STARTED")]
    Started,
    #[default]
    #[serde(rename = "STOPPED")]
    Stopped,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Lifecycle {
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(default)]
    pub data: LifecycleData,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LifecycleData {
    #[serde(default)]
    pub buildpacks: Vec<String>,

    #[serde(default)]
    pub stack: String,
}

/// A process type of an app (e.g. `web`) and its desired scale.
#[derive(Clone, Debug, Default, PartialEq, CustomResource, Deserialize, Serialize)]
#[kube(
    group = "workloads.cloudfoundry.org",
    version = "v1alpha1",
    kind = "CFProcess",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct CFProcessSpec {
    pub app_ref: LocalObjectReference,

    pub process_type: String,

    #[serde(default)]
    pub command: String,

    #[serde(default)]
    pub health_check: HealthCheck,

    #[serde(default)]
    pub desired_instances: i32,

    #[serde(rename = "memoryMB", default)]
    pub memory_mb: i64,

    #[serde(rename = "diskQuotaMB", default)]
    pub disk_quota_mb: i64,

    #[serde(default)]
    pub ports: Vec<i32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthCheck {
    /// One of `port`, `http` or `process`.
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(default)]
    pub data: HealthCheckData,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckData {
    #[serde(default)]
    pub http_endpoint: String,

    #[serde(default)]
    pub invocation_timeout_seconds: i64,

    #[serde(default)]
    pub timeout_seconds: i64,
}

/// A unit of uploaded source code.
#[derive(Clone, Debug, Default, PartialEq, CustomResource, Deserialize, Serialize)]
#[kube(
    group = "workloads.cloudfoundry.org",
    version = "v1alpha1",
    kind = "CFPackage",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct CFPackageSpec {
    /// Only `bits` is supported.
    #[serde(rename = "type")]
    pub type_: String,

    pub app_ref: LocalObjectReference,

    #[serde(default)]
    pub source: PackageSource,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PackageSource {
    #[serde(default)]
    pub registry: Registry,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    /// The source image reference. Empty until bits have been uploaded.
    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub image_pull_secrets: Vec<LocalObjectReference>,
}

/// A request to stage a package into a droplet.
#[derive(Clone, Debug, Default, PartialEq, CustomResource, Deserialize, Serialize)]
#[kube(
    group = "workloads.cloudfoundry.org",
    version = "v1alpha1",
    kind = "CFBuild",
    namespaced,
    status = "CFBuildStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct CFBuildSpec {
    pub package_ref: LocalObjectReference,

    pub app_ref: LocalObjectReference,

    #[serde(rename = "stagingMemoryMB", default)]
    pub staging_memory_mb: i64,

    #[serde(rename = "stagingDiskMB", default)]
    pub staging_disk_mb: i64,

    pub lifecycle: Lifecycle,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CFBuildStatus {
    #[serde(default)]
    pub conditions: Vec<BuildCondition>,

    /// Set by the build reconciler once staging has succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub droplet: Option<BuildDropletStatus>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildCondition {
    #[serde(rename = "type")]
    pub type_: String,

    /// `True`, `False` or `Unknown`.
    pub status: String,

    #[serde(default)]
    pub reason: String,

    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDropletStatus {
    #[serde(default)]
    pub registry: Registry,

    #[serde(default)]
    pub stack: String,

    #[serde(default)]
    pub process_types: Vec<ProcessType>,

    #[serde(default)]
    pub ports: Vec<i32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProcessType {
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(default)]
    pub command: String,
}

pub const SUCCEEDED_CONDITION: &str = "Succeeded";

impl CFBuildStatus {
    /// Returns the failure message when the `Succeeded` condition is `False`.
    pub fn failure_message(&self) -> Option<&str> {
        self.conditions
            .iter()
            .find(|c| c.type_ == SUCCEEDED_CONDITION && c.status == "False")
            .map(|c| c.message.as_str())
    }
}
