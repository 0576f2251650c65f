use serde::Deserialize;

pub const BUILDPACK_LIFECYCLE: &str = "buildpack";

/// Staging defaults stamped on apps and builds that do not specify their own.
///
/// Loaded from the `defaultLifecycleConfig` configuration key; any field left
/// out keeps its built-in default.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    #[serde(rename = "type")]
    pub type_: String,

    pub stack: String,

    #[serde(rename = "stagingMemoryMB")]
    pub staging_memory_mb: i64,

    #[serde(rename = "stagingDiskMB")]
    pub staging_disk_mb: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lifecycle {
    pub type_: String,
    pub data: LifecycleData,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LifecycleData {
    pub buildpacks: Vec<String>,
    pub stack: String,
}

// === impl LifecycleConfig ===

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            type_: BUILDPACK_LIFECYCLE.to_string(),
            stack: "cflinuxfs3".to_string(),
            staging_memory_mb: 1024,
            staging_disk_mb: 1024,
        }
    }
}

impl LifecycleConfig {
    /// The lifecycle given to resources created without one.
    pub fn default_lifecycle(&self) -> Lifecycle {
        Lifecycle {
            type_: self.type_.clone(),
            data: LifecycleData {
                buildpacks: Vec::new(),
                stack: self.stack.clone(),
            },
        }
    }
}
