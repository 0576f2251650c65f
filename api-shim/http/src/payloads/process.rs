use super::{Field, Kind, Payload};
use cf_api_shim_core::ScaleMessage;
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProcessScale {
    pub instances: Option<i32>,
    pub memory_in_mb: Option<i64>,
    pub disk_in_mb: Option<i64>,
}

impl Payload for ProcessScale {
    const FIELDS: &'static [Field] = &[
        Field::optional("instances", "Instances", Kind::Integer),
        Field::optional("memory_in_mb", "MemoryMB", Kind::Integer),
        Field::optional("disk_in_mb", "DiskMB", Kind::Integer),
    ];

    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.instances.is_some_and(|n| n < 0) {
            errors.push("Instances must be 0 or greater".to_string());
        }
        if self.memory_in_mb.is_some_and(|mb| mb <= 0) {
            errors.push("MemoryMB must be greater than 0".to_string());
        }
        if self.disk_in_mb.is_some_and(|mb| mb <= 0) {
            errors.push("DiskMB must be greater than 0".to_string());
        }
        errors
    }
}

impl ProcessScale {
    pub fn to_message(&self) -> ScaleMessage {
        ScaleMessage {
            instances: self.instances,
            memory_mb: self.memory_in_mb,
            disk_mb: self.disk_in_mb,
        }
    }
}
