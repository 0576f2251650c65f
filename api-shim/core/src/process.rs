use crate::Metadata;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessRecord {
    pub guid: String,
    pub space_guid: String,
    pub app_guid: String,
    pub type_: String,
    pub command: String,
    pub instances: i32,
    pub memory_mb: i64,
    pub disk_quota_mb: i64,
    pub ports: Vec<i32>,
    pub health_check: HealthCheck,
    pub metadata: Metadata,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HealthCheck {
    /// One of `port`, `http` or `process`.
    pub type_: String,
    pub data: HealthCheckData,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HealthCheckData {
    pub timeout_seconds: i64,
    pub invocation_timeout_seconds: i64,
    pub http_endpoint: String,
}

/// A partial update of a process's scale. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScaleMessage {
    pub instances: Option<i32>,
    pub memory_mb: Option<i64>,
    pub disk_mb: Option<i64>,
}

impl ScaleMessage {
    pub fn is_empty(&self) -> bool {
        self.instances.is_none() && self.memory_mb.is_none() && self.disk_mb.is_none()
    }
}
