use crate::{
    cluster::{ClusterClient, Selector},
    meta,
};
use cf_api_shim_core::{
    HealthCheck, HealthCheckData, ProcessRecord, ResourceType, Result, ScaleMessage,
};
use cf_api_shim_k8s_api::{labels, CFProcess};
use serde_json::json;

#[derive(Clone, Debug)]
pub struct ProcessRepo {
    client: ClusterClient,
}

impl ProcessRepo {
    pub fn new(client: ClusterClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, guid: &str) -> Result<ProcessRecord> {
        let process =
            meta::find_by_guid::<CFProcess>(&self.client, ResourceType::Process, guid).await?;
        Ok(to_record(process))
    }

    /// Lists the processes of an app, found by the app GUID label in the
    /// app's space.
    pub async fn list_for_app(&self, app_guid: &str, space_guid: &str) -> Result<Vec<ProcessRecord>> {
        let selector = Selector::default().label_in(labels::APP_GUID, [app_guid]);
        let processes = self
            .client
            .list::<CFProcess>(Some(space_guid), &selector)
            .await
            .map_err(|e| meta::to_error(e, ResourceType::Process))?;
        let mut records = processes.into_iter().map(to_record).collect::<Vec<_>>();
        records.sort_by(|a, b| a.type_.cmp(&b.type_));
        Ok(records)
    }

    /// Applies the fields present in `message` to a process's scale. Fields
    /// the message omits keep their current values.
    pub async fn scale(
        &self,
        space_guid: &str,
        guid: &str,
        message: &ScaleMessage,
    ) -> Result<ProcessRecord> {
        let current = self
            .client
            .get::<CFProcess>(Some(space_guid), guid)
            .await
            .map_err(|e| meta::to_error(e, ResourceType::Process))?;
        if message.is_empty() {
            return Ok(to_record(current));
        }

        let mut spec = serde_json::Map::new();
        if let Some(instances) = message.instances {
            spec.insert("desiredInstances".to_string(), json!(instances));
        }
        if let Some(memory) = message.memory_mb {
            spec.insert("memoryMB".to_string(), json!(memory));
        }
        if let Some(disk) = message.disk_mb {
            spec.insert("diskQuotaMB".to_string(), json!(disk));
        }

        tracing::debug!(%guid, space = %space_guid, ?message, "Scaling process");
        let updated = self
            .client
            .patch::<CFProcess>(Some(space_guid), guid, json!({ "spec": spec }))
            .await
            .map_err(|e| meta::to_error(e, ResourceType::Process))?;
        Ok(to_record(updated))
    }
}

fn to_record(process: CFProcess) -> ProcessRecord {
    let spec = process.spec;
    ProcessRecord {
        guid: meta::guid(&process.metadata),
        space_guid: meta::namespace(&process.metadata),
        metadata: meta::user_metadata(&process.metadata),
        created_at: meta::created_at(&process.metadata),
        updated_at: meta::updated_at(&process.metadata),
        app_guid: spec.app_ref.name,
        type_: spec.process_type,
        command: spec.command,
        instances: spec.desired_instances,
        memory_mb: spec.memory_mb,
        disk_quota_mb: spec.disk_quota_mb,
        ports: spec.ports,
        health_check: HealthCheck {
            type_: spec.health_check.type_,
            data: HealthCheckData {
                timeout_seconds: spec.health_check.data.timeout_seconds,
                invocation_timeout_seconds: spec.health_check.data.invocation_timeout_seconds,
                http_endpoint: spec.health_check.data.http_endpoint,
            },
        },
    }
}
