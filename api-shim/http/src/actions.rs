//! Operations that span more than one repository.

use cf_api_shim_core::{Error, ProcessRecord, ResourceType, Result, ScaleMessage};
use cf_api_shim_k8s_repositories::{AppRepo, ProcessRepo};

/// Scales the process of a given type belonging to an app.
///
/// Every failure is returned unchanged; a missing app is `NotFound(App)` and
/// an app without a process of the type is `NotFound(Process)`. The only
/// mutation is the final scale, so a failed attempt leaves nothing to undo.
pub async fn scale_app_process(
    apps: &AppRepo,
    processes: &ProcessRepo,
    app_guid: &str,
    process_type: &str,
    message: &ScaleMessage,
) -> Result<ProcessRecord> {
    let app = apps.get(app_guid).await?;
    let process = processes
        .list_for_app(&app.guid, &app.space_guid)
        .await?
        .into_iter()
        .find(|p| p.type_ == process_type)
        .ok_or(Error::NotFound(ResourceType::Process))?;

    let current = processes.get(&process.guid).await?;
    tracing::debug!(app = %app.guid, process = %current.guid, %process_type, "Scaling app process");
    processes
        .scale(&current.space_guid, &current.guid, message)
        .await
}

/// Scales a single process by GUID.
pub async fn scale_process(
    processes: &ProcessRepo,
    guid: &str,
    message: &ScaleMessage,
) -> Result<ProcessRecord> {
    let current = processes.get(guid).await?;
    processes
        .scale(&current.space_guid, &current.guid, message)
        .await
}
