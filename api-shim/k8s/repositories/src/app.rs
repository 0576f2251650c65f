use crate::{
    cluster::{ClusterClient, Selector},
    meta,
};
use cf_api_shim_core::{
    AppRecord, DesiredState, Error, Lifecycle, LifecycleData, ResourceType, Result,
};
use cf_api_shim_k8s_api::{
    workloads::{self, CFAppSpec},
    CFApp, ObjectMeta,
};
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct AppRepo {
    client: ClusterClient,
}

/// Narrows an app listing. Empty lists do not filter.
#[derive(Clone, Debug, Default)]
pub struct AppListFilter {
    pub names: Vec<String>,
    pub space_guids: Vec<String>,
}

impl AppRepo {
    pub fn new(client: ClusterClient) -> Self {
        Self { client }
    }

    /// Fetches an app by GUID from whichever space holds it.
    pub async fn get(&self, guid: &str) -> Result<AppRecord> {
        let app = meta::find_by_guid::<CFApp>(&self.client, ResourceType::App, guid).await?;
        Ok(to_record(app))
    }

    pub async fn list(&self, filter: &AppListFilter) -> Result<Vec<AppRecord>> {
        let apps = self
            .client
            .list::<CFApp>(None, &Selector::default())
            .await
            .map_err(|e| meta::to_error(e, ResourceType::App))?;
        let mut records = apps
            .into_iter()
            .filter(|app| filter.names.is_empty() || filter.names.contains(&app.spec.name))
            .filter(|app| {
                filter.space_guids.is_empty()
                    || filter.space_guids.contains(&meta::namespace(&app.metadata))
            })
            .map(to_record)
            .collect::<Vec<_>>();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.guid.cmp(&b.guid)));
        Ok(records)
    }

    /// Creates the app in its space's namespace. A name that is already taken
    /// in the space is rejected by the cluster as a uniqueness violation.
    pub async fn create(&self, record: &AppRecord) -> Result<AppRecord> {
        let app = CFApp {
            metadata: ObjectMeta {
                name: Some(record.guid.clone()),
                namespace: Some(record.space_guid.clone()),
                labels: non_empty(&record.metadata.labels),
                annotations: non_empty(&record.metadata.annotations),
                ..Default::default()
            },
            spec: CFAppSpec {
                name: record.name.clone(),
                desired_state: match record.state {
                    DesiredState::Started => workloads::DesiredState::Started,
                    DesiredState::Stopped => workloads::DesiredState::Stopped,
                },
                lifecycle: lifecycle_to(&record.lifecycle),
                env_secret_name: record.env_secret_name.clone(),
                current_droplet_ref: None,
            },
        };

        tracing::debug!(guid = %record.guid, space = %record.space_guid, name = %record.name, "Creating app");
        let created = self.client.create(&app).await.map_err(|error| {
            match meta::to_error(error, ResourceType::App) {
                Error::UniquenessViolation { resource, .. } => Error::UniquenessViolation {
                    resource,
                    message: format!("App with the name '{}' already exists.", record.name),
                },
                error => error,
            }
        })?;
        Ok(to_record(created))
    }
}

pub(crate) fn non_empty(map: &BTreeMap<String, String>) -> Option<BTreeMap<String, String>> {
    if map.is_empty() {
        None
    } else {
        Some(map.clone())
    }
}

pub(crate) fn lifecycle_from(lifecycle: workloads::Lifecycle) -> Lifecycle {
    Lifecycle {
        type_: lifecycle.type_,
        data: LifecycleData {
            buildpacks: lifecycle.data.buildpacks,
            stack: lifecycle.data.stack,
        },
    }
}

pub(crate) fn lifecycle_to(lifecycle: &Lifecycle) -> workloads::Lifecycle {
    workloads::Lifecycle {
        type_: lifecycle.type_.clone(),
        data: workloads::LifecycleData {
            buildpacks: lifecycle.data.buildpacks.clone(),
            stack: lifecycle.data.stack.clone(),
        },
    }
}

fn to_record(app: CFApp) -> AppRecord {
    AppRecord {
        guid: meta::guid(&app.metadata),
        space_guid: meta::namespace(&app.metadata),
        metadata: meta::user_metadata(&app.metadata),
        created_at: meta::created_at(&app.metadata),
        updated_at: meta::updated_at(&app.metadata),
        name: app.spec.name,
        state: match app.spec.desired_state {
            workloads::DesiredState::Started => DesiredState::Started,
            workloads::DesiredState::Stopped => DesiredState::Stopped,
        },
        lifecycle: lifecycle_from(app.spec.lifecycle),
        env_secret_name: app.spec.env_secret_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeCluster;
    use cf_api_shim_core::LifecycleConfig;
    use pretty_assertions::assert_eq;

    fn record(space: &str, guid: &str, name: &str) -> AppRecord {
        AppRecord {
            guid: guid.to_string(),
            name: name.to_string(),
            space_guid: space.to_string(),
            state: DesiredState::Stopped,
            lifecycle: LifecycleConfig::default().default_lifecycle(),
            env_secret_name: AppRecord::env_secret_name_for(guid),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_and_get() {
        let cluster = FakeCluster::new();
        let repo = AppRepo::new(cluster.client());

        let created = repo.create(&record("space-1", "app-1", "my-app")).await.unwrap();
        assert_eq!(created.guid, "app-1");
        assert_eq!(created.space_guid, "space-1");
        assert_eq!(created.env_secret_name, "app-1-env");
        assert!(!created.created_at.is_empty());
        assert_eq!(created.created_at, created.updated_at);

        let fetched = repo.get("app-1").await.unwrap();
        assert_eq!(fetched, created);

        let stored = cluster.objects::<CFApp>(Some("space-1"));
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].spec.lifecycle.type_, "buildpack");
        assert_eq!(stored[0].spec.lifecycle.data.stack, "cflinuxfs3");
    }

    #[tokio::test]
    async fn get_missing_app() {
        let repo = AppRepo::new(FakeCluster::new().client());
        assert!(matches!(
            repo.get("nope").await,
            Err(Error::NotFound(ResourceType::App))
        ));
    }

    #[tokio::test]
    async fn duplicate_guid_across_spaces() {
        let cluster = FakeCluster::new();
        let repo = AppRepo::new(cluster.client());
        repo.create(&record("space-1", "app-1", "a")).await.unwrap();
        repo.create(&record("space-2", "app-1", "b")).await.unwrap();
        assert!(matches!(
            repo.get("app-1").await,
            Err(Error::DuplicateExists(ResourceType::App))
        ));
    }

    #[tokio::test]
    async fn duplicate_name_in_space() {
        let cluster = FakeCluster::new();
        cluster.unique_app_names();
        let repo = AppRepo::new(cluster.client());
        repo.create(&record("space-1", "app-1", "my-app")).await.unwrap();

        match repo.create(&record("space-1", "app-2", "my-app")).await {
            Err(Error::UniquenessViolation { resource, message }) => {
                assert_eq!(resource, ResourceType::App);
                assert_eq!(message, "App with the name 'my-app' already exists.");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_filters() {
        let cluster = FakeCluster::new();
        let repo = AppRepo::new(cluster.client());
        repo.create(&record("space-1", "app-1", "a")).await.unwrap();
        repo.create(&record("space-1", "app-2", "b")).await.unwrap();
        repo.create(&record("space-2", "app-3", "a")).await.unwrap();

        let guids = |apps: Vec<AppRecord>| {
            let mut guids = apps.into_iter().map(|a| a.guid).collect::<Vec<_>>();
            guids.sort();
            guids
        };

        let all = repo.list(&AppListFilter::default()).await.unwrap();
        assert_eq!(guids(all), vec!["app-1", "app-2", "app-3"]);

        let named = repo
            .list(&AppListFilter {
                names: vec!["a".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(guids(named), vec!["app-1", "app-3"]);

        let in_space = repo
            .list(&AppListFilter {
                names: vec!["a".to_string()],
                space_guids: vec!["space-2".to_string()],
            })
            .await
            .unwrap();
        assert_eq!(guids(in_space), vec!["app-3"]);
    }

    #[tokio::test]
    async fn forbidden_space_hides_app() {
        let cluster = FakeCluster::new();
        let repo = AppRepo::new(cluster.client());
        repo.create(&record("space-1", "app-1", "my-app")).await.unwrap();
        cluster.forbid_namespace("space-1");
        assert!(repo.get("app-1").await.unwrap_err().is_not_found());
    }
}
