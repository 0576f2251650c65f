use crate::{
    app::{lifecycle_from, lifecycle_to, non_empty},
    cluster::ClusterClient,
    meta,
};
use cf_api_shim_core::{BuildRecord, BuildState, DropletRecord, Error, ResourceType, Result};
use cf_api_shim_k8s_api::{
    labels,
    workloads::{CFBuildSpec, CFBuildStatus},
    CFBuild, LocalObjectReference, ObjectMeta,
};

#[derive(Clone, Debug)]
pub struct BuildRepo {
    client: ClusterClient,
}

impl BuildRepo {
    pub fn new(client: ClusterClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, record: &BuildRecord) -> Result<BuildRecord> {
        let mut build_labels = record.metadata.labels.clone();
        build_labels.insert(labels::APP_GUID.to_string(), record.app_guid.clone());
        build_labels.insert(labels::PACKAGE_GUID.to_string(), record.package_guid.clone());

        let build = CFBuild {
            metadata: ObjectMeta {
                name: Some(record.guid.clone()),
                namespace: Some(record.space_guid.clone()),
                labels: Some(build_labels),
                annotations: non_empty(&record.metadata.annotations),
                ..Default::default()
            },
            spec: CFBuildSpec {
                package_ref: LocalObjectReference {
                    name: record.package_guid.clone(),
                },
                app_ref: LocalObjectReference {
                    name: record.app_guid.clone(),
                },
                staging_memory_mb: record.staging_memory_mb,
                staging_disk_mb: record.staging_disk_mb,
                lifecycle: lifecycle_to(&record.lifecycle),
            },
            status: None,
        };

        tracing::debug!(guid = %record.guid, package = %record.package_guid, "Creating build");
        let created = self
            .client
            .create(&build)
            .await
            .map_err(|e| meta::to_error(e, ResourceType::Build))?;
        Ok(to_record(created))
    }

    pub async fn get(&self, guid: &str) -> Result<BuildRecord> {
        let build = meta::find_by_guid::<CFBuild>(&self.client, ResourceType::Build, guid).await?;
        Ok(to_record(build))
    }

    /// Droplets are not stored separately: a droplet is the output recorded
    /// on the status of the build with the same GUID, and does not exist
    /// until that build has staged.
    pub async fn get_droplet(&self, guid: &str) -> Result<DropletRecord> {
        let build = meta::find_by_guid::<CFBuild>(&self.client, ResourceType::Droplet, guid).await?;
        let droplet = build
            .status
            .as_ref()
            .and_then(|status| status.droplet.clone())
            .ok_or(Error::NotFound(ResourceType::Droplet))?;

        let lifecycle = lifecycle_from(build.spec.lifecycle);
        Ok(DropletRecord {
            guid: meta::guid(&build.metadata),
            metadata: meta::user_metadata(&build.metadata),
            created_at: meta::created_at(&build.metadata),
            updated_at: meta::updated_at(&build.metadata),
            stack: droplet.stack,
            lifecycle,
            image: droplet.registry.image,
            process_types: droplet
                .process_types
                .into_iter()
                .map(|pt| (pt.type_, pt.command))
                .collect(),
            ports: droplet.ports,
            app_guid: build.spec.app_ref.name,
            package_guid: build.spec.package_ref.name,
        })
    }
}

fn state(guid: &str, status: Option<&CFBuildStatus>) -> BuildState {
    let Some(status) = status else {
        return BuildState::Staging;
    };
    if status.droplet.is_some() {
        return BuildState::Staged {
            droplet_guid: guid.to_string(),
        };
    }
    match status.failure_message() {
        Some(error) => BuildState::Failed {
            error: error.to_string(),
        },
        None => BuildState::Staging,
    }
}

fn to_record(build: CFBuild) -> BuildRecord {
    let guid = meta::guid(&build.metadata);
    BuildRecord {
        state: state(&guid, build.status.as_ref()),
        space_guid: meta::namespace(&build.metadata),
        metadata: meta::user_metadata(&build.metadata),
        created_at: meta::created_at(&build.metadata),
        updated_at: meta::updated_at(&build.metadata),
        guid,
        staging_memory_mb: build.spec.staging_memory_mb,
        staging_disk_mb: build.spec.staging_disk_mb,
        lifecycle: lifecycle_from(build.spec.lifecycle),
        package_guid: build.spec.package_ref.name,
        app_guid: build.spec.app_ref.name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeCluster;
    use cf_api_shim_core::{LifecycleConfig, Metadata};
    use cf_api_shim_k8s_api::workloads::{
        BuildCondition, BuildDropletStatus, ProcessType, Registry, SUCCEEDED_CONDITION,
    };
    use maplit::btreemap;
    use pretty_assertions::assert_eq;

    fn record() -> BuildRecord {
        BuildRecord {
            guid: "build-1".to_string(),
            space_guid: "space-1".to_string(),
            state: BuildState::Staging,
            staging_memory_mb: 1024,
            staging_disk_mb: 2048,
            lifecycle: LifecycleConfig::default().default_lifecycle(),
            package_guid: "pkg-1".to_string(),
            app_guid: "app-1".to_string(),
            metadata: Metadata::default(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    async fn set_status(cluster: &FakeCluster, status: CFBuildStatus) {
        cluster
            .client()
            .patch::<CFBuild>(
                Some("space-1"),
                "build-1",
                serde_json::json!({ "status": status }),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn new_build_is_staging() {
        let cluster = FakeCluster::new();
        let repo = BuildRepo::new(cluster.client());
        let created = repo.create(&record()).await.unwrap();
        assert_eq!(created.state, BuildState::Staging);
        assert_eq!(created.staging_memory_mb, 1024);
        assert_eq!(created.staging_disk_mb, 2048);
        assert_eq!(created.lifecycle.data.stack, "cflinuxfs3");
        assert_eq!(repo.get("build-1").await.unwrap(), created);

        assert!(matches!(
            repo.get_droplet("build-1").await,
            Err(Error::NotFound(ResourceType::Droplet))
        ));
    }

    #[tokio::test]
    async fn staged_build_has_droplet() {
        let cluster = FakeCluster::new();
        let repo = BuildRepo::new(cluster.client());
        repo.create(&record()).await.unwrap();
        set_status(
            &cluster,
            CFBuildStatus {
                conditions: vec![BuildCondition {
                    type_: SUCCEEDED_CONDITION.to_string(),
                    status: "True".to_string(),
                    ..Default::default()
                }],
                droplet: Some(BuildDropletStatus {
                    registry: Registry {
                        image: "registry.example.com/droplets/build-1".to_string(),
                        image_pull_secrets: vec![],
                    },
                    stack: "cflinuxfs3".to_string(),
                    process_types: vec![ProcessType {
                        type_: "web".to_string(),
                        command: "bundle exec rackup".to_string(),
                    }],
                    ports: vec![8080],
                }),
            },
        )
        .await;

        let build = repo.get("build-1").await.unwrap();
        assert_eq!(
            build.state,
            BuildState::Staged {
                droplet_guid: "build-1".to_string()
            }
        );

        let droplet = repo.get_droplet("build-1").await.unwrap();
        assert_eq!(droplet.guid, "build-1");
        assert_eq!(droplet.image, "registry.example.com/droplets/build-1");
        assert_eq!(
            droplet.process_types,
            btreemap! { "web".to_string() => "bundle exec rackup".to_string() }
        );
        assert_eq!(droplet.app_guid, "app-1");
        assert_eq!(droplet.package_guid, "pkg-1");
    }

    #[tokio::test]
    async fn failed_build_reports_error() {
        let cluster = FakeCluster::new();
        let repo = BuildRepo::new(cluster.client());
        repo.create(&record()).await.unwrap();
        set_status(
            &cluster,
            CFBuildStatus {
                conditions: vec![BuildCondition {
                    type_: SUCCEEDED_CONDITION.to_string(),
                    status: "False".to_string(),
                    reason: "BuildpackFailed".to_string(),
                    message: "no buildpack detected".to_string(),
                }],
                droplet: None,
            },
        )
        .await;

        let build = repo.get("build-1").await.unwrap();
        assert_eq!(build.state.as_str(), "FAILED");
        assert_eq!(build.state.error(), Some("no buildpack detected"));
    }
}
