use crate::{app::non_empty, cluster::ClusterClient, meta};
use cf_api_shim_core::{PackageRecord, PackageState, ResourceType, Result};
use cf_api_shim_k8s_api::{
    labels,
    workloads::{CFPackageSpec, PackageSource, Registry},
    CFPackage, LocalObjectReference, ObjectMeta,
};

#[derive(Clone, Debug)]
pub struct PackageRepo {
    client: ClusterClient,
}

impl PackageRepo {
    pub fn new(client: ClusterClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, record: &PackageRecord) -> Result<PackageRecord> {
        let mut package_labels = record.metadata.labels.clone();
        package_labels.insert(labels::APP_GUID.to_string(), record.app_guid.clone());

        let package = CFPackage {
            metadata: ObjectMeta {
                name: Some(record.guid.clone()),
                namespace: Some(record.space_guid.clone()),
                labels: Some(package_labels),
                annotations: non_empty(&record.metadata.annotations),
                ..Default::default()
            },
            spec: CFPackageSpec {
                type_: record.type_.clone(),
                app_ref: LocalObjectReference {
                    name: record.app_guid.clone(),
                },
                source: PackageSource {
                    registry: Registry {
                        image: record.source_image_ref.clone(),
                        image_pull_secrets: Some(&record.registry_secret_name)
                            .filter(|name| !name.is_empty())
                            .map(|name| LocalObjectReference { name: name.clone() })
                            .into_iter()
                            .collect(),
                    },
                },
            },
        };

        tracing::debug!(guid = %record.guid, app = %record.app_guid, "Creating package");
        let created = self
            .client
            .create(&package)
            .await
            .map_err(|e| meta::to_error(e, ResourceType::Package))?;
        Ok(to_record(created))
    }

    pub async fn get(&self, guid: &str) -> Result<PackageRecord> {
        let package =
            meta::find_by_guid::<CFPackage>(&self.client, ResourceType::Package, guid).await?;
        Ok(to_record(package))
    }
}

fn to_record(package: CFPackage) -> PackageRecord {
    let registry = package.spec.source.registry;
    PackageRecord {
        guid: meta::guid(&package.metadata),
        space_guid: meta::namespace(&package.metadata),
        metadata: meta::user_metadata(&package.metadata),
        created_at: meta::created_at(&package.metadata),
        updated_at: meta::updated_at(&package.metadata),
        type_: package.spec.type_,
        app_guid: package.spec.app_ref.name,
        state: PackageState::from_source_image(&registry.image),
        source_image_ref: registry.image,
        registry_secret_name: registry
            .image_pull_secrets
            .into_iter()
            .next()
            .map(|s| s.name)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeCluster;
    use cf_api_shim_core::{package::BITS_PACKAGE_TYPE, Error, Metadata};
    use pretty_assertions::assert_eq;

    fn record() -> PackageRecord {
        PackageRecord {
            guid: "pkg-1".to_string(),
            type_: BITS_PACKAGE_TYPE.to_string(),
            app_guid: "app-1".to_string(),
            space_guid: "space-1".to_string(),
            state: PackageState::AwaitingUpload,
            source_image_ref: String::new(),
            registry_secret_name: "registry-creds".to_string(),
            metadata: Metadata::default(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[tokio::test]
    async fn create_awaits_upload() {
        let cluster = FakeCluster::new();
        let repo = PackageRepo::new(cluster.client());
        let created = repo.create(&record()).await.unwrap();
        assert_eq!(created.state, PackageState::AwaitingUpload);
        assert_eq!(created.registry_secret_name, "registry-creds");

        let stored = cluster.objects::<CFPackage>(Some("space-1"));
        assert_eq!(
            stored[0].metadata.labels.as_ref().and_then(|l| l.get(labels::APP_GUID)),
            Some(&"app-1".to_string())
        );
        assert_eq!(
            stored[0].spec.source.registry.image_pull_secrets,
            vec![LocalObjectReference {
                name: "registry-creds".to_string()
            }]
        );

        assert_eq!(repo.get("pkg-1").await.unwrap(), created);
    }

    #[tokio::test]
    async fn get_missing_package() {
        let repo = PackageRepo::new(FakeCluster::new().client());
        assert!(matches!(
            repo.get("pkg-1").await,
            Err(Error::NotFound(ResourceType::Package))
        ));
    }
}
