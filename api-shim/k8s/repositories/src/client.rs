use crate::cluster::{Cluster, ClusterError, Selector};
use async_trait::async_trait;
use cf_api_shim_k8s_api::{ApiResource, DynamicObject};
use kube::api::{Api, DeleteParams, ListParams, Patch, PatchParams, PostParams};

/// A [`Cluster`] backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeCluster {
    client: kube::Client,
}

impl KubeCluster {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    fn api(&self, resource: &ApiResource, namespace: Option<&str>) -> Api<DynamicObject> {
        match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, resource),
            None => Api::all_with(self.client.clone(), resource),
        }
    }
}

#[async_trait]
impl Cluster for KubeCluster {
    async fn list(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        selector: &Selector,
    ) -> Result<Vec<DynamicObject>, ClusterError> {
        let mut params = ListParams::default();
        if let Some(labels) = selector.to_label_selector() {
            params = params.labels(&labels);
        }
        tracing::trace!(kind = %resource.kind, ?namespace, selector = ?params.label_selector, "Listing");
        let list = self.api(resource, namespace).list(&params).await?;
        Ok(list.items)
    }

    async fn get(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<DynamicObject, ClusterError> {
        let obj = self.api(resource, namespace).get(name).await?;
        Ok(obj)
    }

    async fn create(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        object: DynamicObject,
    ) -> Result<DynamicObject, ClusterError> {
        tracing::debug!(kind = %resource.kind, ?namespace, name = ?object.metadata.name, "Creating");
        let obj = self
            .api(resource, namespace)
            .create(&PostParams::default(), &object)
            .await?;
        Ok(obj)
    }

    async fn patch(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
        patch: serde_json::Value,
    ) -> Result<DynamicObject, ClusterError> {
        tracing::debug!(kind = %resource.kind, ?namespace, %name, "Patching");
        let obj = self
            .api(resource, namespace)
            .patch(name, &PatchParams::default(), &Patch::Merge(patch))
            .await?;
        Ok(obj)
    }

    async fn delete(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<(), ClusterError> {
        tracing::debug!(kind = %resource.kind, ?namespace, %name, "Deleting");
        self.api(resource, namespace)
            .delete(name, &DeleteParams::default())
            .await?;
        Ok(())
    }
}
