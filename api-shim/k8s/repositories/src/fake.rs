//! An in-memory cluster for tests.
//!
//! The fake stores objects by resource, namespace and name and stamps the
//! metadata the API server would (uid, creation time, resource version and a
//! managed-fields entry per update). Admission checks and namespace-level
//! access denials can be configured to exercise the error paths.

use crate::{
    cluster::{from_dynamic, to_dynamic, Cluster, ClusterClient, ClusterError, Denial, Object, Selector},
    factory::ClientFactory,
};
use async_trait::async_trait;
use cf_api_shim_k8s_api::{ApiResource, CFApp, DynamicObject, Time, TypeMeta};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ManagedFieldsEntry;
use parking_lot::Mutex;
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

/// Inspects an object about to be created, given the objects of the same
/// resource already in its namespace.
pub type AdmissionCheck =
    dyn Fn(&ApiResource, &DynamicObject, &[DynamicObject]) -> Result<(), Denial> + Send + Sync;

#[derive(Clone, Default)]
pub struct FakeCluster {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    objects: BTreeMap<Key, DynamicObject>,
    forbidden: BTreeSet<String>,
    admission: Vec<Arc<AdmissionCheck>>,
    version: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Key {
    resource: String,
    namespace: String,
    name: String,
}

// === impl FakeCluster ===

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(&self) -> ClusterClient {
        ClusterClient::new(Arc::new(self.clone()))
    }

    /// Stores an object directly, bypassing admission. Metadata is stamped as
    /// on create unless the object already carries it.
    pub fn insert<K: Object>(&self, object: K) -> K {
        let resource = ApiResource::erase::<K>(&());
        let mut obj = to_dynamic(&resource, &object).expect("object must convert");
        let mut state = self.state.lock();
        state.stamp(&mut obj);
        let key = Key::new(&resource, obj.metadata.namespace.as_deref(), &name_of(&obj));
        state.objects.insert(key, obj.clone());
        from_dynamic(obj).expect("object must convert")
    }

    /// Returns the stored objects of a type, optionally limited to a
    /// namespace.
    pub fn objects<K: Object>(&self, namespace: Option<&str>) -> Vec<K> {
        let resource = ApiResource::erase::<K>(&());
        let state = self.state.lock();
        state
            .visible(&resource, namespace)
            .map(|obj| from_dynamic(obj.clone()).expect("object must convert"))
            .collect()
    }

    /// Denies all access to a namespace, as RBAC would.
    pub fn forbid_namespace(&self, namespace: impl Into<String>) {
        self.state.lock().forbidden.insert(namespace.into());
    }

    pub fn admit<F>(&self, check: F)
    where
        F: Fn(&ApiResource, &DynamicObject, &[DynamicObject]) -> Result<(), Denial>
            + Send
            + Sync
            + 'static,
    {
        self.state.lock().admission.push(Arc::new(check));
    }

    /// Rejects apps whose name is already taken in their namespace, as the
    /// app validating webhook does.
    pub fn unique_app_names(&self) {
        let apps = ApiResource::erase::<CFApp>(&());
        self.admit(move |resource, obj, existing| {
            if resource.plural != apps.plural || resource.group != apps.group {
                return Ok(());
            }
            let name = |o: &DynamicObject| o.data.pointer("/spec/name").cloned();
            if existing.iter().any(|o| name(o) == name(obj)) {
                return Err(Denial {
                    code: Denial::DUPLICATE_APP,
                    message: "CFApp with the same spec.name exists".to_string(),
                });
            }
            Ok(())
        });
    }

    fn check_access(&self, namespace: Option<&str>) -> Result<(), ClusterError> {
        match namespace {
            Some(ns) if self.state.lock().forbidden.contains(ns) => Err(ClusterError::Unauthorized(
                format!("access to namespace {ns} is forbidden"),
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Cluster for FakeCluster {
    async fn list(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        selector: &Selector,
    ) -> Result<Vec<DynamicObject>, ClusterError> {
        self.check_access(namespace)?;
        let state = self.state.lock();
        Ok(state
            .visible(resource, namespace)
            .filter(|obj| selector.matches(obj.metadata.labels.as_ref()))
            .cloned()
            .collect())
    }

    async fn get(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<DynamicObject, ClusterError> {
        self.check_access(namespace)?;
        let state = self.state.lock();
        state
            .objects
            .get(&Key::new(resource, namespace, name))
            .cloned()
            .ok_or(ClusterError::NotFound)
    }

    async fn create(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        mut object: DynamicObject,
    ) -> Result<DynamicObject, ClusterError> {
        self.check_access(namespace)?;
        let name = object
            .metadata
            .name
            .clone()
            .ok_or_else(|| ClusterError::Other(anyhow::anyhow!("metadata.name is required")))?;

        let mut state = self.state.lock();
        let key = Key::new(resource, namespace, &name);
        if state.objects.contains_key(&key) {
            return Err(ClusterError::AlreadyExists);
        }

        let siblings = state
            .visible(resource, Some(namespace.unwrap_or_default()))
            .cloned()
            .collect::<Vec<_>>();
        for check in &state.admission {
            check(resource, &object, &siblings).map_err(ClusterError::Denied)?;
        }

        object.metadata.namespace = namespace.map(Into::into);
        object.types = Some(TypeMeta {
            api_version: resource.api_version.clone(),
            kind: resource.kind.clone(),
        });
        state.stamp(&mut object);
        state.objects.insert(key, object.clone());
        Ok(object)
    }

    async fn patch(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
        patch: serde_json::Value,
    ) -> Result<DynamicObject, ClusterError> {
        self.check_access(namespace)?;
        let mut state = self.state.lock();
        let key = Key::new(resource, namespace, name);
        let current = state.objects.get(&key).ok_or(ClusterError::NotFound)?;

        let mut doc = serde_json::to_value(current)?;
        json_patch::merge(&mut doc, &patch);
        let mut object: DynamicObject = serde_json::from_value(doc)?;

        state.version += 1;
        object.metadata.resource_version = Some(state.version.to_string());
        object
            .metadata
            .managed_fields
            .get_or_insert_with(Vec::new)
            .push(ManagedFieldsEntry {
                manager: Some("cf-api-shim".to_string()),
                operation: Some("Update".to_string()),
                time: Some(now()),
                ..Default::default()
            });
        state.objects.insert(key, object.clone());
        Ok(object)
    }

    async fn delete(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<(), ClusterError> {
        self.check_access(namespace)?;
        let mut state = self.state.lock();
        state
            .objects
            .remove(&Key::new(resource, namespace, name))
            .map(|_| ())
            .ok_or(ClusterError::NotFound)
    }
}

impl ClientFactory for FakeCluster {
    fn build_client(&self, _authorization: Option<&str>) -> anyhow::Result<ClusterClient> {
        Ok(self.client())
    }
}

// === impl State ===

impl State {
    /// Objects of a resource in a namespace, or in every namespace that is
    /// not forbidden.
    fn visible<'s>(
        &'s self,
        resource: &ApiResource,
        namespace: Option<&'s str>,
    ) -> impl Iterator<Item = &'s DynamicObject> + 's {
        let resource = resource_key(resource);
        self.objects
            .iter()
            .filter(move |(key, _)| {
                key.resource == resource
                    && match namespace {
                        Some(ns) => key.namespace == ns,
                        None => !self.forbidden.contains(&key.namespace),
                    }
            })
            .map(|(_, obj)| obj)
    }

    fn stamp(&mut self, object: &mut DynamicObject) {
        self.version += 1;
        let meta = &mut object.metadata;
        meta.uid
            .get_or_insert_with(|| uuid::Uuid::new_v4().to_string());
        meta.creation_timestamp.get_or_insert_with(now);
        meta.resource_version = Some(self.version.to_string());
    }
}

// === impl Key ===

impl Key {
    fn new(resource: &ApiResource, namespace: Option<&str>, name: &str) -> Self {
        Self {
            resource: resource_key(resource),
            namespace: namespace.unwrap_or_default().to_string(),
            name: name.to_string(),
        }
    }
}

fn resource_key(resource: &ApiResource) -> String {
    format!("{}/{}", resource.api_version, resource.plural)
}

fn name_of(object: &DynamicObject) -> String {
    object.metadata.name.clone().unwrap_or_default()
}

fn now() -> Time {
    let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    serde_json::from_value(serde_json::Value::String(ts)).expect("timestamp must parse")
}
