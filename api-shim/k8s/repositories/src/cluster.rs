use async_trait::async_trait;
use cf_api_shim_k8s_api::{ApiResource, DynamicObject, Resource, TypeMeta};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::Arc,
};
use thiserror::Error;

/// The narrow set of cluster operations the repositories need.
///
/// Objects cross this boundary untyped so that the trait stays object-safe;
/// [`ClusterClient`] layers typed access on top. A `None` namespace addresses
/// cluster-scoped resources or, for `list`, all namespaces.
#[async_trait]
pub trait Cluster: Send + Sync + 'static {
    async fn list(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        selector: &Selector,
    ) -> Result<Vec<DynamicObject>, ClusterError>;

    async fn get(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<DynamicObject, ClusterError>;

    async fn create(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        object: DynamicObject,
    ) -> Result<DynamicObject, ClusterError>;

    /// Applies a JSON merge patch.
    async fn patch(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
        patch: serde_json::Value,
    ) -> Result<DynamicObject, ClusterError>;

    async fn delete(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<(), ClusterError>;
}

/// Types that can be read from and written to the cluster.
pub trait Object: Resource<DynamicType = ()> + Serialize + DeserializeOwned + Send {}

impl<K> Object for K where K: Resource<DynamicType = ()> + Serialize + DeserializeOwned + Send {}

/// Typed access to a [`Cluster`]. Cheap to clone.
#[derive(Clone)]
pub struct ClusterClient(Arc<dyn Cluster>);

/// Label requirements of the form `key in (v1, v2)`, all of which must hold.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    requirements: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("object not found")]
    NotFound,

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("object already exists")]
    AlreadyExists,

    #[error("denied by admission webhook: {0}")]
    Denied(Denial),

    #[error("failed to convert object: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Other(anyhow::Error),
}

/// The structured reason an admission webhook gives when it rejects a write.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Denial {
    pub code: i64,
    pub message: String,
}

// === impl ClusterClient ===

impl ClusterClient {
    pub fn new(cluster: Arc<dyn Cluster>) -> Self {
        Self(cluster)
    }

    pub async fn list<K: Object>(
        &self,
        namespace: Option<&str>,
        selector: &Selector,
    ) -> Result<Vec<K>, ClusterError> {
        let resource = ApiResource::erase::<K>(&());
        self.0
            .list(&resource, namespace, selector)
            .await?
            .into_iter()
            .map(from_dynamic)
            .collect()
    }

    pub async fn get<K: Object>(&self, namespace: Option<&str>, name: &str) -> Result<K, ClusterError> {
        let resource = ApiResource::erase::<K>(&());
        let object = self.0.get(&resource, namespace, name).await?;
        from_dynamic(object)
    }

    /// Creates `object` in the namespace named by its metadata.
    pub async fn create<K: Object>(&self, object: &K) -> Result<K, ClusterError> {
        let resource = ApiResource::erase::<K>(&());
        let namespace = object.meta().namespace.clone();
        let object = to_dynamic(&resource, object)?;
        let created = self
            .0
            .create(&resource, namespace.as_deref(), object)
            .await?;
        from_dynamic(created)
    }

    pub async fn patch<K: Object>(
        &self,
        namespace: Option<&str>,
        name: &str,
        patch: serde_json::Value,
    ) -> Result<K, ClusterError> {
        let resource = ApiResource::erase::<K>(&());
        let patched = self.0.patch(&resource, namespace, name, patch).await?;
        from_dynamic(patched)
    }

    pub async fn delete<K: Object>(&self, namespace: Option<&str>, name: &str) -> Result<(), ClusterError> {
        let resource = ApiResource::erase::<K>(&());
        self.0.delete(&resource, namespace, name).await
    }
}

impl fmt::Debug for ClusterClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterClient").finish_non_exhaustive()
    }
}

pub(crate) fn to_dynamic<K: Object>(resource: &ApiResource, object: &K) -> Result<DynamicObject, ClusterError> {
    let mut object: DynamicObject = serde_json::from_value(serde_json::to_value(object)?)?;
    object.types = Some(TypeMeta {
        api_version: resource.api_version.clone(),
        kind: resource.kind.clone(),
    });
    Ok(object)
}

pub(crate) fn from_dynamic<K: Object>(object: DynamicObject) -> Result<K, ClusterError> {
    let value = serde_json::to_value(object)?;
    Ok(serde_json::from_value(value)?)
}

// === impl Selector ===

impl Selector {
    /// Requires the label `key` to hold one of `values`. Adding no values
    /// leaves the selector unchanged, so an empty filter selects everything.
    pub fn label_in<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect::<BTreeSet<_>>();
        if !values.is_empty() {
            self.requirements.entry(key.into()).or_default().extend(values);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn matches(&self, labels: Option<&BTreeMap<String, String>>) -> bool {
        self.requirements.iter().all(|(key, values)| {
            labels
                .and_then(|labels| labels.get(key))
                .map(|v| values.contains(v))
                .unwrap_or(false)
        })
    }

    /// Renders the selector in the API server's set-based syntax.
    pub fn to_label_selector(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let reqs = self
            .requirements
            .iter()
            .map(|(key, values)| {
                let values = values.iter().map(String::as_str).collect::<Vec<_>>();
                format!("{key} in ({})", values.join(","))
            })
            .collect::<Vec<_>>();
        Some(reqs.join(","))
    }
}

// === impl Denial ===

impl Denial {
    pub const UNKNOWN: i64 = 1;
    pub const DUPLICATE_APP: i64 = 2;
    pub const DUPLICATE_ORG_NAME: i64 = 3;
    pub const DUPLICATE_SPACE_NAME: i64 = 4;
    pub const DUPLICATE_ROUTE: i64 = 5;

    const DENIED_PREFIX: &'static str = "denied the request: ";

    /// Extracts the JSON reason from an API server message such as
    /// `admission webhook "vcfapp.example" denied the request: {"code":2,...}`.
    pub fn parse(message: &str) -> Option<Self> {
        let (_, reason) = message.split_once(Self::DENIED_PREFIX)?;
        serde_json::from_str(reason.trim()).ok()
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(
            self.code,
            Self::DUPLICATE_APP
                | Self::DUPLICATE_ORG_NAME
                | Self::DUPLICATE_SPACE_NAME
                | Self::DUPLICATE_ROUTE
        )
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

// === impl ClusterError ===

impl From<kube::Error> for ClusterError {
    fn from(error: kube::Error) -> Self {
        let rsp = match error {
            kube::Error::Api(ref rsp) => rsp,
            error => return Self::Other(error.into()),
        };

        // Webhook rejections are reported as 400 or 403 depending on the
        // webhook, so they are recognized by their message first.
        if let Some(denial) = Denial::parse(&rsp.message) {
            return Self::Denied(denial);
        }

        match rsp.code {
            404 => Self::NotFound,
            401 | 403 => Self::Unauthorized(rsp.message.clone()),
            409 if rsp.reason == "AlreadyExists" => Self::AlreadyExists,
            _ => Self::Other(error.into()),
        }
    }
}
