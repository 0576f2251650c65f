use kube::api::ObjectMeta;
use serde::{Deserialize, Serialize};

/// A hierarchical-namespace anchor. Creating one in a parent namespace causes
/// a child namespace with the anchor's name to be created.
///
/// Anchors carry no spec, so the type implements the k8s-openapi traits by
/// hand rather than through the `CustomResource` derive, which requires one.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SubnamespaceAnchor {
    pub metadata: ObjectMeta,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SubnamespaceAnchorStatus>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubnamespaceAnchorStatus {
    /// One of `Ok`, `Missing`, `Conflict` or `Forbidden`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl k8s_openapi::Resource for SubnamespaceAnchor {
    const API_VERSION: &'static str = "hnc.x-k8s.io/v1alpha2";
    const GROUP: &'static str = "hnc.x-k8s.io";
    const KIND: &'static str = "SubnamespaceAnchor";
    const VERSION: &'static str = "v1alpha2";
    const URL_PATH_SEGMENT: &'static str = "subnamespaceanchors";
    type Scope = k8s_openapi::NamespaceResourceScope;
}

impl k8s_openapi::Metadata for SubnamespaceAnchor {
    type Ty = ObjectMeta;

    fn metadata(&self) -> &Self::Ty {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Self::Ty {
        &mut self.metadata
    }
}

impl SubnamespaceAnchor {
    pub fn new(namespace: &str, name: &str, labels: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            metadata: ObjectMeta {
                namespace: Some(namespace.to_string()),
                name: Some(name.to_string()),
                labels: Some(labels.into_iter().collect()),
                ..Default::default()
            },
            status: None,
        }
    }
}
