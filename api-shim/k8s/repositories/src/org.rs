use crate::{
    cluster::{ClusterClient, Selector},
    meta,
};
use cf_api_shim_core::{Error, Metadata, OrgRecord, ResourceType, Result, SpaceRecord};
use cf_api_shim_k8s_api::{labels, SubnamespaceAnchor};

/// Organizations and spaces are hierarchical namespaces. An org is an anchor
/// in the root namespace and a space is an anchor in its org's namespace; in
/// both cases the anchor's name is the GUID and names the child namespace.
#[derive(Clone, Debug)]
pub struct OrgRepo {
    client: ClusterClient,
    root_namespace: String,
}

/// Narrows a space listing. Empty lists do not filter.
#[derive(Clone, Debug, Default)]
pub struct SpaceListFilter {
    pub organization_guids: Vec<String>,
    pub names: Vec<String>,
}

impl OrgRepo {
    pub fn new(client: ClusterClient, root_namespace: impl Into<String>) -> Self {
        Self {
            client,
            root_namespace: root_namespace.into(),
        }
    }

    pub async fn create_org(&self, record: &OrgRecord) -> Result<OrgRecord> {
        let mut anchor = new_anchor(
            &self.root_namespace,
            &record.guid,
            (labels::ORG_NAME, &record.name),
            &record.metadata,
        );
        if record.suspended {
            anchor
                .metadata
                .annotations
                .get_or_insert_with(Default::default)
                .insert(labels::ORG_SUSPENDED.to_string(), "true".to_string());
        }
        tracing::debug!(guid = %record.guid, name = %record.name, "Creating organization");
        let created = self.client.create(&anchor).await.map_err(|error| {
            match meta::to_error(error, ResourceType::Org) {
                Error::UniquenessViolation { resource, .. } => Error::UniquenessViolation {
                    resource,
                    message: format!("Organization with the name '{}' already exists.", record.name),
                },
                error => error,
            }
        })?;
        Ok(to_org_record(created))
    }

    /// Lists organizations, optionally limited to the given names.
    pub async fn list_orgs(&self, names: &[String]) -> Result<Vec<OrgRecord>> {
        let selector = Selector::default().label_in(labels::ORG_NAME, names.iter().cloned());
        let anchors = self
            .client
            .list::<SubnamespaceAnchor>(Some(&self.root_namespace), &selector)
            .await
            .map_err(|e| meta::to_error(e, ResourceType::Org))?;
        let mut records = anchors
            .into_iter()
            .filter(|a| org_name(a).is_some())
            .map(to_org_record)
            .collect::<Vec<_>>();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.guid.cmp(&b.guid)));
        Ok(records)
    }

    pub async fn get_org(&self, guid: &str) -> Result<OrgRecord> {
        let anchor = self
            .client
            .get::<SubnamespaceAnchor>(Some(&self.root_namespace), guid)
            .await
            .map_err(|e| meta::to_error(e, ResourceType::Org))?;
        if org_name(&anchor).is_none() {
            return Err(Error::NotFound(ResourceType::Org));
        }
        Ok(to_org_record(anchor))
    }

    /// Removes an organization's anchor. The hierarchy controller then deletes
    /// the org namespace along with its spaces.
    pub async fn delete_org(&self, guid: &str) -> Result<()> {
        self.get_org(guid).await?;
        tracing::debug!(%guid, "Deleting organization");
        self.client
            .delete::<SubnamespaceAnchor>(Some(&self.root_namespace), guid)
            .await
            .map_err(|e| meta::to_error(e, ResourceType::Org))
    }

    /// Creates a space anchor in its organization's namespace.
    pub async fn create_space(&self, record: &SpaceRecord) -> Result<SpaceRecord> {
        let anchor = new_anchor(
            &record.organization_guid,
            &record.guid,
            (labels::SPACE_NAME, &record.name),
            &record.metadata,
        );
        tracing::debug!(guid = %record.guid, org = %record.organization_guid, name = %record.name, "Creating space");
        let created = self.client.create(&anchor).await.map_err(|error| {
            match meta::to_error(error, ResourceType::Space) {
                Error::UniquenessViolation { resource, .. } => Error::UniquenessViolation {
                    resource,
                    message: format!("Space with the name '{}' already exists.", record.name),
                },
                error => error,
            }
        })?;
        Ok(to_space_record(created))
    }

    pub async fn list_spaces(&self, filter: &SpaceListFilter) -> Result<Vec<SpaceRecord>> {
        let selector = Selector::default()
            .label_in(labels::SPACE_NAME, filter.names.iter().cloned());
        let anchors = self
            .client
            .list::<SubnamespaceAnchor>(None, &selector)
            .await
            .map_err(|e| meta::to_error(e, ResourceType::Space))?;
        let mut records = anchors
            .into_iter()
            .filter(|a| space_name(a).is_some())
            .filter(|a| {
                filter.organization_guids.is_empty()
                    || filter
                        .organization_guids
                        .contains(&meta::namespace(&a.metadata))
            })
            .map(to_space_record)
            .collect::<Vec<_>>();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.guid.cmp(&b.guid)));
        Ok(records)
    }

    pub async fn get_space(&self, guid: &str) -> Result<SpaceRecord> {
        let selector = Selector::default();
        let anchors = self
            .client
            .list::<SubnamespaceAnchor>(None, &selector)
            .await
            .map_err(|e| meta::to_error(e, ResourceType::Space))?;
        let anchor = meta::single(
            anchors
                .into_iter()
                .filter(|a| a.metadata.name.as_deref() == Some(guid) && space_name(a).is_some()),
            ResourceType::Space,
        )?;
        Ok(to_space_record(anchor))
    }

    pub async fn delete_space(&self, guid: &str) -> Result<()> {
        let space = self.get_space(guid).await?;
        tracing::debug!(%guid, org = %space.organization_guid, "Deleting space");
        self.client
            .delete::<SubnamespaceAnchor>(Some(&space.organization_guid), guid)
            .await
            .map_err(|e| meta::to_error(e, ResourceType::Space))
    }
}

/// Builds an anchor carrying the resource's name label alongside the user's
/// labels and annotations. Reserved user keys are dropped.
fn new_anchor(
    namespace: &str,
    guid: &str,
    (name_key, name): (&str, &str),
    metadata: &Metadata,
) -> SubnamespaceAnchor {
    let mut anchor_labels = meta::without_reserved(&metadata.labels);
    anchor_labels.insert(name_key.to_string(), name.to_string());
    let mut anchor = SubnamespaceAnchor::new(namespace, guid, anchor_labels);
    let annotations = meta::without_reserved(&metadata.annotations);
    if !annotations.is_empty() {
        anchor.metadata.annotations = Some(annotations);
    }
    anchor
}

fn label<'a>(anchor: &'a SubnamespaceAnchor, key: &str) -> Option<&'a str> {
    anchor
        .metadata
        .labels
        .as_ref()
        .and_then(|l| l.get(key))
        .map(String::as_str)
}

fn org_name(anchor: &SubnamespaceAnchor) -> Option<&str> {
    label(anchor, labels::ORG_NAME)
}

fn space_name(anchor: &SubnamespaceAnchor) -> Option<&str> {
    label(anchor, labels::SPACE_NAME)
}

fn to_org_record(anchor: SubnamespaceAnchor) -> OrgRecord {
    OrgRecord {
        guid: meta::guid(&anchor.metadata),
        name: org_name(&anchor).unwrap_or_default().to_string(),
        suspended: anchor
            .metadata
            .annotations
            .as_ref()
            .and_then(|a| a.get(labels::ORG_SUSPENDED))
            .is_some_and(|v| v == "true"),
        metadata: meta::user_metadata(&anchor.metadata),
        created_at: meta::created_at(&anchor.metadata),
        updated_at: meta::updated_at(&anchor.metadata),
    }
}

fn to_space_record(anchor: SubnamespaceAnchor) -> SpaceRecord {
    SpaceRecord {
        guid: meta::guid(&anchor.metadata),
        name: space_name(&anchor).unwrap_or_default().to_string(),
        organization_guid: meta::namespace(&anchor.metadata),
        metadata: meta::user_metadata(&anchor.metadata),
        created_at: meta::created_at(&anchor.metadata),
        updated_at: meta::updated_at(&anchor.metadata),
    }
}
