use crate::{cluster::ClusterClient, meta};
use cf_api_shim_core::{Error, ResourceType, Result, RoleRecord, RoleType};
use cf_api_shim_k8s_api::{labels, ObjectMeta, RoleBinding, RoleRef, Subject};
use maplit::btreemap;
use sha2::{Digest, Sha256};
use std::{collections::BTreeMap, sync::Arc};

/// Maps role type names (e.g. `space_developer`) to the cluster roles that
/// grant them.
pub type RoleMappings = BTreeMap<String, String>;

const RBAC_GROUP: &str = "rbac.authorization.k8s.io";

/// Roles are role bindings of a user to a mapped cluster role, in the
/// namespace of the space or organization the role applies to.
#[derive(Clone, Debug)]
pub struct RoleRepo {
    client: ClusterClient,
    mappings: Arc<RoleMappings>,
}

impl RoleRepo {
    pub fn new(client: ClusterClient, mappings: Arc<RoleMappings>) -> Self {
        Self { client, mappings }
    }

    /// The binding name is derived from the role type and user so that a user
    /// holds each role at most once per namespace.
    pub fn binding_name(type_: RoleType, user: &str) -> String {
        let digest = Sha256::digest(format!("{type_}::{user}").as_bytes());
        format!("cf-{}", hex::encode(digest))
    }

    pub async fn create(&self, record: &RoleRecord) -> Result<RoleRecord> {
        let cluster_role = self.mappings.get(record.type_.as_str()).ok_or_else(|| {
            Error::ValidationFailure(format!("Role type '{}' is not configured", record.type_))
        })?;
        let namespace = if record.type_.is_space_role() {
            record.space_guid.as_deref()
        } else {
            record.org_guid.as_deref()
        }
        .ok_or_else(|| {
            Error::ValidationFailure(format!("Role '{}' requires a target", record.type_))
        })?;

        let binding = RoleBinding {
            metadata: ObjectMeta {
                name: Some(Self::binding_name(record.type_, &record.user)),
                namespace: Some(namespace.to_string()),
                labels: Some(btreemap! {
                    labels::ROLE_GUID.to_string() => record.guid.clone(),
                    labels::ROLE_TYPE.to_string() => record.type_.to_string(),
                }),
                ..Default::default()
            },
            role_ref: RoleRef {
                api_group: RBAC_GROUP.to_string(),
                kind: "ClusterRole".to_string(),
                name: cluster_role.clone(),
            },
            subjects: Some(vec![Subject {
                api_group: Some(RBAC_GROUP.to_string()),
                kind: "User".to_string(),
                name: record.user.clone(),
                namespace: None,
            }]),
        };

        tracing::debug!(guid = %record.guid, role_type = %record.type_, %namespace, "Creating role binding");
        let created = self.client.create(&binding).await.map_err(|error| {
            match meta::to_error(error, ResourceType::Role) {
                Error::UniquenessViolation { resource, .. } => Error::UniquenessViolation {
                    resource,
                    message: format!(
                        "User '{}' already has '{}' role.",
                        record.user, record.type_
                    ),
                },
                error => error,
            }
        })?;

        Ok(RoleRecord {
            guid: record.guid.clone(),
            type_: record.type_,
            space_guid: record.space_guid.clone(),
            org_guid: record.org_guid.clone(),
            user: record.user.clone(),
            created_at: meta::created_at(&created.metadata),
            updated_at: meta::updated_at(&created.metadata),
        })
    }
}
