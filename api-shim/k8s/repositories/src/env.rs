use crate::{
    cluster::{ClusterClient, ClusterError},
    meta,
};
use cf_api_shim_core::{AppRecord, EnvVarsRecord, Error, ResourceType, Result};
use cf_api_shim_k8s_api::{labels, ByteString, ObjectMeta, Secret};
use maplit::btreemap;
use std::collections::BTreeMap;

/// An app's environment variables live in an opaque secret named after the
/// app.
#[derive(Clone, Debug)]
pub struct EnvRepo {
    client: ClusterClient,
}

impl EnvRepo {
    pub fn new(client: ClusterClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, record: &EnvVarsRecord) -> Result<EnvVarsRecord> {
        let secret = Secret {
            metadata: ObjectMeta {
                name: Some(record.name.clone()),
                namespace: Some(record.space_guid.clone()),
                labels: Some(btreemap! {
                    labels::APP_GUID.to_string() => record.app_guid.clone(),
                }),
                ..Default::default()
            },
            type_: Some("Opaque".to_string()),
            data: Some(
                record
                    .environment_variables
                    .iter()
                    .map(|(k, v)| (k.clone(), ByteString(v.as_bytes().to_vec())))
                    .collect(),
            ),
            ..Default::default()
        };

        tracing::debug!(app = %record.app_guid, name = %record.name, "Creating environment variables");
        let created = self
            .client
            .create(&secret)
            .await
            .map_err(|e| meta::to_error(e, ResourceType::EnvVars))?;
        Ok(to_record(&record.app_guid, created))
    }

    /// Returns an app's environment variables. An app whose secret has not
    /// been written yet has none.
    pub async fn get(&self, app: &AppRecord) -> Result<EnvVarsRecord> {
        let name = secret_name(app);
        match self.client.get::<Secret>(Some(&app.space_guid), &name).await {
            Ok(secret) => Ok(to_record(&app.guid, secret)),
            Err(error) => match meta::to_error(error, ResourceType::EnvVars) {
                Error::NotFound(_) => Ok(EnvVarsRecord {
                    app_guid: app.guid.clone(),
                    space_guid: app.space_guid.clone(),
                    name,
                    environment_variables: BTreeMap::new(),
                }),
                error => Err(error),
            },
        }
    }

    /// Merges `changes` into an app's environment variables. A `None` value
    /// removes the variable. The secret is created if it does not exist.
    pub async fn patch(
        &self,
        app: &AppRecord,
        changes: &BTreeMap<String, Option<String>>,
    ) -> Result<EnvVarsRecord> {
        let name = secret_name(app);
        match self.client.get::<Secret>(Some(&app.space_guid), &name).await {
            Ok(_) => {}
            Err(ClusterError::NotFound) => {
                let mut vars = BTreeMap::new();
                apply(&mut vars, changes);
                return self
                    .create(&EnvVarsRecord {
                        app_guid: app.guid.clone(),
                        space_guid: app.space_guid.clone(),
                        name,
                        environment_variables: vars,
                    })
                    .await;
            }
            Err(error) => return Err(meta::to_error(error, ResourceType::EnvVars)),
        }

        let data = changes
            .iter()
            .map(|(k, v)| -> Result<(String, serde_json::Value)> {
                let value = match v {
                    Some(v) => serde_json::to_value(ByteString(v.as_bytes().to_vec()))
                        .map_err(|e| Error::Unexpected(e.into()))?,
                    None => serde_json::Value::Null,
                };
                Ok((k.clone(), value))
            })
            .collect::<Result<serde_json::Map<_, _>>>()?;

        tracing::debug!(app = %app.guid, changed = changes.len(), "Patching environment variables");
        let updated = self
            .client
            .patch::<Secret>(
                Some(&app.space_guid),
                &name,
                serde_json::json!({ "data": data }),
            )
            .await
            .map_err(|e| meta::to_error(e, ResourceType::EnvVars))?;
        Ok(to_record(&app.guid, updated))
    }
}

fn secret_name(app: &AppRecord) -> String {
    if app.env_secret_name.is_empty() {
        AppRecord::env_secret_name_for(&app.guid)
    } else {
        app.env_secret_name.clone()
    }
}

fn apply(vars: &mut BTreeMap<String, String>, changes: &BTreeMap<String, Option<String>>) {
    for (k, v) in changes {
        match v {
            Some(v) => {
                vars.insert(k.clone(), v.clone());
            }
            None => {
                vars.remove(k);
            }
        }
    }
}

fn to_record(app_guid: &str, secret: Secret) -> EnvVarsRecord {
    EnvVarsRecord {
        app_guid: app_guid.to_string(),
        space_guid: meta::namespace(&secret.metadata),
        name: meta::guid(&secret.metadata),
        environment_variables: secret
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k, String::from_utf8_lossy(&v.0).into_owned()))
            .collect(),
    }
}
