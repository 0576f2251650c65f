use super::{Field, Kind, MetadataPayload, Payload, Relationship, METADATA, RELATIONSHIP_DATA};
use cf_api_shim_core::{
    AppRecord, DesiredState, Lifecycle, LifecycleConfig, LifecycleData, BUILDPACK_LIFECYCLE,
};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppCreate {
    pub name: String,
    pub relationships: AppRelationships,
    pub lifecycle: Option<LifecyclePayload>,
    pub environment_variables: Option<BTreeMap<String, String>>,
    pub metadata: MetadataPayload,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppRelationships {
    pub space: Relationship,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LifecyclePayload {
    #[serde(rename = "type")]
    pub type_: String,
    pub data: LifecycleDataPayload,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LifecycleDataPayload {
    pub buildpacks: Vec<String>,
    pub stack: String,
}

pub(super) const LIFECYCLE: Field = Field::optional(
    "lifecycle",
    "Lifecycle",
    Kind::Object(&[
        Field::required("type", "Type", Kind::String),
        Field::required(
            "data",
            "Data",
            Kind::Object(&[
                Field::optional("buildpacks", "Buildpacks", Kind::StringList),
                Field::optional("stack", "Stack", Kind::String),
            ]),
        ),
    ]),
);

impl Payload for AppCreate {
    const FIELDS: &'static [Field] = &[
        Field::required("name", "Name", Kind::String),
        Field::required(
            "relationships",
            "Relationships",
            Kind::Object(&[Field::required("space", "Space", Kind::Object(RELATIONSHIP_DATA))]),
        ),
        LIFECYCLE,
        Field::optional("environment_variables", "EnvironmentVariables", Kind::StringMap),
        METADATA,
    ];

    fn validate(&self) -> Vec<String> {
        self.lifecycle
            .iter()
            .filter_map(LifecyclePayload::validate)
            .collect()
    }
}

impl AppCreate {
    pub fn space_guid(&self) -> &str {
        &self.relationships.space.data.guid
    }

    pub fn to_record(&self, guid: &str, config: &LifecycleConfig) -> AppRecord {
        AppRecord {
            guid: guid.to_string(),
            name: self.name.clone(),
            space_guid: self.space_guid().to_string(),
            state: DesiredState::Stopped,
            lifecycle: match &self.lifecycle {
                Some(lifecycle) => lifecycle.to_lifecycle(config),
                None => config.default_lifecycle(),
            },
            metadata: self.metadata.to_metadata(),
            env_secret_name: AppRecord::env_secret_name_for(guid),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

// === impl LifecyclePayload ===

impl LifecyclePayload {
    /// Only the buildpack lifecycle is supported.
    pub(super) fn validate(&self) -> Option<String> {
        if !self.type_.is_empty() && self.type_ != BUILDPACK_LIFECYCLE {
            return Some(format!("Type must be one of [{BUILDPACK_LIFECYCLE}]"));
        }
        None
    }

    /// An omitted stack falls back to the configured default.
    pub(super) fn to_lifecycle(&self, config: &LifecycleConfig) -> Lifecycle {
        let stack = if self.data.stack.is_empty() {
            config.stack.clone()
        } else {
            self.data.stack.clone()
        };
        Lifecycle {
            type_: self.type_.clone(),
            data: LifecycleData {
                buildpacks: self.data.buildpacks.clone(),
                stack,
            },
        }
    }
}
