use super::{Field, Kind, MetadataPayload, Payload, Relationship, METADATA, RELATIONSHIP_DATA};
use cf_api_shim_core::{package::BITS_PACKAGE_TYPE, AppRecord, PackageRecord, PackageState};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PackageCreate {
    #[serde(rename = "type")]
    pub type_: String,
    pub relationships: PackageRelationships,
    pub metadata: MetadataPayload,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PackageRelationships {
    pub app: Relationship,
}

impl Payload for PackageCreate {
    const FIELDS: &'static [Field] = &[
        Field::required("type", "Type", Kind::String),
        Field::required(
            "relationships",
            "Relationships",
            Kind::Object(&[Field::required("app", "App", Kind::Object(RELATIONSHIP_DATA))]),
        ),
        METADATA,
    ];

    fn validate(&self) -> Vec<String> {
        if !self.type_.is_empty() && self.type_ != BITS_PACKAGE_TYPE {
            return vec![format!("Type must be one of [{BITS_PACKAGE_TYPE}]")];
        }
        Vec::new()
    }
}

impl PackageCreate {
    pub fn app_guid(&self) -> &str {
        &self.relationships.app.data.guid
    }

    /// A new package lives in its app's space and awaits an upload.
    pub fn to_record(&self, guid: &str, app: &AppRecord, registry_secret_name: &str) -> PackageRecord {
        PackageRecord {
            guid: guid.to_string(),
            type_: self.type_.clone(),
            app_guid: app.guid.clone(),
            space_guid: app.space_guid.clone(),
            state: PackageState::AwaitingUpload,
            source_image_ref: String::new(),
            registry_secret_name: registry_secret_name.to_string(),
            metadata: self.metadata.to_metadata(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}
