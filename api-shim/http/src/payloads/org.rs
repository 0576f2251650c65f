use super::{Field, Kind, MetadataPayload, Payload, Relationship, METADATA, RELATIONSHIP_DATA};
use cf_api_shim_core::{OrgRecord, SpaceRecord};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrgCreate {
    pub name: String,
    pub suspended: bool,
    pub metadata: MetadataPayload,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SpaceCreate {
    pub name: String,
    pub relationships: SpaceRelationships,
    pub metadata: MetadataPayload,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SpaceRelationships {
    pub organization: Relationship,
}

impl Payload for OrgCreate {
    const FIELDS: &'static [Field] = &[
        Field::required("name", "Name", Kind::String),
        Field::optional("suspended", "Suspended", Kind::Boolean),
        METADATA,
    ];
}

impl OrgCreate {
    pub fn to_record(&self, guid: &str) -> OrgRecord {
        OrgRecord {
            guid: guid.to_string(),
            name: self.name.clone(),
            suspended: self.suspended,
            metadata: self.metadata.to_metadata(),
            ..Default::default()
        }
    }
}

impl Payload for SpaceCreate {
    const FIELDS: &'static [Field] = &[
        Field::required("name", "Name", Kind::String),
        Field::required(
            "relationships",
            "Relationships",
            Kind::Object(&[Field::required(
                "organization",
                "Organization",
                Kind::Object(RELATIONSHIP_DATA),
            )]),
        ),
        METADATA,
    ];
}

impl SpaceCreate {
    pub fn organization_guid(&self) -> &str {
        &self.relationships.organization.data.guid
    }

    pub fn to_record(&self, guid: &str) -> SpaceRecord {
        SpaceRecord {
            guid: guid.to_string(),
            name: self.name.clone(),
            organization_guid: self.organization_guid().to_string(),
            metadata: self.metadata.to_metadata(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payloads::decode;

    #[test]
    fn org() {
        let org = decode::<OrgCreate>(br#"{"name":"my-org","suspended":true}"#)
            .unwrap()
            .to_record("org-1");
        assert_eq!(org.name, "my-org");
        assert!(org.suspended);

        let err = decode::<OrgCreate>(br#"{"name":"my-org","suspended":"yes"}"#).unwrap_err();
        assert_eq!(err.detail(), "Suspended must be a boolean");
    }

    #[test]
    fn space() {
        let space = decode::<SpaceCreate>(
            br#"{"name":"dev","relationships":{"organization":{"data":{"guid":"org-1"}}}}"#,
        )
        .unwrap()
        .to_record("space-1");
        assert_eq!(space.organization_guid, "org-1");

        let err = decode::<SpaceCreate>(br#"{"name":"dev"}"#).unwrap_err();
        assert_eq!(err.detail(), "Relationships is a required field");
    }
}
