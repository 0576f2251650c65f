use super::{Field, Kind, Payload, Relationship, RELATIONSHIP_DATA};
use cf_api_shim_core::{RoleRecord, RoleType};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoleCreate {
    #[serde(rename = "type")]
    pub type_: String,
    pub relationships: RoleRelationships,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoleRelationships {
    pub user: UserRelationship,
    pub space: Option<Relationship>,
    pub organization: Option<Relationship>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserRelationship {
    pub data: UserData,
}

/// A user is named either by username or by GUID.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserData {
    pub username: String,
    pub guid: String,
}

impl Payload for RoleCreate {
    const FIELDS: &'static [Field] = &[
        Field::required("type", "Type", Kind::String),
        Field::required(
            "relationships",
            "Relationships",
            Kind::Object(&[
                Field::required(
                    "user",
                    "User",
                    Kind::Object(&[Field::required(
                        "data",
                        "Data",
                        Kind::Object(&[
                            Field::optional("username", "Username", Kind::String),
                            Field::optional("guid", "GUID", Kind::String),
                        ]),
                    )]),
                ),
                Field::optional("space", "Space", Kind::Object(RELATIONSHIP_DATA)),
                Field::optional("organization", "Organization", Kind::Object(RELATIONSHIP_DATA)),
            ]),
        ),
    ];

    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let role_type = match self.type_.parse::<RoleType>() {
            Ok(role_type) => Some(role_type),
            Err(_) if self.type_.is_empty() => None,
            Err(_) => {
                let names = RoleType::ALL.map(|t| t.as_str()).join(" ");
                errors.push(format!("Type must be one of [{names}]"));
                None
            }
        };

        let relationships = &self.relationships;
        if relationships.space.is_some() && relationships.organization.is_some() {
            errors.push(
                "Cannot pass both 'organization' and 'space' in a create role request".to_string(),
            );
        } else if let Some(role_type) = role_type {
            if role_type.is_space_role() && relationships.space.is_none() {
                errors.push("Space is a required field".to_string());
            }
            if !role_type.is_space_role() && relationships.organization.is_none() {
                errors.push("Organization is a required field".to_string());
            }
        }

        if self.user().is_empty() {
            errors.push("Username is a required field".to_string());
        }
        errors
    }
}

impl RoleCreate {
    /// The user's name, preferring the username over the GUID.
    pub fn user(&self) -> &str {
        let data = &self.relationships.user.data;
        if data.username.is_empty() {
            &data.guid
        } else {
            &data.username
        }
    }

    pub fn space_guid(&self) -> Option<&str> {
        self.relationships
            .space
            .as_ref()
            .map(|r| r.data.guid.as_str())
    }

    pub fn organization_guid(&self) -> Option<&str> {
        self.relationships
            .organization
            .as_ref()
            .map(|r| r.data.guid.as_str())
    }

    /// Returns `None` when the type does not parse, which validation has
    /// already rejected.
    pub fn to_record(&self, guid: &str) -> Option<RoleRecord> {
        let type_ = self.type_.parse::<RoleType>().ok()?;
        Some(RoleRecord {
            guid: guid.to_string(),
            type_,
            space_guid: self.space_guid().map(str::to_string),
            org_guid: self.organization_guid().map(str::to_string),
            user: self.user().to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payloads::decode;

    fn detail(body: &serde_json::Value) -> String {
        let body = serde_json::to_vec(body).unwrap();
        decode::<RoleCreate>(&body).unwrap_err().detail().to_string()
    }

    #[test]
    fn space_role() {
        let body = serde_json::json!({
            "type": "space_developer",
            "relationships": {
                "user": {"data": {"username": "alice"}},
                "space": {"data": {"guid": "space-1"}},
            }
        });
        let role = decode::<RoleCreate>(&serde_json::to_vec(&body).unwrap())
            .unwrap()
            .to_record("role-1")
            .unwrap();
        assert_eq!(role.type_, RoleType::SpaceDeveloper);
        assert_eq!(role.space_guid.as_deref(), Some("space-1"));
        assert_eq!(role.org_guid, None);
        assert_eq!(role.user, "alice");
    }

    #[test]
    fn user_by_guid() {
        let body = serde_json::json!({
            "type": "organization_user",
            "relationships": {
                "user": {"data": {"guid": "user-guid"}},
                "organization": {"data": {"guid": "org-1"}},
            }
        });
        let role = decode::<RoleCreate>(&serde_json::to_vec(&body).unwrap())
            .unwrap()
            .to_record("role-1")
            .unwrap();
        assert_eq!(role.user, "user-guid");
        assert_eq!(role.org_guid.as_deref(), Some("org-1"));
    }

    #[test]
    fn invalid_type() {
        let detail = detail(&serde_json::json!({
            "type": "space_janitor",
            "relationships": {
                "user": {"data": {"username": "alice"}},
                "space": {"data": {"guid": "space-1"}},
            }
        }));
        assert_eq!(
            detail,
            "Type must be one of [space_manager space_auditor space_developer space_supporter \
             organization_user organization_auditor organization_manager \
             organization_billing_manager]"
        );
    }

    #[test]
    fn relationships() {
        assert_eq!(
            detail(&serde_json::json!({
                "type": "space_developer",
                "relationships": {
                    "user": {"data": {"username": "alice"}},
                    "space": {"data": {"guid": "space-1"}},
                    "organization": {"data": {"guid": "org-1"}},
                }
            })),
            "Cannot pass both 'organization' and 'space' in a create role request"
        );
        assert_eq!(
            detail(&serde_json::json!({
                "type": "space_developer",
                "relationships": {
                    "user": {"data": {"username": "alice"}},
                    "organization": {"data": {"guid": "org-1"}},
                }
            })),
            "Space is a required field"
        );
        assert_eq!(
            detail(&serde_json::json!({
                "type": "organization_manager",
                "relationships": {"user": {"data": {}}},
            })),
            "Organization is a required field, Username is a required field"
        );
    }
}
