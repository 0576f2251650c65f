use super::{to_one, Link, Relationship, UrlBuilder};
use cf_api_shim_core::RoleRecord;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct RoleResponse {
    pub guid: String,
    #[serde(rename = "type")]
    pub type_: &'static str,
    pub created_at: String,
    pub updated_at: String,
    pub relationships: RoleRelationships,
    pub links: RoleLinks,
}

#[derive(Clone, Debug, Serialize)]
pub struct RoleRelationships {
    pub user: Relationship,
    pub space: Relationship,
    pub organization: Relationship,
}

#[derive(Clone, Debug, Serialize)]
pub struct RoleLinks {
    #[serde(rename = "self")]
    pub self_: Link,
    pub user: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<Link>,
}

pub fn role(record: &RoleRecord, urls: &UrlBuilder) -> RoleResponse {
    let to_one_of = |guid: Option<&String>| match guid {
        Some(guid) => to_one(guid),
        None => Relationship { data: None },
    };
    RoleResponse {
        guid: record.guid.clone(),
        type_: record.type_.as_str(),
        created_at: record.created_at.clone(),
        updated_at: record.updated_at.clone(),
        relationships: RoleRelationships {
            user: to_one(&record.user),
            space: to_one_of(record.space_guid.as_ref()),
            organization: to_one_of(record.org_guid.as_ref()),
        },
        links: RoleLinks {
            self_: urls.link(["v3", "roles", record.guid.as_str()]),
            user: urls.link(["v3", "users", record.user.as_str()]),
            space: record
                .space_guid
                .as_deref()
                .map(|guid| urls.link(["v3", "spaces", guid])),
            organization: record
                .org_guid
                .as_deref()
                .map(|guid| urls.link(["v3", "organizations", guid])),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_api_shim_core::RoleType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn renders_space_role() {
        let record = RoleRecord {
            guid: "role-1".to_string(),
            type_: RoleType::SpaceDeveloper,
            space_guid: Some("space-1".to_string()),
            org_guid: None,
            user: "alice".to_string(),
            created_at: "2024-01-02T03:04:05Z".to_string(),
            updated_at: "2024-01-02T03:04:05Z".to_string(),
        };
        assert_eq!(
            serde_json::to_value(role(&record, &UrlBuilder::new("https://api.example.com"))).unwrap(),
            json!({
                "guid": "role-1",
                "type": "space_developer",
                "created_at": "2024-01-02T03:04:05Z",
                "updated_at": "2024-01-02T03:04:05Z",
                "relationships": {
                    "user": {"data": {"guid": "alice"}},
                    "space": {"data": {"guid": "space-1"}},
                    "organization": {"data": null},
                },
                "links": {
                    "self": {"href": "https://api.example.com/v3/roles/role-1"},
                    "user": {"href": "https://api.example.com/v3/users/alice"},
                    "space": {"href": "https://api.example.com/v3/spaces/space-1"},
                },
            })
        );
    }
}
