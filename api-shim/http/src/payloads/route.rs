use super::{Field, Kind, MetadataPayload, Payload, Relationship, METADATA, RELATIONSHIP_DATA};
use cf_api_shim_core::{route::HTTP_PROTOCOL, DomainRecord, DomainRef, RouteRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static HOSTNAME_RFC1123: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-zA-Z0-9]{1}[a-zA-Z0-9-]{0,62}){1}(\.[a-zA-Z0-9]{1}[a-zA-Z0-9-]{0,62})*?$")
        .expect("hostname pattern must compile")
});

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RouteCreate {
    pub host: String,
    pub path: String,
    pub relationships: RouteRelationships,
    pub metadata: MetadataPayload,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RouteRelationships {
    pub space: Relationship,
    pub domain: Relationship,
}

impl Payload for RouteCreate {
    const FIELDS: &'static [Field] = &[
        Field::required("host", "Host", Kind::String),
        Field::optional("path", "Path", Kind::String),
        Field::required(
            "relationships",
            "Relationships",
            Kind::Object(&[
                Field::required("domain", "Domain", Kind::Object(RELATIONSHIP_DATA)),
                Field::required("space", "Space", Kind::Object(RELATIONSHIP_DATA)),
            ]),
        ),
        METADATA,
    ];

    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.host.is_empty() && !HOSTNAME_RFC1123.is_match(&self.host) {
            errors.push(tag_failure("Host", "hostname_rfc1123"));
        }
        if !self.path.is_empty() && !self.path.starts_with('/') {
            errors.push(tag_failure("Path", "routepathstartswithslash"));
        }
        errors
    }
}

fn tag_failure(field: &str, tag: &str) -> String {
    format!("Key: 'RouteCreate.{field}' Error:Field validation for '{field}' failed on the '{tag}' tag")
}

impl RouteCreate {
    pub fn space_guid(&self) -> &str {
        &self.relationships.space.data.guid
    }

    pub fn domain_guid(&self) -> &str {
        &self.relationships.domain.data.guid
    }

    pub fn to_record(&self, guid: &str, domain: &DomainRecord) -> RouteRecord {
        RouteRecord {
            guid: guid.to_string(),
            space_guid: self.space_guid().to_string(),
            domain: DomainRef {
                guid: domain.guid.clone(),
                name: domain.name.clone(),
            },
            host: self.host.clone(),
            path: self.path.clone(),
            protocol: HTTP_PROTOCOL.to_string(),
            destinations: Vec::new(),
            metadata: self.metadata.to_metadata(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payloads::decode;

    fn body(host: &str, path: &str) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "host": host,
            "path": path,
            "relationships": {
                "domain": {"data": {"guid": "domain-1"}},
                "space": {"data": {"guid": "space-1"}},
            }
        }))
        .unwrap()
    }

    #[test]
    fn hostnames() {
        for host in ["my-app", "a", "my-app.internal", "A1-b2"] {
            assert!(decode::<RouteCreate>(&body(host, "")).is_ok(), "{host}");
        }
        for host in ["!-invalid-!", "-leading", "under_score", "trailing."] {
            let err = decode::<RouteCreate>(&body(host, "")).unwrap_err();
            assert_eq!(
                err.detail(),
                "Key: 'RouteCreate.Host' Error:Field validation for 'Host' failed on the 'hostname_rfc1123' tag",
                "{host}"
            );
        }
    }

    #[test]
    fn paths() {
        assert!(decode::<RouteCreate>(&body("my-app", "/api")).is_ok());
        let err = decode::<RouteCreate>(&body("my-app", "no-leading-slash")).unwrap_err();
        assert!(err.detail().contains("routepathstartswithslash"), "{err}");
    }

    #[test]
    fn to_record() {
        let payload = decode::<RouteCreate>(&body("my-app", "/api")).unwrap();
        let domain = DomainRecord {
            guid: "domain-1".to_string(),
            name: "apps.example.com".to_string(),
            ..Default::default()
        };
        let record = payload.to_record("route-1", &domain);
        assert_eq!(record.url(), "my-app.apps.example.com/api");
        assert_eq!(record.protocol, "http");
        assert!(record.destinations.is_empty());
    }
}
