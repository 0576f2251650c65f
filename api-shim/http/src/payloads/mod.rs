//! Request bodies and their validation.
//!
//! Each payload declares its accepted fields as a static schema. Decoding
//! checks a body against the schema before deserializing it, so that the
//! error details match the legacy API exactly:
//!
//! 1. a body that is not a JSON object is a parse error;
//! 2. an undeclared field fails with `invalid request body: json: unknown
//!    field "<key>"`;
//! 3. the first value of the wrong type fails with `<Field> must be a
//!    <type>`;
//! 4. every missing required field and every failed domain rule is reported,
//!    in declaration order, joined by `", "`.

mod app;
mod build;
mod env;
mod org;
mod package;
mod process;
mod query;
mod role;
mod route;

pub use self::{
    app::AppCreate,
    build::BuildCreate,
    env::EnvVarsPatch,
    org::{OrgCreate, SpaceCreate},
    package::PackageCreate,
    process::ProcessScale,
    query::{AppListQuery, NamesQuery, RouteListQuery, SpaceListQuery},
    role::RoleCreate,
    route::RouteCreate,
};

use crate::error::ApiError;
use cf_api_shim_core::Metadata;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub trait Payload: DeserializeOwned {
    const FIELDS: &'static [Field];

    /// Domain rules beyond presence and type. Returns one detail per failure.
    fn validate(&self) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Field {
    pub key: &'static str,
    /// The name used in error details.
    pub name: &'static str,
    pub kind: Kind,
    pub required: bool,
}

#[derive(Copy, Clone, Debug)]
pub enum Kind {
    String,
    Integer,
    Boolean,
    StringMap,
    /// A map whose values may be `null`, used to remove entries.
    NullableStringMap,
    StringList,
    Object(&'static [Field]),
}

/// `{"data": {"guid": ...}}`, a to-one relationship.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Relationship {
    pub data: RelationshipData,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RelationshipData {
    pub guid: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MetadataPayload {
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

pub(crate) const GUID: Field = Field::required("guid", "GUID", Kind::String);

pub(crate) const RELATIONSHIP_DATA: &[Field] =
    &[Field::required("data", "Data", Kind::Object(&[GUID]))];

pub(crate) const METADATA: Field = Field::optional(
    "metadata",
    "Metadata",
    Kind::Object(&[
        Field::optional("labels", "Labels", Kind::StringMap),
        Field::optional("annotations", "Annotations", Kind::StringMap),
    ]),
);

/// Decodes and validates a request body.
pub fn decode<P: Payload>(body: &[u8]) -> Result<P, ApiError> {
    let mut value: Value = serde_json::from_slice(body).map_err(|error| {
        tracing::debug!(%error, "Failed to parse request body");
        ApiError::message_parse()
    })?;
    let object = value.as_object_mut().ok_or_else(ApiError::message_parse)?;

    if let Some(key) = unknown_field(object, P::FIELDS) {
        return Err(ApiError::unprocessable(format!(
            "invalid request body: json: unknown field \"{key}\""
        )));
    }
    if let Some(detail) = type_mismatch(object, P::FIELDS, None) {
        return Err(ApiError::unprocessable(detail));
    }
    strip_nulls(object, P::FIELDS);

    let mut errors = Vec::new();
    missing_fields(object, P::FIELDS, &mut errors);

    let payload = serde_json::from_value::<P>(value)
        .map_err(|error| ApiError::unprocessable(format!("invalid request body: {error}")))?;
    errors.extend(payload.validate());
    if !errors.is_empty() {
        return Err(ApiError::unprocessable(errors.join(", ")));
    }
    Ok(payload)
}

// === impl Field ===

impl Field {
    pub const fn required(key: &'static str, name: &'static str, kind: Kind) -> Self {
        Self {
            key,
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(key: &'static str, name: &'static str, kind: Kind) -> Self {
        Self {
            key,
            name,
            kind,
            required: false,
        }
    }
}

// === impl Kind ===

impl Kind {
    fn describe(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "number",
            Self::Boolean => "boolean",
            Self::StringMap | Self::NullableStringMap => "map",
            Self::StringList => "list",
            Self::Object(_) => "object",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::StringMap => value
                .as_object()
                .is_some_and(|m| m.values().all(Value::is_string)),
            Self::NullableStringMap => value
                .as_object()
                .is_some_and(|m| m.values().all(|v| v.is_string() || v.is_null())),
            Self::StringList => value
                .as_array()
                .is_some_and(|a| a.iter().all(Value::is_string)),
            Self::Object(_) => value.is_object(),
        }
    }
}

// === impl MetadataPayload ===

impl MetadataPayload {
    pub fn to_metadata(&self) -> Metadata {
        Metadata {
            labels: self.labels.clone(),
            annotations: self.annotations.clone(),
        }
    }
}

/// The first key, depth first in document order, that the schema does not
/// name. Object maps keep insertion order (`serde_json/preserve_order`).
fn unknown_field(object: &Map<String, Value>, fields: &[Field]) -> Option<String> {
    for (key, value) in object {
        let field = match fields.iter().find(|f| f.key == key.as_str()) {
            Some(field) => field,
            None => return Some(key.clone()),
        };
        if let (Kind::Object(children), Value::Object(nested)) = (field.kind, value) {
            if let Some(key) = unknown_field(nested, children) {
                return Some(key);
            }
        }
    }
    None
}

fn type_mismatch(object: &Map<String, Value>, fields: &[Field], parent: Option<&str>) -> Option<String> {
    for field in fields {
        let value = match object.get(field.key) {
            None | Some(Value::Null) => continue,
            Some(value) => value,
        };
        let path = match parent {
            Some(parent) => format!("{parent}.{}", field.name),
            None => field.name.to_string(),
        };
        if !field.kind.accepts(value) {
            return Some(format!("{path} must be a {}", field.kind.describe()));
        }
        if let (Kind::Object(children), Value::Object(nested)) = (field.kind, value) {
            if let Some(detail) = type_mismatch(nested, children, Some(&path)) {
                return Some(detail);
            }
        }
    }
    None
}

/// Explicit nulls are treated as absent.
fn strip_nulls(object: &mut Map<String, Value>, fields: &[Field]) {
    object.retain(|_, v| !v.is_null());
    for field in fields {
        if let (Kind::Object(children), Some(Value::Object(nested))) =
            (field.kind, object.get_mut(field.key))
        {
            strip_nulls(nested, children);
        }
    }
}

fn missing_fields(object: &Map<String, Value>, fields: &[Field], errors: &mut Vec<String>) {
    for field in fields {
        let value = object.get(field.key);
        let present = match value {
            None => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        };
        if field.required && !present {
            errors.push(format!("{} is a required field", field.name));
            continue;
        }
        if let (Kind::Object(children), Some(Value::Object(nested))) = (field.kind, value) {
            missing_fields(nested, children, errors);
        }
    }
}

/// Splits a comma-separated query value, dropping empty elements.
pub fn comma_list(value: Option<&str>) -> Vec<String> {
    value
        .into_iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Thing {
        name: String,
        count: Option<i64>,
        relationships: ThingRelationships,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct ThingRelationships {
        space: Relationship,
    }

    impl Payload for Thing {
        const FIELDS: &'static [Field] = &[
            Field::required("name", "Name", Kind::String),
            Field::optional("count", "Count", Kind::Integer),
            Field::required(
                "relationships",
                "Relationships",
                Kind::Object(&[Field::required("space", "Space", Kind::Object(RELATIONSHIP_DATA))]),
            ),
        ];

        fn validate(&self) -> Vec<String> {
            match self.count {
                Some(n) if n < 0 => vec!["Count must be 0 or greater".to_string()],
                _ => vec![],
            }
        }
    }

    fn detail(body: &str) -> String {
        decode::<Thing>(body.as_bytes()).unwrap_err().detail().to_string()
    }

    #[test]
    fn parse_errors() {
        for body in ["{", "", "[]", "\"x\"", "null"] {
            let err = decode::<Thing>(body.as_bytes()).unwrap_err();
            assert_eq!(err, ApiError::message_parse(), "{body:?}");
        }
    }

    #[test]
    fn unknown_fields() {
        assert_eq!(
            detail(r#"{"name":"x","description":"y"}"#),
            "invalid request body: json: unknown field \"description\""
        );
        assert_eq!(
            detail(r#"{"relationships":{"space":{"data":{"guid":"g","extra":1}}}}"#),
            "invalid request body: json: unknown field \"extra\""
        );
        assert_eq!(
            detail(r#"{"zeta":1,"name":"x","alpha":2}"#),
            "invalid request body: json: unknown field \"zeta\""
        );
    }

    #[test]
    fn type_mismatches() {
        assert_eq!(detail(r#"{"name":12345}"#), "Name must be a string");
        assert_eq!(
            detail(r#"{"name":"x","count":"3"}"#),
            "Count must be a number"
        );
        assert_eq!(
            detail(r#"{"name":"x","relationships":{"space":{"data":{"guid":7}}}}"#),
            "Relationships.Space.Data.GUID must be a string"
        );
        assert_eq!(
            detail(r#"{"name":"x","relationships":[]}"#),
            "Relationships must be a object"
        );
    }

    #[test]
    fn missing_fields_are_joined() {
        assert_eq!(
            detail("{}"),
            "Name is a required field, Relationships is a required field"
        );
        assert_eq!(
            detail(r#"{"name":"","relationships":{"space":{"data":{}}}}"#),
            "Name is a required field, GUID is a required field"
        );
        assert_eq!(
            detail(r#"{"name":null,"count":-1,"relationships":{"space":{"data":{"guid":"g"}}}}"#),
            "Name is a required field, Count must be 0 or greater"
        );
    }

    #[test]
    fn valid_payload() {
        let thing = decode::<Thing>(
            br#"{"name":"x","count":null,"relationships":{"space":{"data":{"guid":"g"}}}}"#,
        )
        .unwrap();
        assert_eq!(thing.name, "x");
        assert_eq!(thing.count, None);
        assert_eq!(thing.relationships.space.data.guid, "g");
    }

    #[test]
    fn comma_lists() {
        assert_eq!(comma_list(Some("g1,,g2,")), vec!["g1", "g2"]);
        assert_eq!(comma_list(Some("")), Vec::<String>::new());
        assert_eq!(comma_list(None), Vec::<String>::new());
    }
}
