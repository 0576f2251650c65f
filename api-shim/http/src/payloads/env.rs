use super::{Field, Kind, Payload};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Changes to an app's environment variables. A `null` value removes the
/// variable.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct EnvVarsPatch {
    pub var: BTreeMap<String, Option<String>>,
}

impl Payload for EnvVarsPatch {
    const FIELDS: &'static [Field] = &[Field::required("var", "Var", Kind::NullableStringMap)];
}
