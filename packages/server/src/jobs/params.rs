//! Checks submitted job parameters against a leaf's [`ParamSchema`].

use serde_json::{Map, Value};
use spacewalk::{FieldKind, ParamSchema};

use super::JobError;

/// Validate `submitted` against `schema` and return the full parameter set.
///
/// The submission must be a JSON object. Unknown fields, `null` values, and
/// values of the wrong kind are rejected. Absent fields take their default
/// when one is declared; an absent required field without a default is an
/// error.
pub fn load_params(schema: &ParamSchema, submitted: &Value) -> Result<Map<String, Value>, JobError> {
    let object = submitted
        .as_object()
        .ok_or_else(|| JobError::InvalidParams("parameters must be a JSON object".into()))?;

    if let Some(unknown) = object.keys().find(|k| schema.get(k).is_none()) {
        return Err(JobError::InvalidParams(format!("unknown field {unknown:?}")));
    }

    let mut params = Map::new();
    for (name, field) in schema.fields() {
        match object.get(name) {
            Some(value) => {
                if !matches_kind(&field.kind, value) {
                    return Err(JobError::InvalidParams(format!(
                        "field {name:?} must be {}",
                        describe(&field.kind)
                    )));
                }
                params.insert(name.to_string(), value.clone());
            }
            None => match &field.default {
                Some(default) => {
                    params.insert(name.to_string(), default.clone());
                }
                None if field.required => {
                    return Err(JobError::InvalidParams(format!(
                        "missing required field {name:?}"
                    )));
                }
                None => {}
            },
        }
    }
    Ok(params)
}

fn matches_kind(kind: &FieldKind, value: &Value) -> bool {
    match kind {
        FieldKind::String => value.is_string(),
        FieldKind::Integer => value.is_i64() || value.is_u64(),
        FieldKind::Number => value.is_number(),
        FieldKind::Boolean => value.is_boolean(),
        FieldKind::List(inner) => value
            .as_array()
            .is_some_and(|items| items.iter().all(|v| matches_kind(inner, v))),
    }
}

fn describe(kind: &FieldKind) -> String {
    match kind {
        FieldKind::List(inner) => format!("a list of {}", describe(inner)),
        FieldKind::Integer => "an integer".into(),
        other => format!("a {}", other.json_type()),
    }
}
