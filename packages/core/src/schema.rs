//! Parameter declarations for leaf job types and their JSON-Schema rendering.
//!
//! A [`ParamSchema`] describes the input a job accepts when it is submitted
//! with `POST <leaf>/job`. The core never validates values against it; it only
//! renders the schema document served by `GET <leaf>/post-schema` so external
//! validators and clients know what to send.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

/// JSON-Schema dialect advertised in every rendered document.
pub const SCHEMA_DIALECT: &str = "http://json-schema.org/draft-07/schema#";

/// Name of the definition that holds the parameter object.
pub const PARAMS_DEFINITION: &str = "Params";

/// The value type of a single parameter field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    /// A homogeneous array of the inner kind.
    List(Box<FieldKind>),
}

impl FieldKind {
    /// The JSON-Schema `type` keyword for this kind.
    pub fn json_type(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::List(_) => "array",
        }
    }

    fn to_json_schema(&self, title: &str) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("title".into(), Value::String(title.to_string()));
        out.insert("type".into(), Value::String(self.json_type().to_string()));
        if let FieldKind::List(inner) = self {
            out.insert("items".into(), Value::Object(inner.to_json_schema("")));
        }
        out
    }
}

/// One named parameter: its kind plus optional presence rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub kind: FieldKind,
    pub required: bool,
    /// Value applied when the field is absent from a submission.
    pub default: Option<Value>,
    pub description: Option<String>,
}

impl Field {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            default: None,
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    pub fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    pub fn number() -> Self {
        Self::new(FieldKind::Number)
    }

    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    pub fn list(items: FieldKind) -> Self {
        Self::new(FieldKind::List(Box::new(items)))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An ordered set of named parameter fields.
///
/// Fields are keyed by name and iterate in name order, so rendering is
/// deterministic regardless of declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSchema {
    fields: BTreeMap<String, Field>,
}

impl ParamSchema {
    /// An empty schema: a job with no parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a field.
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Union of `self` and `overlay`. Fields in `overlay` replace same-named
    /// fields in `self`.
    pub fn merge(&self, overlay: &ParamSchema) -> ParamSchema {
        let mut fields = self.fields.clone();
        for (name, field) in &overlay.fields {
            fields.insert(name.clone(), field.clone());
        }
        ParamSchema { fields }
    }

    /// Render the schema as a JSON-Schema document.
    ///
    /// ```json
    /// {
    ///   "$schema": "http://json-schema.org/draft-07/schema#",
    ///   "$ref": "#/definitions/Params",
    ///   "definitions": {
    ///     "Params": {
    ///       "type": "object",
    ///       "additionalProperties": false,
    ///       "properties": { "n": { "title": "n", "type": "integer", "default": 50 } }
    ///     }
    ///   }
    /// }
    /// ```
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for (name, field) in &self.fields {
            let mut prop = field.kind.to_json_schema(name);
            if let Some(default) = &field.default {
                prop.insert("default".into(), default.clone());
            }
            if let Some(description) = &field.description {
                prop.insert("description".into(), Value::String(description.clone()));
            }
            if field.required {
                required.push(Value::String(name.clone()));
            }
            properties.insert(name.clone(), Value::Object(prop));
        }

        let mut params = Map::new();
        params.insert("type".into(), json!("object"));
        params.insert("additionalProperties".into(), json!(false));
        params.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            params.insert("required".into(), Value::Array(required));
        }

        let mut definitions = Map::new();
        definitions.insert(PARAMS_DEFINITION.into(), Value::Object(params));

        json!({
            "$schema": SCHEMA_DIALECT,
            "$ref": format!("#/definitions/{PARAMS_DEFINITION}"),
            "definitions": definitions,
        })
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fizz_buzz() -> ParamSchema {
        ParamSchema::new()
            .field("n", Field::integer().default_value(50))
            .field("fizzDivisor", Field::integer().default_value(3))
            .field("buzzDivisor", Field::integer().default_value(5))
    }

    #[test]
    fn empty_schema_renders_object_without_properties() {
        let doc = ParamSchema::new().to_json_schema();
        assert_eq!(doc["$schema"], SCHEMA_DIALECT);
        assert_eq!(doc["$ref"], "#/definitions/Params");
        let params = &doc["definitions"]["Params"];
        assert_eq!(params["type"], "object");
        assert_eq!(params["properties"], json!({}));
        assert!(params.get("required").is_none());
    }

    #[test]
    fn fields_render_title_type_and_default() {
        let doc = fizz_buzz().to_json_schema();
        let props = &doc["definitions"]["Params"]["properties"];
        assert_eq!(props["n"], json!({ "title": "n", "type": "integer", "default": 50 }));
        assert_eq!(props["fizzDivisor"]["default"], 3);
        assert_eq!(props.as_object().unwrap().len(), 3);
    }

    #[test]
    fn required_fields_are_listed() {
        let schema = ParamSchema::new()
            .field("thingum", Field::string().required())
            .field("optional", Field::boolean());
        let doc = schema.to_json_schema();
        assert_eq!(doc["definitions"]["Params"]["required"], json!(["thingum"]));
    }

    #[test]
    fn list_fields_render_items() {
        let schema = ParamSchema::new().field("output", Field::list(FieldKind::String));
        let doc = schema.to_json_schema();
        let output = &doc["definitions"]["Params"]["properties"]["output"];
        assert_eq!(output["type"], "array");
        assert_eq!(output["items"]["type"], "string");
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ParamSchema::new()
            .field("output", Field::list(FieldKind::String))
            .field("n", Field::string());
        let merged = base.merge(&fizz_buzz());
        assert_eq!(merged.len(), 4);
        assert_eq!(merged.get("n").unwrap().kind, FieldKind::Integer);
        assert!(merged.get("output").is_some());
    }
}
