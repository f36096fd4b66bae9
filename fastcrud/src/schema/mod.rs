//! # Schema Synthesis
//!
//! Structural descriptions of Rust types, used for the `definitions`, request bodies and
//! responses of the generated API documents.
//!
//! Every documented type implements [`DescribeSchema`]. Structs get it from
//! `#[derive(DescribeSchema)]`; primitives, chrono/uuid types and std containers are covered
//! by the implementations in this module. Schemas are always inlined: a nested struct becomes
//! a nested object schema. The only references emitted are the entity body parameter of
//! mutating routes and the back-edge of a self-referential type.
//!
//! ## Mapping
//!
//! | Rust | Schema |
//! |---|---|
//! | `i64`, `u64` | `{integer, int64}` |
//! | other integers | `{integer}` |
//! | `f64` | `{number, double}` |
//! | `f32` | `{number}` |
//! | `bool` | `{boolean}` |
//! | `String`, `str`, `char` | `{string}` |
//! | `DateTime<Tz>`, `NaiveDateTime` | `{string, date-time}` |
//! | `NaiveDate` | `{string, date}` |
//! | `Uuid` | `{string, uuid}` |
//! | `Option<T>`, `Box<T>`, `Arc<T>`, `&T` | schema of `T` |
//! | `Vec<T>`, `[T]`, sets | `{array, items: T}` |
//! | maps, `serde_json::Value` | `{object}` (opaque) |
//!
//! ```rust,ignore
//! use fastcrud::DescribeSchema;
//!
//! #[derive(DescribeSchema)]
//! pub struct User {
//!     pub id: u64,
//!     #[schema(required, description = "Display name")]
//!     pub name: String,
//! }
//!
//! let schema = fastcrud::schema::schema_of::<User>();
//! assert_eq!(schema.required, vec!["name".to_string()]);
//! ```

mod describe;
mod generator;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

pub use describe::DescribeSchema;
pub use generator::{SchemaGenerator, schema_of};

/// JSON type of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
}

impl SchemaKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural description of a type, serialized in Swagger 2.0 form.
///
/// Exactly one shape is populated at a time: a primitive `kind` (optionally refined by
/// `format`), an object with `properties`, an array with `items`, or a `reference`.
/// `required` only ever names keys of `properties`, each at most once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SchemaKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Schema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
}

impl Schema {
    /// A schema of the given primitive kind with no format.
    #[must_use]
    pub fn primitive(kind: SchemaKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Opaque `{type: object}`: the fallback for shapes that carry no structure
    /// (maps, `serde_json::Value`), and the starting point of derived struct schemas.
    #[must_use]
    pub fn object() -> Self {
        Self::primitive(SchemaKind::Object)
    }

    #[must_use]
    pub fn array(items: Schema) -> Self {
        Self {
            kind: Some(SchemaKind::Array),
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    /// A `$ref` into the document's `definitions`.
    #[must_use]
    pub fn reference(definition: &str) -> Self {
        Self {
            reference: Some(format!("#/definitions/{definition}")),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_example(mut self, example: impl Into<Value>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn set_example(&mut self, example: impl Into<Value>) {
        self.example = Some(example.into());
    }

    /// Adds or replaces a property. Later writers win.
    pub fn insert_property(&mut self, name: impl Into<String>, schema: Schema) {
        self.properties.insert(name.into(), schema);
    }

    /// Marks a property as required. Names already present are not duplicated.
    pub fn mark_required(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name);
        }
    }

    /// Flattens an embedded schema into this one: its properties and required names are
    /// spliced in at this level. Colliding property names take the embedded value.
    pub fn splice(&mut self, embedded: Schema) {
        for (name, property) in embedded.properties {
            self.properties.insert(name, property);
        }
        for name in embedded.required {
            self.mark_required(name);
        }
    }

    /// Like [`splice`](Self::splice) for an embedded value that may be absent: its
    /// properties are spliced in, its required names are not.
    pub fn splice_optional(&mut self, embedded: Schema) {
        for (name, property) in embedded.properties {
            self.properties.insert(name, property);
        }
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.properties.get(name)
    }

    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|required| required == name)
    }

    /// Definition name this schema points at, if it is a `$ref`.
    #[must_use]
    pub fn reference_name(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .and_then(|reference| reference.strip_prefix("#/definitions/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mark_required_is_idempotent() {
        let mut schema = Schema::object();
        schema.insert_property("name", Schema::primitive(SchemaKind::String));
        schema.mark_required("name");
        schema.mark_required("name");
        assert_eq!(schema.required, vec!["name".to_string()]);
    }

    #[test]
    fn test_splice_merges_properties_and_required() {
        let mut base = Schema::object();
        base.insert_property("created_at", Schema::primitive(SchemaKind::String));
        base.mark_required("created_at");

        let mut parent = Schema::object();
        parent.insert_property("name", Schema::primitive(SchemaKind::String));
        parent.mark_required("created_at");
        parent.splice(base);

        assert!(parent.property("created_at").is_some());
        assert!(parent.property("name").is_some());
        assert_eq!(parent.required, vec!["created_at".to_string()]);
    }

    #[test]
    fn test_splice_optional_keeps_required_out() {
        let mut audit = Schema::object();
        audit.insert_property("created_by", Schema::primitive(SchemaKind::String));
        audit.mark_required("created_by");

        let mut parent = Schema::object();
        parent.insert_property("title", Schema::primitive(SchemaKind::String));
        parent.mark_required("title");
        parent.splice_optional(audit);

        assert!(parent.property("created_by").is_some());
        assert_eq!(parent.required, vec!["title".to_string()]);
    }

    #[test]
    fn test_splice_collision_last_writer_wins() {
        let mut parent = Schema::object();
        parent.insert_property("id", Schema::primitive(SchemaKind::String));

        let mut embedded = Schema::object();
        embedded.insert_property("id", Schema::primitive(SchemaKind::Integer).with_format("int64"));
        parent.splice(embedded);

        assert_eq!(parent.property("id").and_then(|s| s.kind), Some(SchemaKind::Integer));
    }

    #[test]
    fn test_reference_serialization() {
        let schema = Schema::reference("User");
        assert_eq!(schema.reference_name(), Some("User"));
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({"$ref": "#/definitions/User"})
        );
    }

    #[test]
    fn test_object_serialization_skips_empty_members() {
        let mut schema = Schema::object();
        schema.insert_property("age", Schema::primitive(SchemaKind::Integer));
        schema.mark_required("age");
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "type": "object",
                "properties": {"age": {"type": "integer"}},
                "required": ["age"]
            })
        );
    }

    #[test]
    fn test_array_serialization() {
        let schema = Schema::array(Schema::primitive(SchemaKind::Number).with_format("double"));
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({"type": "array", "items": {"type": "number", "format": "double"}})
        );
    }
}
