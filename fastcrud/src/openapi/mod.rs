//! Swagger 2.0 document model and its construction.
//!
//! - [`operation`]: route descriptor -> [`Operation`]
//! - [`assembler`]: entity + routes -> per-entity [`Document`]
//! - [`registry`]: per-entity documents -> merged per-version documents

pub mod assembler;
pub mod operation;
pub mod registry;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::route::Method;
use crate::schema::{Schema, SchemaKind};

pub use assembler::{DocumentAssembler, document_path};
pub use operation::OperationBuilder;
pub use registry::{DocumentKey, DocumentRegistry, FrozenRegistry};

pub const SWAGGER_VERSION: &str = "2.0";
pub const JSON_MIME: &str = "application/json";

/// Swagger document root object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Swagger version (always "2.0").
    pub swagger: String,
    pub info: Info,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(rename = "basePath", default, skip_serializing_if = "String::is_empty")]
    pub base_path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: IndexMap<String, Schema>,
    /// Tags for grouping, at most one per name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl Document {
    /// An empty document with the given metadata.
    pub fn new(info: Info, base_path: impl Into<String>) -> Self {
        Self {
            swagger: SWAGGER_VERSION.to_string(),
            info,
            host: None,
            base_path: base_path.into(),
            schemes: Vec::new(),
            consumes: Vec::new(),
            produces: Vec::new(),
            paths: IndexMap::new(),
            definitions: IndexMap::new(),
            tags: Vec::new(),
        }
    }

    /// Adds a tag unless one with the same name is already present.
    pub fn add_tag(&mut self, tag: Tag) {
        if !self.tags.iter().any(|existing| existing.name == tag.name) {
            self.tags.push(tag);
        }
    }

    /// Folds `other` into `self`.
    ///
    /// Paths: last writer wins. Definitions: first writer wins. Tags: deduplicated by name,
    /// keeping the first description. Metadata of `self` is untouched.
    pub fn merge_from(&mut self, other: &Document) {
        for (path, item) in &other.paths {
            self.paths.insert(path.clone(), item.clone());
        }
        for (name, schema) in &other.definitions {
            if !self.definitions.contains_key(name) {
                self.definitions.insert(name.clone(), schema.clone());
            }
        }
        for tag in &other.tags {
            self.add_tag(tag.clone());
        }
    }
}

/// API metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub version: String,
}

impl Info {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            version: version.into(),
        }
    }
}

/// Operations available on a single path, at most one per method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
}

impl PathItem {
    /// Sets the operation of `method`, replacing any previous one.
    pub fn set(&mut self, method: Method, operation: Operation) {
        *self.slot_mut(method) = Some(operation);
    }

    #[must_use]
    pub fn get_operation(&self, method: Method) -> Option<&Operation> {
        match method {
            Method::Get => self.get.as_ref(),
            Method::Post => self.post.as_ref(),
            Method::Put => self.put.as_ref(),
            Method::Delete => self.delete.as_ref(),
        }
    }

    /// Methods with an operation, in GET, POST, PUT, DELETE order.
    pub fn methods(&self) -> impl Iterator<Item = Method> + '_ {
        [Method::Get, Method::Post, Method::Put, Method::Delete]
            .into_iter()
            .filter(|method| self.get_operation(*method).is_some())
    }

    fn slot_mut(&mut self, method: Method) -> &mut Option<Operation> {
        match method {
            Method::Get => &mut self.get,
            Method::Post => &mut self.post,
            Method::Put => &mut self.put,
            Method::Delete => &mut self.delete,
        }
    }
}

/// An API operation (endpoint).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Status code -> response.
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
}

impl Operation {
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|parameter| parameter.name == name)
    }
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Body,
}

/// An operation parameter. Body parameters carry a `schema`, path parameters a simple
/// `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SchemaKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

impl Parameter {
    pub fn path(name: impl Into<String>, kind: SchemaKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Path,
            description: description.into(),
            required: true,
            kind: Some(kind),
            schema: None,
        }
    }

    pub fn body(name: impl Into<String>, schema: Schema, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Body,
            description: description.into(),
            required: true,
            kind: None,
            schema: Some(schema),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn operation(summary: &str) -> Operation {
        Operation {
            summary: summary.to_string(),
            ..Operation::default()
        }
    }

    fn document(path: &str, summary: &str, tag: &str) -> Document {
        let mut doc = Document::new(Info::new("T", "", "v1"), "/api/v1");
        let mut item = PathItem::default();
        item.set(Method::Get, operation(summary));
        doc.paths.insert(path.to_string(), item);
        doc.definitions
            .insert(tag.to_string(), Schema::primitive(SchemaKind::String).with_description(summary));
        doc.add_tag(Tag::new(tag, summary));
        doc
    }

    #[test]
    fn test_merge_paths_last_writer_wins() {
        let mut target = document("/users", "first", "User");
        target.merge_from(&document("/users", "second", "User"));
        let item = &target.paths["/users"];
        assert_eq!(item.get.as_ref().unwrap().summary, "second");
    }

    #[test]
    fn test_merge_definitions_first_writer_wins() {
        let mut target = document("/users", "first", "User");
        target.merge_from(&document("/people", "second", "User"));
        assert_eq!(target.definitions["User"].description.as_deref(), Some("first"));
        assert_eq!(target.paths.len(), 2);
    }

    #[test]
    fn test_merge_tags_deduplicated() {
        let mut target = document("/users", "first", "User");
        target.merge_from(&document("/users", "second", "User"));
        target.merge_from(&document("/orders", "third", "Order"));
        let names: Vec<&str> = target.tags.iter().map(|tag| tag.name.as_str()).collect();
        assert_eq!(names, vec!["User", "Order"]);
        assert_eq!(target.tags[0].description, "first");
    }

    #[test]
    fn test_path_item_methods() {
        let mut item = PathItem::default();
        item.set(Method::Delete, operation("delete"));
        item.set(Method::Get, operation("get"));
        item.set(Method::Get, operation("get again"));
        assert_eq!(item.methods().collect::<Vec<_>>(), vec![Method::Get, Method::Delete]);
        assert_eq!(item.get_operation(Method::Get).unwrap().summary, "get again");
    }

    #[test]
    fn test_parameter_serialization() {
        let path = Parameter::path("id", SchemaKind::Integer, "Entity ID");
        assert_eq!(
            serde_json::to_value(&path).unwrap(),
            json!({"name": "id", "in": "path", "description": "Entity ID", "required": true, "type": "integer"})
        );

        let body = Parameter::body("body", Schema::reference("User"), "Request body");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "name": "body",
                "in": "body",
                "description": "Request body",
                "required": true,
                "schema": {"$ref": "#/definitions/User"}
            })
        );
    }

    #[test]
    fn test_document_serialization_keys() {
        let doc = Document::new(Info::new("User API", "API documentation for User", "v1"), "/api/v1");
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["swagger"], "2.0");
        assert_eq!(value["basePath"], "/api/v1");
        assert_eq!(value["paths"], json!({}));
        assert!(value.get("definitions").is_none());
    }
}
