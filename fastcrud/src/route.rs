//! Route descriptors: the documentation-side description of one HTTP route.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::entity::CrudEntity;
use crate::response::Page;
use crate::schema::{DescribeSchema, Schema, SchemaGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether the method carries an entity body.
    #[must_use]
    pub fn is_mutating(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-erased handle on a sample request or response type. Only its shape is used.
#[derive(Clone, Copy)]
pub struct SampleType {
    name: fn() -> Option<Cow<'static, str>>,
    describe: fn(&mut SchemaGenerator) -> Schema,
}

impl SampleType {
    #[must_use]
    pub fn of<T: DescribeSchema>() -> Self {
        Self {
            name: <T as DescribeSchema>::schema_name,
            describe: SchemaGenerator::subschema_for::<T>,
        }
    }

    /// Definition name of the sample type, `None` for anonymous shapes.
    #[must_use]
    pub fn name(&self) -> Option<Cow<'static, str>> {
        (self.name)()
    }

    pub fn describe(&self, generator: &mut SchemaGenerator) -> Schema {
        (self.describe)(generator)
    }
}

impl fmt::Debug for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SampleType")
            .field(&self.name().unwrap_or(Cow::Borrowed("<anonymous>")))
            .finish()
    }
}

/// One route of an entity's surface, relative to the entity's route path.
///
/// ```rust,ignore
/// let route = RouteDescriptor::new(Method::Get, "/:id")
///     .tag("User")
///     .summary("Get User by ID")
///     .response::<User>();
/// ```
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    pub method: Method,
    /// Relative path, may contain the `:id` placeholder
    pub path: String,
    pub tags: Vec<String>,
    pub summary: String,
    pub description: String,
    pub request: Option<SampleType>,
    pub response: Option<SampleType>,
}

impl RouteDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            tags: Vec::new(),
            summary: String::new(),
            description: String::new(),
            request: None,
            response: None,
        }
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn request<T: DescribeSchema>(mut self) -> Self {
        self.request = Some(SampleType::of::<T>());
        self
    }

    #[must_use]
    pub fn response<T: DescribeSchema>(mut self) -> Self {
        self.response = Some(SampleType::of::<T>());
        self
    }

    /// Whether the path addresses a single entity through `:id` or `{id}`.
    #[must_use]
    pub fn has_id_placeholder(&self) -> bool {
        self.path.contains(":id") || self.path.contains("{id}")
    }
}

/// The CRUD and batch routes every generic controller serves.
///
/// Single-entity POST and PUT carry no request sample: their body is documented as a
/// reference to the entity definition.
#[must_use]
pub fn standard_routes<T: CrudEntity>() -> Vec<RouteDescriptor> {
    let name = T::entity_name();
    let route = |method: Method, path: &str, summary: String, description: String| {
        RouteDescriptor::new(method, path)
            .tag(name.as_ref())
            .summary(summary)
            .description(description)
    };

    vec![
        route(
            Method::Get,
            "",
            format!("List {name}"),
            format!("Get a paginated list of {name}"),
        )
        .response::<Page<T>>(),
        route(
            Method::Get,
            "/:id",
            format!("Get {name} by ID"),
            format!("Get a single {name} by its ID"),
        )
        .response::<T>(),
        route(
            Method::Post,
            "",
            format!("Create {name}"),
            format!("Create a new {name}"),
        )
        .response::<T>(),
        route(
            Method::Put,
            "/:id",
            format!("Update {name}"),
            format!("Update an existing {name}"),
        )
        .response::<T>(),
        route(
            Method::Delete,
            "/:id",
            format!("Delete {name}"),
            format!("Delete a {name} by its ID"),
        ),
        route(
            Method::Post,
            "/batch",
            format!("Batch create {name}"),
            format!("Create several {name} in one transaction"),
        )
        .request::<Vec<T>>()
        .response::<Vec<T>>(),
        route(
            Method::Put,
            "/batch",
            format!("Batch update {name}"),
            format!("Update several {name} in one transaction"),
        )
        .request::<Vec<T>>()
        .response::<Vec<T>>(),
        route(
            Method::Delete,
            "/batch",
            format!("Batch delete {name}"),
            format!("Delete several {name} by ID in one transaction"),
        )
        .request::<Vec<T::Id>>(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaKind;

    #[test]
    fn test_builder() {
        let route = RouteDescriptor::new(Method::Put, "/:id")
            .tag("User")
            .summary("Update User")
            .description("Update an existing User")
            .request::<String>();
        assert!(route.has_id_placeholder());
        assert_eq!(route.tags, vec!["User".to_string()]);
        assert!(route.request.is_some());
        assert!(route.response.is_none());
    }

    #[test]
    fn test_placeholder_forms() {
        assert!(RouteDescriptor::new(Method::Get, "/{id}").has_id_placeholder());
        assert!(!RouteDescriptor::new(Method::Get, "/batch").has_id_placeholder());
    }

    #[test]
    fn test_sample_type() {
        let sample = SampleType::of::<Vec<i64>>();
        assert!(sample.name().is_none());
        let schema = sample.describe(&mut SchemaGenerator::new());
        assert_eq!(schema.kind, Some(SchemaKind::Array));
    }

    #[test]
    fn test_method() {
        assert!(Method::Post.is_mutating());
        assert!(Method::Put.is_mutating());
        assert!(!Method::Delete.is_mutating());
        assert_eq!(Method::Get.to_string(), "GET");
    }
}
