use indexmap::IndexMap;

use super::{Operation, Parameter, Response};
use crate::route::RouteDescriptor;
use crate::schema::{Schema, SchemaGenerator, SchemaKind};

/// Turns route descriptors of one entity into documented operations.
///
/// Sample types are described through the shared generator, so self-referential types met
/// along the way end up in its definitions.
pub struct OperationBuilder<'a> {
    entity_name: &'a str,
    generator: &'a mut SchemaGenerator,
}

impl<'a> OperationBuilder<'a> {
    pub fn new(entity_name: &'a str, generator: &'a mut SchemaGenerator) -> Self {
        Self {
            entity_name,
            generator,
        }
    }

    /// Documents one route.
    ///
    /// Parameters are ordered: path `id` first (when the path addresses a single entity),
    /// then the `body` of POST and PUT. Without a request sample the body references the
    /// entity definition. Only a response sample produces a response entry.
    pub fn build(&mut self, route: &RouteDescriptor) -> Operation {
        let mut parameters = Vec::new();

        if route.has_id_placeholder() {
            parameters.push(Parameter::path("id", SchemaKind::Integer, "Entity ID"));
        }

        if route.method.is_mutating() {
            let schema = match &route.request {
                Some(sample) => sample.describe(self.generator),
                None => Schema::reference(self.entity_name),
            };
            parameters.push(Parameter::body("body", schema, "Request body"));
        }

        let mut responses = IndexMap::new();
        if let Some(sample) = &route.response {
            responses.insert(
                "200".to_string(),
                Response {
                    description: "Success".to_string(),
                    schema: Some(sample.describe(self.generator)),
                },
            );
        }

        Operation {
            tags: route.tags.clone(),
            summary: route.summary.clone(),
            description: route.description.clone(),
            parameters,
            responses,
        }
    }
}
