use indexmap::IndexMap;

use super::{Document, Info, OperationBuilder, PathItem, Tag};
use crate::entity::CrudEntity;
use crate::route::RouteDescriptor;
use crate::schema::SchemaGenerator;

/// Documented path of a route: `/{route_path}{path}` with `:id` written as `{id}`.
///
/// Idempotent: a path already using `{id}` is left as is.
#[must_use]
pub fn document_path(route_path: &str, path: &str) -> String {
    format!("/{}{}", route_path.trim_matches('/'), path).replace(":id", "{id}")
}

/// Builds the document of one entity surface under one version.
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    base_path: String,
    route_path: String,
    version: String,
}

impl DocumentAssembler {
    pub fn new(
        base_path: impl Into<String>,
        route_path: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            base_path: base_path.into(),
            route_path: route_path.into(),
            version: version.into(),
        }
    }

    pub fn assemble<T: CrudEntity>(&self, routes: &[RouteDescriptor]) -> Document {
        let entity_name = T::entity_name();
        let mut generator = SchemaGenerator::new();
        let entity_schema = generator.subschema_for::<T>();

        let mut paths: IndexMap<String, PathItem> = IndexMap::new();
        {
            let mut operations = OperationBuilder::new(&entity_name, &mut generator);
            for route in routes {
                let operation = operations.build(route);
                paths
                    .entry(document_path(&self.route_path, &route.path))
                    .or_default()
                    .set(route.method, operation);
            }
        }

        let mut document = Document::new(
            Info::new(
                format!("{entity_name} API"),
                format!("API documentation for {entity_name}"),
                self.version.clone(),
            ),
            self.base_path.clone(),
        );
        document.paths = paths;
        document
            .definitions
            .insert(entity_name.to_string(), entity_schema);

        let samples = routes
            .iter()
            .flat_map(|route| [route.request, route.response])
            .flatten();
        for sample in samples {
            let Some(name) = sample.name() else {
                continue;
            };
            if name == entity_name {
                continue;
            }
            let schema = sample.describe(&mut generator);
            if let Some(existing) = document.definitions.get(&*name) {
                if *existing != schema {
                    tracing::warn!(
                        definition = %name,
                        entity = %entity_name,
                        "Definition name collision, keeping the first schema"
                    );
                }
                continue;
            }
            document.definitions.insert(name.into_owned(), schema);
        }

        for (name, schema) in generator.take_definitions() {
            document.definitions.entry(name).or_insert(schema);
        }

        document.add_tag(Tag::new(
            entity_name.clone(),
            format!("Operations about {entity_name}"),
        ));

        tracing::debug!(
            entity = %entity_name,
            route_path = %self.route_path,
            version = %self.version,
            paths = document.paths.len(),
            definitions = document.definitions.len(),
            "Assembled API document"
        );

        document
    }
}
