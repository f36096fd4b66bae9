use std::collections::{BTreeMap, BTreeSet};

use super::{DescribeSchema, Schema};

/// Drives [`DescribeSchema`] recursion.
///
/// Tracks the named types currently being described. Re-entering one of them emits a
/// `$ref` instead of recursing, and the full schema of that type is recorded in
/// [`definitions`](Self::definitions) once its outermost description completes.
#[derive(Debug, Default)]
pub struct SchemaGenerator {
    in_progress: Vec<String>,
    cyclic: BTreeSet<String>,
    definitions: BTreeMap<String, Schema>,
}

impl SchemaGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Describes `T`, inlined, unless `T` is already being described further up.
    pub fn subschema_for<T: DescribeSchema + ?Sized>(&mut self) -> Schema {
        let Some(name) = T::schema_name() else {
            return T::describe_schema(self);
        };

        if self.in_progress.iter().any(|open| *open == name) {
            self.cyclic.insert(name.to_string());
            return Schema::reference(&name);
        }

        self.in_progress.push(name.to_string());
        let schema = T::describe_schema(self);
        self.in_progress.pop();

        if self.cyclic.contains(name.as_ref()) {
            self.definitions
                .entry(name.into_owned())
                .or_insert_with(|| schema.clone());
        }
        schema
    }

    /// Schemas of the self-referential types met so far, keyed by definition name.
    #[must_use]
    pub fn definitions(&self) -> &BTreeMap<String, Schema> {
        &self.definitions
    }

    pub fn take_definitions(&mut self) -> BTreeMap<String, Schema> {
        std::mem::take(&mut self.definitions)
    }
}

/// Describes `T` with a fresh generator.
#[must_use]
pub fn schema_of<T: DescribeSchema + ?Sized>() -> Schema {
    SchemaGenerator::new().subschema_for::<T>()
}
