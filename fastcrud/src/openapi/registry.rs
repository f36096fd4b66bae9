//! Document registry.
//!
//! Documents are registered at startup on a [`DocumentRegistry`], one per entity surface
//! and version. [`DocumentRegistry::freeze`] ends the write phase; the resulting
//! [`FrozenRegistry`] is immutable and is shared across request handlers through an `Arc`.
//!
//! ```rust,ignore
//! let mut registry = DocumentRegistry::new(CrudConfig::default());
//! registry.register_entity::<Order>("/api/v1", "orders", &standard_routes::<Order>(), "v1");
//! let registry = Arc::new(registry.freeze());
//!
//! let v1 = &registry.merged_by_version()["v1"];
//! assert!(v1.paths.contains_key("/orders/{id}"));
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::{Document, DocumentAssembler, Info, JSON_MIME};
use crate::config::CrudConfig;
use crate::entity::CrudEntity;
use crate::route::RouteDescriptor;

const MERGED_DESCRIPTION: &str = "Auto-generated API documentation";
const MERGED_HOST: &str = "localhost:8080";
const MERGED_VERSION: &str = "1.0";
const MERGED_BASE_VERSION: &str = "v1";

/// Registry key of one entity surface under one version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DocumentKey {
    pub route_path: String,
    pub version: String,
}

impl DocumentKey {
    pub fn new(route_path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            route_path: route_path.into(),
            version: version.into(),
        }
    }

    /// Whether `key` is the string form `"{route_path}_{version}"` of this key.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        key.strip_prefix(self.route_path.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .is_some_and(|version| version == self.version)
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.route_path, self.version)
    }
}

/// Write phase of the registry.
#[derive(Debug, Clone, Default)]
pub struct DocumentRegistry {
    config: CrudConfig,
    documents: IndexMap<DocumentKey, Document>,
}

impl DocumentRegistry {
    #[must_use]
    pub fn new(config: CrudConfig) -> Self {
        Self {
            config,
            documents: IndexMap::new(),
        }
    }

    /// Stores `document` under `(route_path, version)`, replacing any previous document.
    pub fn register(
        &mut self,
        route_path: impl Into<String>,
        version: impl Into<String>,
        document: Document,
    ) {
        let key = DocumentKey::new(route_path, version);
        tracing::debug!(key = %key, paths = document.paths.len(), "Registering API document");
        if self.documents.insert(key.clone(), document).is_some() {
            tracing::warn!(key = %key, "API document replaced by a later registration");
        }
    }

    /// Assembles the document of `T` and registers it.
    pub fn register_entity<T: CrudEntity>(
        &mut self,
        base_path: &str,
        route_path: &str,
        routes: &[RouteDescriptor],
        version: &str,
    ) {
        let document = DocumentAssembler::new(base_path, route_path, version).assemble::<T>(routes);
        self.register(route_path, version, document);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[must_use]
    pub fn config(&self) -> &CrudConfig {
        &self.config
    }

    /// Ends the write phase.
    #[must_use]
    pub fn freeze(self) -> FrozenRegistry {
        tracing::debug!(documents = self.documents.len(), "Document registry frozen");
        FrozenRegistry {
            config: self.config,
            documents: self.documents,
        }
    }
}

/// Read phase of the registry.
#[derive(Debug, Clone)]
pub struct FrozenRegistry {
    config: CrudConfig,
    documents: IndexMap<DocumentKey, Document>,
}

impl FrozenRegistry {
    /// Looks a document up by its string key `"{route_path}_{version}"`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.documents
            .iter()
            .find_map(|(candidate, document)| candidate.matches(key).then_some(document))
    }

    #[must_use]
    pub fn get_entity(&self, route_path: &str, version: &str) -> Option<&Document> {
        self.documents.get(&DocumentKey::new(route_path, version))
    }

    /// Registered keys, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &DocumentKey> {
        self.documents.keys()
    }

    /// Distinct versions, sorted.
    #[must_use]
    pub fn versions(&self) -> Vec<&str> {
        let mut versions: Vec<&str> = self.documents.keys().map(|key| key.version.as_str()).collect();
        versions.sort_unstable();
        versions.dedup();
        versions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// One merged document per version.
    #[must_use]
    pub fn merged_by_version(&self) -> BTreeMap<String, Document> {
        let mut merged: BTreeMap<String, Document> = BTreeMap::new();
        for (key, document) in &self.documents {
            merged
                .entry(key.version.clone())
                .or_insert_with(|| self.version_document(&key.version))
                .merge_from(document);
        }
        merged
    }

    /// Every registered document merged into one, regardless of version.
    #[must_use]
    pub fn merged_all(&self) -> Document {
        let mut merged = Document::new(
            Info::new(self.config.title.as_str(), MERGED_DESCRIPTION, MERGED_VERSION),
            self.config.base_path(MERGED_BASE_VERSION),
        );
        merged.host = Some(
            self.config
                .host
                .clone()
                .unwrap_or_else(|| MERGED_HOST.to_string()),
        );
        self.apply_transport_defaults(&mut merged);

        for document in self.documents.values() {
            merged.merge_from(document);
        }
        merged
    }

    fn version_document(&self, version: &str) -> Document {
        let mut document = Document::new(
            Info::new(
                format!("{} ({version})", self.config.title),
                format!("Auto-generated API documentation for version {version}"),
                version,
            ),
            self.config.base_path(version),
        );
        document.host.clone_from(&self.config.host);
        self.apply_transport_defaults(&mut document);
        document
    }

    fn apply_transport_defaults(&self, document: &mut Document) {
        document.schemes.clone_from(&self.config.schemes);
        document.consumes = vec![JSON_MIME.to_string()];
        document.produces = vec![JSON_MIME.to_string()];
    }
}
