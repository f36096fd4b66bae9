use serde::{Deserialize, Serialize};

/// Library level settings shared by the controllers and the documentation registry.
///
/// Deserializable so it can live inside an application's own configuration file; every
/// field falls back to its default when absent.
///
/// ```rust,ignore
/// let config = CrudConfig::default()
///     .with_api_prefix("/api")
///     .with_title("Inventory API")
///     .with_max_page_size(50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrudConfig {
    /// Prefix every versioned surface is mounted under, e.g. `/api` -> `/api/v1/users`
    pub api_prefix: String,
    /// Path of the documentation endpoint
    pub docs_path: String,
    pub default_page_size: u64,
    pub max_page_size: u64,
    /// Title of the merged per-version documents
    pub title: String,
    /// Host advertised by the merged per-version documents
    pub host: Option<String>,
    pub schemes: Vec<String>,
}

impl Default for CrudConfig {
    fn default() -> Self {
        Self {
            api_prefix: "/api".to_string(),
            docs_path: "/swagger".to_string(),
            default_page_size: 10,
            max_page_size: 100,
            title: "Fast CRUD API".to_string(),
            host: None,
            schemes: vec!["http".to_string()],
        }
    }
}

impl CrudConfig {
    #[must_use]
    pub fn with_api_prefix(mut self, api_prefix: impl Into<String>) -> Self {
        self.api_prefix = api_prefix.into();
        self
    }

    #[must_use]
    pub fn with_docs_path(mut self, docs_path: impl Into<String>) -> Self {
        self.docs_path = docs_path.into();
        self
    }

    #[must_use]
    pub fn with_default_page_size(mut self, size: u64) -> Self {
        self.default_page_size = size;
        self
    }

    #[must_use]
    pub fn with_max_page_size(mut self, size: u64) -> Self {
        self.max_page_size = size;
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn with_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    /// Mount point of a version: `{api_prefix}/{version}`.
    #[must_use]
    pub fn base_path(&self, version: &str) -> String {
        format!(
            "{}/{}",
            self.api_prefix.trim_end_matches('/'),
            version.trim_matches('/')
        )
    }
}
