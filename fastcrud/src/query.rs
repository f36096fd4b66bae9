use serde::{Deserialize, Serialize};

use crate::config::CrudConfig;

/// Query parameters of the list endpoint.
///
/// # Pagination
/// `page` is 1-based; `per_page` is clamped to the configured maximum, for example:
/// `?page=2&per_page=20`
///
/// # Sorting
/// `sort_by` names a serialized field, `order` is `ASC` or `DESC` (case-insensitive), for
/// example: `?sort_by=name&order=desc`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Number of items per page.
    pub per_page: Option<u64>,
    /// Field to sort by.
    pub sort_by: Option<String>,
    /// Sort order (ASC or DESC).
    pub order: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Anything but a case-insensitive `DESC` sorts ascending.
    #[must_use]
    pub fn parse(order: &str) -> Self {
        if order.trim().eq_ignore_ascii_case("DESC") {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

/// Normalized list request handed to the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// 1-based page number
    pub page: u64,
    pub page_size: u64,
    pub sort_by: Option<String>,
    pub order: SortOrder,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            sort_by: None,
            order: SortOrder::Asc,
        }
    }
}

impl QueryOptions {
    #[must_use]
    pub fn from_params(params: &ListParams, config: &CrudConfig) -> Self {
        let max_page_size = config.max_page_size.max(1);
        let page_size = params
            .per_page
            .unwrap_or(config.default_page_size)
            .clamp(1, max_page_size);

        Self {
            page: params.page.unwrap_or(1).max(1),
            page_size,
            sort_by: params
                .sort_by
                .as_deref()
                .map(str::trim)
                .filter(|column| !column.is_empty())
                .map(str::to_string),
            order: params.order.as_deref().map(SortOrder::parse).unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    #[must_use]
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}
