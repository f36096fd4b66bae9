use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::query::QueryOptions;
use crate::schema::{DescribeSchema, Schema, SchemaGenerator};

/// Success envelope of every HTTP response body.
///
/// ```json
/// {"code": 0, "message": "success", "data": {"id": 1, "name": "Ada"}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            message: "success".to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            code: 0,
            message: "success".to_string(),
            data: None,
        }
    }
}

/// One page of a list result, with the total number of matching records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, options: &QueryOptions) -> Self {
        Self {
            items,
            total,
            page: options.page,
            page_size: options.page_size,
        }
    }
}

impl<T: DescribeSchema> DescribeSchema for Page<T> {
    fn schema_name() -> Option<Cow<'static, str>> {
        let item = T::schema_name()?;
        Some(Cow::Owned(format!("Page{item}")))
    }

    fn describe_schema(generator: &mut SchemaGenerator) -> Schema {
        let mut schema = Schema::object();
        schema.insert_property("items", generator.subschema_for::<Vec<T>>());
        for name in ["total", "page", "page_size"] {
            schema.insert_property(name, generator.subschema_for::<u64>());
        }
        for name in ["items", "total", "page", "page_size"] {
            schema.mark_required(name);
        }
        schema
    }
}
