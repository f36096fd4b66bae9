use fastcrud::DescribeSchema;
use fastcrud::schema::schema_of;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, DescribeSchema)]
pub struct Audit {
    #[schema(required)]
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Serialize, Deserialize, DescribeSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: uuid::Uuid,
    /// Headline shown in listings
    #[schema(required, example = "Hello")]
    pub title: String,
    #[serde(rename = "body_text")]
    pub body: String,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(skip)]
    pub cache_key: String,
    #[schema(example = -3)]
    pub score: i32,
}

fn main() {
    let schema = schema_of::<Article>();
    assert!(schema.property("title").is_some());
    assert!(schema.property("body_text").is_some());
    assert!(schema.property("created_at").is_some());
    assert!(schema.property("audit").is_none());
    assert!(schema.property("cacheKey").is_none());
    assert!(schema.is_required("created_at"));
}
