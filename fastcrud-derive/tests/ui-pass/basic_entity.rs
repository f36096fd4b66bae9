use fastcrud::DescribeSchema;
use fastcrud::schema::{SchemaKind, schema_of};
use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, DescribeSchema)]
pub struct User {
    pub id: u64,
    #[schema(required)]
    pub name: String,
}

fn main() {
    let schema = schema_of::<User>();
    assert_eq!(schema.kind, Some(SchemaKind::Object));
    assert_eq!(schema.required, vec!["name".to_string()]);
    assert_eq!(<User as fastcrud::schema::DescribeSchema>::schema_name().as_deref(), Some("User"));
}
