use fastcrud::DescribeSchema;
use serde::Serialize;

#[derive(Serialize, DescribeSchema)]
pub struct Tag {
    pub label: String,
}

#[derive(Serialize, DescribeSchema)]
pub struct Envelope<'a, T> {
    pub data: T,
    pub note: &'a str,
}

#[derive(Serialize, DescribeSchema)]
#[schema(name = "Marker")]
pub struct Empty;

fn main() {
    assert_eq!(Envelope::<Tag>::schema_name().as_deref(), Some("EnvelopeTag"));
    assert!(Envelope::<String>::schema_name().is_none());
    assert_eq!(Empty::schema_name().as_deref(), Some("Marker"));
}
