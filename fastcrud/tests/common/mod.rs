#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use fastcrud::validation::{ValidationErrors, validate_required_fields, validators};
use fastcrud::{
    ApiBuilder, CrudConfig, CrudEntity, DescribeSchema, FrozenRegistry, MemoryRepository,
    Validatable,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Once};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, DescribeSchema)]
pub struct User {
    #[serde(default)]
    pub id: u64,
    #[schema(required)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Validatable for User {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_required_fields(self)?;
        if let Some(email) = &self.email {
            validators::validate_email("email", email)?;
        }
        Ok(())
    }
}

impl CrudEntity for User {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, DescribeSchema)]
pub struct Order {
    #[serde(default)]
    pub id: u64,
    #[schema(required, example = "widget")]
    pub item: String,
    #[serde(default)]
    pub quantity: u32,
}

pub const MAX_ORDER_QUANTITY: u32 = 1000;

impl Validatable for Order {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_required_fields(self)?;
        validators::validate_length("item", &self.item, None, Some(64))?;
        validators::validate_range("quantity", self.quantity, Some(1), Some(MAX_ORDER_QUANTITY))?;
        Ok(())
    }
}

impl CrudEntity for Order {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, DescribeSchema)]
pub struct Note {
    #[serde(default)]
    pub id: Uuid,
    #[schema(required)]
    pub body: String,
}

impl Validatable for Note {}

impl CrudEntity for Note {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

pub fn user(name: &str) -> User {
    User {
        id: 0,
        name: name.to_string(),
        email: None,
    }
}

pub fn order(item: &str, quantity: u32) -> Order {
    Order {
        id: 0,
        item: item.to_string(),
        quantity,
    }
}

pub fn note(body: &str) -> Note {
    Note {
        id: Uuid::nil(),
        body: body.to_string(),
    }
}

static TRACING: Once = Once::new();

/// Installs a test writer subscriber once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Users and notes under v1, orders under v2, on in-memory repositories.
pub fn setup_test_app() -> (Router, Arc<FrozenRegistry>) {
    init_tracing();
    ApiBuilder::new(CrudConfig::default().with_title("Test API"))
        .version("v1")
        .entity::<User, _>("users", Arc::new(MemoryRepository::new()))
        .entity::<Note, _>("notes", Arc::new(MemoryRepository::new()))
        .version("v2")
        .entity::<Order, _>("orders", Arc::new(MemoryRepository::new()))
        .build()
}

pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
