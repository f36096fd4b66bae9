//! Minimal CRUD API Example with Axum
//!
//! ```bash
//! cargo run --example minimal
//! ```
//!
//! Then visit:
//! - **API**: <http://localhost:3000/api/v1/todos>
//! - **Documentation**: <http://localhost:3000/swagger>

use fastcrud::validation::{ValidationErrors, validate_required_fields, validators};
use fastcrud::{ApiBuilder, CrudConfig, CrudEntity, DescribeSchema, MemoryRepository, Validatable};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Debug, Serialize, Deserialize, DescribeSchema)]
pub struct Todo {
    #[serde(default)]
    pub id: u64,
    /// What needs doing
    #[schema(required, example = "Water the plants")]
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Validatable for Todo {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_required_fields(self)?;
        validators::validate_length("title", &self.title, None, Some(200))?;
        Ok(())
    }
}

impl CrudEntity for Todo {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .compact()
        .init();

    let config = CrudConfig::default()
        .with_title("Todo API")
        .with_host("localhost:3000");

    let (app, _docs) = ApiBuilder::new(config)
        .version("v1")
        .entity::<Todo, _>("todos", Arc::new(MemoryRepository::new()))
        .build();

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    println!("API: http://0.0.0.0:3000/api/v1/todos\nDocs: http://0.0.0.0:3000/swagger");
    axum::serve(listener, app).await?;
    Ok(())
}
