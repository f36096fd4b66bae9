//! # fastcrud
//!
//! Generic REST CRUD endpoints and Swagger 2.0 documents synthesized from entity types.
//!
//! Define an entity once; derive its schema; get list, get, create, update, delete and
//! transactional batch routes for axum, plus a versioned API document describing them.
//!
//! ```rust,ignore
//! use fastcrud::{ApiBuilder, CrudConfig, CrudEntity, DescribeSchema, MemoryRepository, Validatable};
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Clone, Serialize, Deserialize, DescribeSchema)]
//! pub struct User {
//!     pub id: u64,
//!     #[schema(required)]
//!     pub name: String,
//! }
//!
//! impl Validatable for User {}
//!
//! impl CrudEntity for User {
//!     type Id = u64;
//!     fn id(&self) -> u64 { self.id }
//!     fn set_id(&mut self, id: u64) { self.id = id; }
//! }
//!
//! let (app, docs) = ApiBuilder::new(CrudConfig::default())
//!     .version("v1")
//!     .entity::<User, _>("users", Arc::new(MemoryRepository::new()))
//!     .build();
//! // GET /api/v1/users, GET /api/v1/users/{id}, ... and GET /swagger
//! ```
//!
//! ## Modules
//!
//! - [`schema`]: type-to-schema synthesis (`DescribeSchema`, `SchemaGenerator`)
//! - [`openapi`]: operations, per-entity documents and the versioned registry
//! - [`controller`]: CRUD orchestration and identifier decoding
//! - [`repository`]: storage contract, in-memory and sea-orm implementations
//! - [`router`], [`app`]: axum wiring

pub mod app;
pub mod config;
pub mod controller;
pub mod entity;
pub mod errors;
pub mod identifier;
pub mod openapi;
pub mod query;
pub mod repository;
pub mod response;
pub mod route;
pub mod router;
pub mod schema;
pub mod validation;

#[cfg(feature = "derive")]
pub use fastcrud_derive::DescribeSchema;

pub use app::ApiBuilder;
pub use config::CrudConfig;
pub use controller::GenericController;
pub use entity::CrudEntity;
pub use errors::{CrudError, ErrorKind};
pub use identifier::{EntityId, IdKind, Identifier, decode_identifier};
pub use openapi::{Document, DocumentAssembler, DocumentRegistry, FrozenRegistry, OperationBuilder};
pub use query::{ListParams, QueryOptions, SortOrder};
pub use repository::{GenericRepository, MemoryRepository, SeaOrmRepository};
pub use response::{ApiResponse, Page};
pub use route::{Method, RouteDescriptor, standard_routes};
pub use router::{crud_router, docs_router};
pub use schema::{DescribeSchema, Schema, SchemaGenerator, SchemaKind, schema_of};
pub use validation::{Validatable, ValidationError, ValidationErrors};
