use fastcrud::{
    CrudConfig, CrudEntity, ErrorKind, GenericController, GenericRepository, ListParams,
    QueryOptions, SeaOrmRepository, SortOrder, Validatable,
};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};
use std::sync::Arc;

mod common;

mod product {
    use fastcrud::DescribeSchema;
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(
        Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, DescribeSchema,
    )]
    #[sea_orm(table_name = "products")]
    #[schema(name = "Product")]
    pub struct Model {
        #[sea_orm(primary_key)]
        #[serde(default)]
        pub id: i32,
        #[schema(required)]
        pub name: String,
        #[sea_orm(unique)]
        #[schema(required)]
        pub sku: String,
        pub price_cents: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl Validatable for product::Model {}

impl CrudEntity for product::Model {
    type Id = i32;

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}

type ProductRepository = SeaOrmRepository<product::ActiveModel>;

async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    common::init_tracing();
    let db = Database::connect("sqlite::memory:").await?;
    let backend = db.get_database_backend();
    let schema = sea_orm::Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(product::Entity)))
        .await?;
    Ok(db)
}

fn product(name: &str, sku: &str, price_cents: i64) -> product::Model {
    product::Model {
        id: 0,
        name: name.to_string(),
        sku: sku.to_string(),
        price_cents,
    }
}

async fn setup_controller() -> GenericController<product::Model, ProductRepository> {
    let db = setup_test_db().await.expect("Failed to setup test database");
    GenericController::new(Arc::new(SeaOrmRepository::new(db)), CrudConfig::default())
}

#[tokio::test]
async fn test_crud_round_trip() {
    let controller = setup_controller().await;

    let created = controller
        .create(product("Widget", "W-1", 250))
        .await
        .unwrap();
    assert!(created.id > 0);

    let id = created.id.to_string();
    let fetched = controller.get_by_id(&id).await.unwrap();
    assert_eq!(fetched, created);

    let updated = controller
        .update(&id, product("Widget XL", "W-1", 300))
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(controller.get_by_id(&id).await.unwrap().price_cents, 300);

    controller.delete(&id).await.unwrap();
    let err = controller.get_by_id(&id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_missing_rows_surface_as_not_found() {
    let controller = setup_controller().await;

    let err = controller
        .update("77", product("Ghost", "G-1", 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Repository);
    assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);

    let err = controller.delete("77").await.unwrap_err();
    assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_sorts_by_column() {
    let controller = setup_controller().await;
    for (name, sku, price) in [("B", "S-2", 20), ("A", "S-1", 30), ("C", "S-3", 10)] {
        controller.create(product(name, sku, price)).await.unwrap();
    }

    let params = ListParams {
        sort_by: Some("price_cents".to_string()),
        order: Some("desc".to_string()),
        per_page: Some(2),
        ..ListParams::default()
    };
    let page = controller.list(&params).await.unwrap();
    assert_eq!(page.total, 3);
    let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[tokio::test]
async fn test_unknown_sort_column_orders_by_key() {
    let db = setup_test_db().await.unwrap();
    let repository = ProductRepository::new(db);
    for sku in ["K-1", "K-2", "K-3"] {
        let mut entity = product("p", sku, 1);
        repository.create(&mut entity).await.unwrap();
    }

    let options = QueryOptions {
        sort_by: Some("no_such_column".to_string()),
        order: SortOrder::Desc,
        ..QueryOptions::default()
    };
    let rows = repository.find(&options).await.unwrap();
    let skus: Vec<&str> = rows.iter().map(|p| p.sku.as_str()).collect();
    assert_eq!(skus, vec!["K-3", "K-2", "K-1"]);
}

#[tokio::test]
async fn test_batch_create_rolls_back() {
    let controller = setup_controller().await;

    let batch = vec![
        product("One", "DUP", 1),
        product("Two", "UNIQUE", 2),
        product("Three", "DUP", 3),
    ];
    let err = controller.batch_create(batch).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Repository);

    let page = controller.list(&ListParams::default()).await.unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_batch_create_commits() {
    let controller = setup_controller().await;

    let created = controller
        .batch_create(vec![product("One", "A", 1), product("Two", "B", 2)])
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
    assert_ne!(created[0].id, created[1].id);

    let ids: Vec<i32> = created.iter().map(|p| p.id).collect();
    controller.batch_delete(ids).await.unwrap();
    let page = controller.list(&ListParams::default()).await.unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_model_schema_uses_declared_name() {
    use fastcrud::schema::{DescribeSchema, schema_of};

    assert_eq!(product::Model::entity_name(), "Product");
    assert_eq!(product::Model::schema_name().as_deref(), Some("Product"));
    let schema = schema_of::<product::Model>();
    assert!(schema.is_required("sku"));
    assert!(schema.property("price_cents").is_some());
}
