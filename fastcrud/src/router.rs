//! axum adapters for the generic controller and the document registry.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::controller::GenericController;
use crate::entity::CrudEntity;
use crate::errors::CrudError;
use crate::openapi::{Document, FrozenRegistry};
use crate::query::{ListParams, QueryOptions};
use crate::repository::GenericRepository;
use crate::response::{ApiResponse, Page};

type SharedController<T, R> = State<Arc<GenericController<T, R>>>;

/// Sanitize resource name by removing control characters for HTTP headers
fn sanitize_resource_name(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii() && !c.is_ascii_control()).collect()
}

/// `Content-Range` header of a list response, e.g. `users 0-9/100`.
#[must_use]
pub fn content_range(offset: u64, limit: u64, total_count: u64, resource_name: &str) -> HeaderMap {
    let last = offset.saturating_add(limit).saturating_sub(1).min(total_count.saturating_sub(1));
    let safe_name = sanitize_resource_name(resource_name);

    let mut headers = HeaderMap::new();
    if let Ok(value) = format!("{safe_name} {offset}-{last}/{total_count}").parse() {
        headers.insert("Content-Range", value);
    }
    headers
}

/// Routes of one entity surface mounted at `base_path`, e.g. `/api/v1/users`.
///
/// | Method | Path | Handler |
/// |---|---|---|
/// | GET | `{base}` | list |
/// | POST | `{base}` | create |
/// | POST, PUT, DELETE | `{base}/batch` | batch create, update, delete |
/// | GET, PUT, DELETE | `{base}/{id}` | get, update, delete |
pub fn crud_router<T, R>(controller: Arc<GenericController<T, R>>, base_path: &str) -> Router
where
    T: CrudEntity,
    R: GenericRepository<T, T::Id> + 'static,
{
    let base = format!("/{}", base_path.trim_matches('/'));
    Router::new()
        .route(&base, get(list_handler::<T, R>).post(create_handler::<T, R>))
        .route(
            &format!("{base}/batch"),
            axum::routing::post(batch_create_handler::<T, R>)
                .put(batch_update_handler::<T, R>)
                .delete(batch_delete_handler::<T, R>),
        )
        .route(
            &format!("{base}/{{id}}"),
            get(get_one_handler::<T, R>)
                .put(update_handler::<T, R>)
                .delete(delete_handler::<T, R>),
        )
        .with_state(controller)
}

async fn list_handler<T, R>(
    State(controller): SharedController<T, R>,
    Query(params): Query<ListParams>,
) -> Result<(HeaderMap, Json<ApiResponse<Page<T>>>), CrudError>
where
    T: CrudEntity,
    R: GenericRepository<T, T::Id> + 'static,
{
    let page = controller.list(&params).await?;
    let options = QueryOptions::from_params(&params, controller.config());
    let headers = content_range(
        options.offset(),
        options.limit(),
        page.total,
        &T::entity_name(),
    );
    Ok((headers, Json(ApiResponse::success(page))))
}

async fn get_one_handler<T, R>(
    State(controller): SharedController<T, R>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<T>>, CrudError>
where
    T: CrudEntity,
    R: GenericRepository<T, T::Id> + 'static,
{
    let entity = controller.get_by_id(&id).await?;
    Ok(Json(ApiResponse::success(entity)))
}

async fn create_handler<T, R>(
    State(controller): SharedController<T, R>,
    Json(entity): Json<T>,
) -> Result<(StatusCode, Json<ApiResponse<T>>), CrudError>
where
    T: CrudEntity,
    R: GenericRepository<T, T::Id> + 'static,
{
    let entity = controller.create(entity).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(entity))))
}

async fn update_handler<T, R>(
    State(controller): SharedController<T, R>,
    Path(id): Path<String>,
    Json(entity): Json<T>,
) -> Result<Json<ApiResponse<T>>, CrudError>
where
    T: CrudEntity,
    R: GenericRepository<T, T::Id> + 'static,
{
    let entity = controller.update(&id, entity).await?;
    Ok(Json(ApiResponse::success(entity)))
}

async fn delete_handler<T, R>(
    State(controller): SharedController<T, R>,
    Path(id): Path<String>,
) -> Result<StatusCode, CrudError>
where
    T: CrudEntity,
    R: GenericRepository<T, T::Id> + 'static,
{
    controller.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn batch_create_handler<T, R>(
    State(controller): SharedController<T, R>,
    Json(entities): Json<Vec<T>>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<T>>>), CrudError>
where
    T: CrudEntity,
    R: GenericRepository<T, T::Id> + 'static,
{
    let entities = controller.batch_create(entities).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(entities))))
}

async fn batch_update_handler<T, R>(
    State(controller): SharedController<T, R>,
    Json(entities): Json<Vec<T>>,
) -> Result<Json<ApiResponse<Vec<T>>>, CrudError>
where
    T: CrudEntity,
    R: GenericRepository<T, T::Id> + 'static,
{
    let entities = controller.batch_update(entities).await?;
    Ok(Json(ApiResponse::success(entities)))
}

async fn batch_delete_handler<T, R>(
    State(controller): SharedController<T, R>,
    Json(ids): Json<Vec<T::Id>>,
) -> Result<StatusCode, CrudError>
where
    T: CrudEntity,
    R: GenericRepository<T, T::Id> + 'static,
{
    controller.batch_delete(ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Documentation routes: `GET {docs_path}` answers the merged document of every version,
/// `GET {docs_path}/{key}` one registered document by its `{route_path}_{version}` key.
pub fn docs_router(registry: Arc<FrozenRegistry>, docs_path: &str) -> Router {
    let base = format!("/{}", docs_path.trim_matches('/'));
    Router::new()
        .route(&base, get(merged_docs_handler))
        .route(&format!("{base}/{{key}}"), get(document_handler))
        .with_state(registry)
}

async fn merged_docs_handler(
    State(registry): State<Arc<FrozenRegistry>>,
) -> Json<BTreeMap<String, Document>> {
    Json(registry.merged_by_version())
}

async fn document_handler(
    State(registry): State<Arc<FrozenRegistry>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, CrudError> {
    registry
        .get(&key)
        .map(|document| Json(document.clone()))
        .ok_or_else(|| CrudError::not_found(format!("no API document registered as {key}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_range_normal() {
        let headers = content_range(0, 10, 100, "users");
        let value = headers.get("Content-Range").unwrap().to_str().unwrap();
        assert_eq!(value, "users 0-9/100");
    }

    #[test]
    fn test_content_range_last_page() {
        let headers = content_range(95, 10, 100, "users");
        let value = headers.get("Content-Range").unwrap().to_str().unwrap();
        assert_eq!(value, "users 95-99/100");
    }

    #[test]
    fn test_content_range_strips_control_characters() {
        let headers = content_range(0, 10, 100, "users\r\nInjected: evil");
        let value = headers.get("Content-Range").unwrap().to_str().unwrap();
        assert!(!value.contains('\r'));
        assert!(!value.contains('\n'));
    }

    #[test]
    fn test_content_range_zero_items() {
        let headers = content_range(0, 10, 0, "users");
        let value = headers.get("Content-Range").unwrap().to_str().unwrap();
        assert_eq!(value, "users 0-0/0");
    }

    #[test]
    fn test_content_range_large_numbers() {
        let headers = content_range(u64::MAX - 100, 10, u64::MAX, "users");
        assert!(headers.get("Content-Range").is_some());
    }
}
