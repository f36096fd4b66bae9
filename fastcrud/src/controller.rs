//! Generic CRUD controller.
//!
//! [`GenericController`] is transport-agnostic: it takes raw path identifiers and decoded
//! bodies, and returns entities or a [`CrudError`]. The axum handlers in
//! [`router`](crate::router) are thin adapters over it.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::config::CrudConfig;
use crate::entity::CrudEntity;
use crate::errors::CrudError;
use crate::identifier::decode_identifier;
use crate::query::{ListParams, QueryOptions};
use crate::repository::GenericRepository;
use crate::response::Page;
use crate::route::{RouteDescriptor, standard_routes};

/// CRUD operations of entity `T` over repository `R`.
///
/// Holds no per-request state; operations may run concurrently.
pub struct GenericController<T, R> {
    repository: Arc<R>,
    config: CrudConfig,
    _entity: PhantomData<fn() -> T>,
}

impl<T, R> Clone for GenericController<T, R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            config: self.config.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T, R> GenericController<T, R>
where
    T: CrudEntity,
    R: GenericRepository<T, T::Id> + 'static,
{
    pub fn new(repository: Arc<R>, config: CrudConfig) -> Self {
        Self {
            repository,
            config,
            _entity: PhantomData,
        }
    }

    #[must_use]
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    #[must_use]
    pub fn config(&self) -> &CrudConfig {
        &self.config
    }

    /// Validates and stores a new entity; returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// `Validation` when the entity is invalid, `Repository` when the store fails.
    pub async fn create(&self, mut entity: T) -> Result<T, CrudError> {
        tracing::debug!(entity = %T::entity_name(), "create");
        entity.validate()?;
        self.repository.create(&mut entity).await?;
        Ok(entity)
    }

    /// # Errors
    ///
    /// `NotFound` when `raw_id` is empty or no entity is stored under it,
    /// `InvalidParameter` when it cannot be decoded.
    pub async fn get_by_id(&self, raw_id: &str) -> Result<T, CrudError> {
        tracing::debug!(entity = %T::entity_name(), id = raw_id, "get_by_id");
        let id = decode_identifier::<T::Id>(raw_id)?;
        self.repository
            .find_by_id(&id)
            .await?
            .ok_or_else(|| CrudError::not_found("record not found"))
    }

    /// One page of entities with the total count.
    ///
    /// # Errors
    ///
    /// `Repository` when the store fails.
    pub async fn list(&self, params: &ListParams) -> Result<Page<T>, CrudError> {
        let options = QueryOptions::from_params(params, &self.config);
        tracing::debug!(
            entity = %T::entity_name(),
            page = options.page,
            page_size = options.page_size,
            "list"
        );
        let items = self.repository.find(&options).await?;
        let total = self.repository.count(&options).await?;
        Ok(Page::new(items, total, &options))
    }

    /// Replaces the entity stored under `raw_id`. The identifier in the body is ignored.
    ///
    /// # Errors
    ///
    /// `NotFound` when `raw_id` is empty, `Validation` when the entity is invalid,
    /// `InvalidParameter` when `raw_id` cannot be decoded, `Repository` otherwise.
    pub async fn update(&self, raw_id: &str, mut entity: T) -> Result<T, CrudError> {
        tracing::debug!(entity = %T::entity_name(), id = raw_id, "update");
        if raw_id.is_empty() {
            return Err(CrudError::not_found("missing id parameter"));
        }
        entity.validate()?;
        let id = decode_identifier::<T::Id>(raw_id)?;
        entity.set_id(id);
        self.repository.update(&mut entity).await?;
        Ok(entity)
    }

    /// # Errors
    ///
    /// `NotFound` when `raw_id` is empty, `InvalidParameter` when it cannot be decoded,
    /// `Repository` when nothing was deleted or the store fails.
    pub async fn delete(&self, raw_id: &str) -> Result<(), CrudError> {
        tracing::debug!(entity = %T::entity_name(), id = raw_id, "delete");
        let id = decode_identifier::<T::Id>(raw_id)?;
        self.repository.delete_by_id(&id).await?;
        Ok(())
    }

    /// Creates every entity in one transaction; nothing is stored unless all succeed.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for an empty batch, the first `Validation` failure before any
    /// write, or the first repository failure.
    pub async fn batch_create(&self, entities: Vec<T>) -> Result<Vec<T>, CrudError> {
        tracing::debug!(entity = %T::entity_name(), count = entities.len(), "batch_create");
        let mut entities = Self::validated_batch(entities)?;
        self.repository
            .transaction::<_, Vec<T>>(move |tx| {
                Box::pin(async move {
                    tx.batch_create(&mut entities).await?;
                    Ok(entities)
                })
            })
            .await
    }

    /// Updates every entity in one transaction; nothing is changed unless all succeed.
    ///
    /// # Errors
    ///
    /// Same as [`batch_create`](Self::batch_create).
    pub async fn batch_update(&self, entities: Vec<T>) -> Result<Vec<T>, CrudError> {
        tracing::debug!(entity = %T::entity_name(), count = entities.len(), "batch_update");
        let mut entities = Self::validated_batch(entities)?;
        self.repository
            .transaction::<_, Vec<T>>(move |tx| {
                Box::pin(async move {
                    tx.batch_update(&mut entities).await?;
                    Ok(entities)
                })
            })
            .await
    }

    /// Deletes every identifier in one transaction.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when `ids` is empty, or the first repository failure.
    pub async fn batch_delete(&self, ids: Vec<T::Id>) -> Result<(), CrudError> {
        tracing::debug!(entity = %T::entity_name(), count = ids.len(), "batch_delete");
        if ids.is_empty() {
            return Err(CrudError::invalid_parameter("no ids provided"));
        }
        self.repository
            .transaction::<_, ()>(move |tx| {
                Box::pin(async move {
                    tx.batch_delete(&ids).await?;
                    Ok(())
                })
            })
            .await
    }

    /// Route descriptors of the surface this controller serves.
    #[must_use]
    pub fn routes(&self) -> Vec<RouteDescriptor> {
        standard_routes::<T>()
    }

    fn validated_batch(entities: Vec<T>) -> Result<Vec<T>, CrudError> {
        if entities.is_empty() {
            return Err(CrudError::invalid_parameter("no entities provided"));
        }
        for entity in &entities {
            entity.validate()?;
        }
        Ok(entities)
    }
}
