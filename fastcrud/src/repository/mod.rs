//! Storage contract driven by the generic controller.
//!
//! Two implementations ship with the crate: [`MemoryRepository`] keeps entities in process,
//! [`SeaOrmRepository`] maps them onto a sea-orm entity.

mod memory;
mod orm;

use async_trait::async_trait;
use sea_orm::DbErr;
use std::future::Future;
use std::pin::Pin;

use crate::errors::CrudError;
use crate::query::QueryOptions;

pub use memory::MemoryRepository;
pub use orm::{ModelOf, SeaOrmRepository};

/// Future returned by the unit of work passed to [`GenericRepository::transaction`].
pub type ScopedFuture<'a, R> = Pin<Box<dyn Future<Output = Result<R, CrudError>> + Send + 'a>>;

/// Persistence operations over entities of type `T` identified by `Id`.
///
/// Missing records are reported as `DbErr::RecordNotFound` by `update` and
/// `delete_by_id`, and as `Ok(None)` by `find_by_id`.
#[async_trait]
pub trait GenericRepository<T, Id>: Send + Sync
where
    T: Send + Sync + 'static,
    Id: Send + Sync + 'static,
{
    /// Stores a new entity. Implementations may assign its identifier.
    async fn create(&self, entity: &mut T) -> Result<(), DbErr>;

    async fn find_by_id(&self, id: &Id) -> Result<Option<T>, DbErr>;

    /// One page of entities, sorted and sliced per `options`.
    async fn find(&self, options: &QueryOptions) -> Result<Vec<T>, DbErr>;

    /// Total number of entities, ignoring pagination.
    async fn count(&self, options: &QueryOptions) -> Result<u64, DbErr>;

    async fn update(&self, entity: &mut T) -> Result<(), DbErr>;

    async fn delete_by_id(&self, id: &Id) -> Result<(), DbErr>;

    async fn batch_create(&self, entities: &mut [T]) -> Result<(), DbErr> {
        for entity in entities.iter_mut() {
            self.create(entity).await?;
        }
        Ok(())
    }

    async fn batch_update(&self, entities: &mut [T]) -> Result<(), DbErr> {
        for entity in entities.iter_mut() {
            self.update(entity).await?;
        }
        Ok(())
    }

    async fn batch_delete(&self, ids: &[Id]) -> Result<(), DbErr> {
        for id in ids {
            self.delete_by_id(id).await?;
        }
        Ok(())
    }

    /// Runs `work` against a handle scoped to one atomic unit of work.
    ///
    /// Everything `work` does through the handle is committed if it returns `Ok`, and
    /// discarded otherwise. The error of `work` is returned unchanged; failures to begin
    /// or commit surface as `CrudError::Repository`.
    async fn transaction<F, R>(&self, work: F) -> Result<R, CrudError>
    where
        F: for<'c> FnOnce(&'c dyn GenericRepository<T, Id>) -> ScopedFuture<'c, R> + Send,
        R: Send,
        Self: Sized;
}
