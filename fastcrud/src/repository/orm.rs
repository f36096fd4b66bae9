use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, IntoActiveModel, Iterable, Order, PaginatorTrait, PrimaryKeyToColumn,
    PrimaryKeyTrait, QueryOrder, QuerySelect, TransactionTrait,
};
use std::marker::PhantomData;
use std::str::FromStr;

use super::{GenericRepository, ScopedFuture};
use crate::entity::CrudEntity;
use crate::errors::CrudError;
use crate::identifier::{EntityId, IdKind};
use crate::query::{QueryOptions, SortOrder};

/// The model type of the sea-orm entity behind active model `A`.
pub type ModelOf<A> = <<A as ActiveModelTrait>::Entity as EntityTrait>::Model;

type IdOf<A> = <ModelOf<A> as CrudEntity>::Id;
type ColumnOf<A> = <<A as ActiveModelTrait>::Entity as EntityTrait>::Column;
type PrimaryKeyOf<A> = <<A as ActiveModelTrait>::Entity as EntityTrait>::PrimaryKey;
type KeyValueOf<A> = <PrimaryKeyOf<A> as PrimaryKeyTrait>::ValueType;

/// Repository over a sea-orm entity, addressed through its active model `A`.
///
/// The served entity is the sea-orm model itself, so it has to implement [`CrudEntity`].
/// `C` is the connection: a pooled [`DatabaseConnection`], or the [`DatabaseTransaction`]
/// handed to units of work.
///
/// ```rust,ignore
/// let db = Database::connect("sqlite::memory:").await?;
/// let repository = Arc::new(SeaOrmRepository::<todo::ActiveModel>::new(db));
/// ```
pub struct SeaOrmRepository<A, C = DatabaseConnection> {
    connection: C,
    _active_model: PhantomData<fn() -> A>,
}

impl<A, C> SeaOrmRepository<A, C> {
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            _active_model: PhantomData,
        }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }
}

/// Unset UUID keys are generated here; unset auto-increment keys are left to the database.
/// Any other key is inserted as given.
fn prepare_insert<A>(entity: &mut ModelOf<A>) -> A
where
    A: ActiveModelTrait,
    ModelOf<A>: CrudEntity + IntoActiveModel<A>,
{
    let unset = entity.id().is_unset();
    let kind = <IdOf<A> as EntityId>::KIND;
    if unset
        && kind == IdKind::Uuid
        && let Some(id) = <IdOf<A> as EntityId>::generate(0)
    {
        entity.set_id(id);
    }

    let mut active = entity.clone().into_active_model();
    if unset && kind == IdKind::Integer && <PrimaryKeyOf<A> as PrimaryKeyTrait>::auto_increment() {
        for key in <PrimaryKeyOf<A> as Iterable>::iter() {
            active.not_set(key.into_column());
        }
    }
    active
}

fn not_found<T: CrudEntity>() -> DbErr {
    DbErr::RecordNotFound(format!("{} not found", T::entity_name()))
}

fn sea_order(order: SortOrder) -> Order {
    match order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    }
}

#[async_trait]
impl<A, C> GenericRepository<ModelOf<A>, IdOf<A>> for SeaOrmRepository<A, C>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + Sync + 'static,
    ModelOf<A>: CrudEntity + IntoActiveModel<A>,
    KeyValueOf<A>: From<IdOf<A>>,
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn create(&self, entity: &mut ModelOf<A>) -> Result<(), DbErr> {
        let active = prepare_insert::<A>(entity);
        *entity = active.insert(&self.connection).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &IdOf<A>) -> Result<Option<ModelOf<A>>, DbErr> {
        A::Entity::find_by_id(id.clone()).one(&self.connection).await
    }

    async fn find(&self, options: &QueryOptions) -> Result<Vec<ModelOf<A>>, DbErr> {
        let order = sea_order(options.order);
        let mut select = A::Entity::find();

        let column = options
            .sort_by
            .as_deref()
            .and_then(|name| <ColumnOf<A> as FromStr>::from_str(name).ok());
        match column {
            Some(column) => select = select.order_by(column, order),
            None => {
                if let Some(name) = &options.sort_by {
                    tracing::debug!(column = %name, "Unknown sort column, ordering by primary key");
                }
                for key in <PrimaryKeyOf<A> as Iterable>::iter() {
                    select = select.order_by(key.into_column(), order.clone());
                }
            }
        }

        select
            .offset(options.offset())
            .limit(options.limit())
            .all(&self.connection)
            .await
    }

    async fn count(&self, _options: &QueryOptions) -> Result<u64, DbErr> {
        PaginatorTrait::count(A::Entity::find(), &self.connection).await
    }

    async fn update(&self, entity: &mut ModelOf<A>) -> Result<(), DbErr> {
        let active = entity.clone().into_active_model().reset_all();
        *entity = active.update(&self.connection).await.map_err(|err| match err {
            DbErr::RecordNotUpdated => not_found::<ModelOf<A>>(),
            other => other,
        })?;
        Ok(())
    }

    async fn delete_by_id(&self, id: &IdOf<A>) -> Result<(), DbErr> {
        let result = A::Entity::delete_by_id(id.clone())
            .exec(&self.connection)
            .await?;
        match result.rows_affected {
            0 => Err(not_found::<ModelOf<A>>()),
            _ => Ok(()),
        }
    }

    async fn transaction<F, R>(&self, work: F) -> Result<R, CrudError>
    where
        F: for<'c> FnOnce(&'c dyn GenericRepository<ModelOf<A>, IdOf<A>>) -> ScopedFuture<'c, R>
            + Send,
        R: Send,
        Self: Sized,
    {
        let scoped = SeaOrmRepository::<A, DatabaseTransaction>::new(self.connection.begin().await?);

        let outcome = work(&scoped).await;
        match outcome {
            Ok(value) => {
                scoped.connection.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = scoped.connection.rollback().await {
                    tracing::error!(error = ?rollback, "Transaction rollback failed");
                }
                Err(err)
            }
        }
    }
}
