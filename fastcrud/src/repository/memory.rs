use async_trait::async_trait;
use sea_orm::DbErr;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{GenericRepository, ScopedFuture};
use crate::entity::CrudEntity;
use crate::errors::CrudError;
use crate::identifier::EntityId;
use crate::query::{QueryOptions, SortOrder};

/// In-process repository backed by an ordered map.
///
/// Unset identifiers (zero, nil UUID) are assigned on create: integers from an increasing
/// sequence, UUIDs at random. Transactions stage their writes on a snapshot that replaces
/// the live state only when the unit of work succeeds.
pub struct MemoryRepository<T: CrudEntity> {
    state: RwLock<MemoryState<T>>,
}

struct MemoryState<T: CrudEntity> {
    rows: BTreeMap<T::Id, T>,
    sequence: u64,
}

impl<T: CrudEntity> Clone for MemoryState<T> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            sequence: self.sequence,
        }
    }
}

impl<T: CrudEntity> MemoryState<T> {
    fn not_found() -> DbErr {
        DbErr::RecordNotFound(format!("{} not found", T::entity_name()))
    }

    fn next_id(&mut self) -> Result<T::Id, DbErr> {
        loop {
            self.sequence = self
                .sequence
                .checked_add(1)
                .ok_or_else(|| DbErr::Custom("identifier sequence exhausted".to_string()))?;
            let candidate = T::Id::generate(self.sequence)
                .ok_or_else(|| DbErr::Custom("identifier sequence exhausted".to_string()))?;
            if !self.rows.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
    }

    fn insert(&mut self, entity: &mut T) -> Result<(), DbErr> {
        let mut id = entity.id();
        if id.is_unset() {
            id = self.next_id()?;
            entity.set_id(id.clone());
        } else if self.rows.contains_key(&id) {
            return Err(DbErr::Custom(format!(
                "duplicate {} id {id}",
                T::entity_name()
            )));
        }
        self.rows.insert(id, entity.clone());
        Ok(())
    }

    fn replace(&mut self, entity: &T) -> Result<(), DbErr> {
        let slot = self.rows.get_mut(&entity.id()).ok_or_else(Self::not_found)?;
        *slot = entity.clone();
        Ok(())
    }

    fn remove(&mut self, id: &T::Id) -> Result<(), DbErr> {
        self.rows.remove(id).map(|_| ()).ok_or_else(Self::not_found)
    }
}

impl<T: CrudEntity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CrudEntity> MemoryRepository<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::from_state(MemoryState {
            rows: BTreeMap::new(),
            sequence: 0,
        })
    }

    fn from_state(state: MemoryState<T>) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Number of stored entities.
    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.rows.is_empty()
    }
}

/// Orders JSON values of one field: null first, then booleans, numbers and strings by
/// value. Mixed or structured values compare by their text.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => match (a.as_u64(), b.as_u64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => a
                .as_f64()
                .partial_cmp(&b.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn sorted_page<T: CrudEntity>(rows: &BTreeMap<T::Id, T>, options: &QueryOptions) -> Result<Vec<T>, DbErr> {
    let mut entities: Vec<&T> = rows.values().collect();

    if let Some(column) = &options.sort_by {
        let mut keyed = entities
            .into_iter()
            .map(|entity| {
                let value = serde_json::to_value(entity)
                    .map_err(|err| DbErr::Custom(format!("cannot sort by {column}: {err}")))?;
                Ok((value.get(column).cloned().unwrap_or(Value::Null), entity))
            })
            .collect::<Result<Vec<_>, DbErr>>()?;
        keyed.sort_by(|(a, _), (b, _)| compare_values(a, b));
        entities = keyed.into_iter().map(|(_, entity)| entity).collect();
    }

    if options.order == SortOrder::Desc {
        entities.reverse();
    }

    let offset = usize::try_from(options.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(options.limit()).unwrap_or(usize::MAX);
    Ok(entities.into_iter().skip(offset).take(limit).cloned().collect())
}

#[async_trait]
impl<T: CrudEntity> GenericRepository<T, T::Id> for MemoryRepository<T> {
    async fn create(&self, entity: &mut T) -> Result<(), DbErr> {
        self.state.write().await.insert(entity)
    }

    async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>, DbErr> {
        Ok(self.state.read().await.rows.get(id).cloned())
    }

    async fn find(&self, options: &QueryOptions) -> Result<Vec<T>, DbErr> {
        sorted_page(&self.state.read().await.rows, options)
    }

    async fn count(&self, _options: &QueryOptions) -> Result<u64, DbErr> {
        Ok(self.state.read().await.rows.len() as u64)
    }

    async fn update(&self, entity: &mut T) -> Result<(), DbErr> {
        self.state.write().await.replace(entity)
    }

    async fn delete_by_id(&self, id: &T::Id) -> Result<(), DbErr> {
        self.state.write().await.remove(id)
    }

    async fn transaction<F, R>(&self, work: F) -> Result<R, CrudError>
    where
        F: for<'c> FnOnce(&'c dyn GenericRepository<T, T::Id>) -> ScopedFuture<'c, R> + Send,
        R: Send,
        Self: Sized,
    {
        let mut live = self.state.write().await;
        let staged = Self::from_state(live.clone());

        let outcome = work(&staged).await;
        match outcome {
            Ok(value) => {
                *live = staged.state.into_inner();
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(error = %err, "Memory transaction discarded");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DescribeSchema, Schema, SchemaGenerator};
    use crate::validation::Validatable;
    use serde::{Deserialize, Serialize};
    use std::borrow::Cow;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: u32,
        name: String,
        rank: i64,
    }

    impl DescribeSchema for Item {
        fn schema_name() -> Option<Cow<'static, str>> {
            Some(Cow::Borrowed("Item"))
        }

        fn describe_schema(generator: &mut SchemaGenerator) -> Schema {
            let mut schema = Schema::object();
            schema.insert_property("id", generator.subschema_for::<u32>());
            schema.insert_property("name", generator.subschema_for::<String>());
            schema.insert_property("rank", generator.subschema_for::<i64>());
            schema
        }
    }

    impl Validatable for Item {}

    impl CrudEntity for Item {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }

        fn set_id(&mut self, id: u32) {
            self.id = id;
        }
    }

    fn item(id: u32, name: &str, rank: i64) -> Item {
        Item {
            id,
            name: name.to_string(),
            rank,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids() {
        let repo = MemoryRepository::<Item>::new();
        let mut explicit = item(2, "explicit", 0);
        repo.create(&mut explicit).await.unwrap();

        let mut first = item(0, "first", 0);
        let mut second = item(0, "second", 0);
        repo.create(&mut first).await.unwrap();
        repo.create(&mut second).await.unwrap();

        // sequence skips the taken id 2
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 3);
        assert_eq!(repo.len().await, 3);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let repo = MemoryRepository::<Item>::new();
        repo.create(&mut item(5, "a", 0)).await.unwrap();
        let err = repo.create(&mut item(5, "b", 0)).await.unwrap_err();
        assert!(matches!(err, DbErr::Custom(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let repo = MemoryRepository::<Item>::new();
        let err = repo.update(&mut item(9, "ghost", 0)).await.unwrap_err();
        assert_eq!(err, DbErr::RecordNotFound("Item not found".to_string()));
        let err = repo.delete_by_id(&9).await.unwrap_err();
        assert!(matches!(err, DbErr::RecordNotFound(_)));
    }

    #[tokio::test]
    async fn test_find_sorts_and_paginates() {
        let repo = MemoryRepository::<Item>::new();
        for (name, rank) in [("c", 30), ("a", 10), ("b", 20), ("d", 5)] {
            repo.create(&mut item(0, name, rank)).await.unwrap();
        }

        let options = QueryOptions {
            sort_by: Some("rank".to_string()),
            order: SortOrder::Desc,
            page: 1,
            page_size: 2,
        };
        let names: Vec<String> = repo.find(&options).await.unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["c", "b"]);

        let options = QueryOptions {
            sort_by: Some("name".to_string()),
            page: 2,
            page_size: 3,
            ..QueryOptions::default()
        };
        let names: Vec<String> = repo.find(&options).await.unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["d"]);
        assert_eq!(repo.count(&options).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_transaction_commits_on_ok() {
        let repo = MemoryRepository::<Item>::new();
        let created = repo
            .transaction::<_, u32>(|tx| {
                Box::pin(async move {
                    let mut entity = item(0, "in tx", 1);
                    tx.create(&mut entity).await?;
                    Ok(entity.id)
                })
            })
            .await
            .unwrap();
        assert!(repo.find_by_id(&created).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_transaction_discards_on_err() {
        let repo = MemoryRepository::<Item>::new();
        let result = repo
            .transaction::<_, ()>(|tx| {
                Box::pin(async move {
                    tx.create(&mut item(0, "staged", 1)).await?;
                    Err(CrudError::invalid_parameter("abort"))
                })
            })
            .await;
        assert!(result.is_err());
        assert!(repo.is_empty().await);
    }
}
