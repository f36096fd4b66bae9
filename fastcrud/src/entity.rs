use serde::{Serialize, de::DeserializeOwned};
use std::borrow::Cow;

use crate::identifier::EntityId;
use crate::schema::DescribeSchema;
use crate::validation::Validatable;

/// A type served by a [`GenericController`](crate::controller::GenericController).
///
/// ```rust,ignore
/// #[derive(Clone, Serialize, Deserialize, DescribeSchema)]
/// pub struct User {
///     pub id: u64,
///     #[schema(required)]
///     pub name: String,
/// }
///
/// impl Validatable for User {}
///
/// impl CrudEntity for User {
///     type Id = u64;
///     fn id(&self) -> u64 { self.id }
///     fn set_id(&mut self, id: u64) { self.id = id; }
/// }
/// ```
pub trait CrudEntity:
    DescribeSchema + Validatable + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    /// Identifier type; fixes the representation accepted in paths.
    type Id: EntityId;

    fn id(&self) -> Self::Id;

    fn set_id(&mut self, id: Self::Id);

    /// Name used for documentation tags, titles and definitions.
    fn entity_name() -> Cow<'static, str> {
        Self::schema_name().unwrap_or(Cow::Borrowed("Entity"))
    }
}
