//! Generic entity identifiers.
//!
//! An entity declares the representation of its identifier once, through the
//! [`EntityId`] type it uses. Path identifiers arrive as strings and are decoded by
//! [`decode_identifier`], which only accepts values of the declared representation.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt;
use uuid::Uuid;

use crate::errors::CrudError;
use crate::schema::DescribeSchema;

/// Concrete wire representation of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Integer,
    Uuid,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => f.write_str("integer"),
            Self::Uuid => f.write_str("uuid"),
        }
    }
}

/// A decoded identifier in one of the supported representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Integer(u64),
    Uuid(Uuid),
}

impl Identifier {
    /// Parses `raw`, trying UUID before unsigned integer.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if let Ok(uuid) = Uuid::parse_str(raw) {
            return Some(Self::Uuid(uuid));
        }
        // `u64::from_str` accepts a leading `+`
        if raw.bytes().all(|b| b.is_ascii_digit()) {
            return raw.parse().ok().map(Self::Integer);
        }
        None
    }

    #[must_use]
    pub fn kind(&self) -> IdKind {
        match self {
            Self::Integer(_) => IdKind::Integer,
            Self::Uuid(_) => IdKind::Uuid,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Uuid(value) => write!(f, "{value}"),
        }
    }
}

/// Identifier type of an entity.
pub trait EntityId:
    Clone
    + Ord
    + fmt::Debug
    + fmt::Display
    + Serialize
    + DeserializeOwned
    + DescribeSchema
    + Send
    + Sync
    + 'static
{
    /// The only representation this type accepts.
    const KIND: IdKind;

    /// Converts a decoded identifier, `None` if it is of another representation or out of
    /// range for `Self`.
    fn from_identifier(identifier: Identifier) -> Option<Self>;

    /// Whether this value means "not assigned yet" (zero, nil UUID).
    fn is_unset(&self) -> bool;

    /// A fresh identifier for a new record. Integers use `sequence`; UUIDs ignore it.
    fn generate(sequence: u64) -> Option<Self>;
}

macro_rules! integer_entity_id {
    ($($ty:ty),*) => {
        $(
            impl EntityId for $ty {
                const KIND: IdKind = IdKind::Integer;

                fn from_identifier(identifier: Identifier) -> Option<Self> {
                    match identifier {
                        Identifier::Integer(value) => <$ty>::try_from(value).ok(),
                        Identifier::Uuid(_) => None,
                    }
                }

                fn is_unset(&self) -> bool {
                    *self == 0
                }

                fn generate(sequence: u64) -> Option<Self> {
                    <$ty>::try_from(sequence).ok()
                }
            }
        )*
    };
}

integer_entity_id!(u64, u32, i64, i32);

impl EntityId for Uuid {
    const KIND: IdKind = IdKind::Uuid;

    fn from_identifier(identifier: Identifier) -> Option<Self> {
        match identifier {
            Identifier::Uuid(value) => Some(value),
            Identifier::Integer(_) => None,
        }
    }

    fn is_unset(&self) -> bool {
        self.is_nil()
    }

    fn generate(_sequence: u64) -> Option<Self> {
        Some(Uuid::new_v4())
    }
}

/// Decodes a path identifier into the representation declared by `Id`.
///
/// UUID parsing is always attempted first, then unsigned integer parsing. A value that
/// parses as the other representation is a type mismatch, not a parse failure.
///
/// # Errors
///
/// - `NotFound` when `raw` is empty
/// - `InvalidParameter` when `raw` is unparseable, of the wrong representation, or out of
///   range for `Id`
pub fn decode_identifier<Id: EntityId>(raw: &str) -> Result<Id, CrudError> {
    if raw.is_empty() {
        return Err(CrudError::not_found("missing id parameter"));
    }

    let Some(identifier) = Identifier::parse(raw) else {
        return Err(CrudError::invalid_parameter("invalid id parameter"));
    };

    if identifier.kind() != Id::KIND {
        tracing::debug!(
            expected = %Id::KIND,
            found = %identifier.kind(),
            "identifier representation mismatch"
        );
        return Err(CrudError::invalid_parameter("invalid id parameter type"));
    }

    Id::from_identifier(identifier)
        .ok_or_else(|| CrudError::invalid_parameter("id parameter out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    const SAMPLE_UUID: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn test_decode_integer() {
        assert_eq!(decode_identifier::<u64>("42").unwrap(), 42);
        assert_eq!(decode_identifier::<i32>("7").unwrap(), 7);
    }

    #[test]
    fn test_decode_uuid() {
        let id = decode_identifier::<Uuid>(SAMPLE_UUID).unwrap();
        assert_eq!(id.to_string(), SAMPLE_UUID);
    }

    #[test]
    fn test_uuid_for_integer_entity_is_invalid_parameter() {
        let err = decode_identifier::<u64>(SAMPLE_UUID).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(err.user_message(), "invalid id parameter type");
    }

    #[test]
    fn test_number_for_uuid_entity_is_invalid_parameter() {
        let err = decode_identifier::<Uuid>("12345").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(err.user_message(), "invalid id parameter type");
    }

    #[test]
    fn test_uuid_parse_takes_precedence() {
        // 32 decimal digits are also a valid simple-form UUID
        let raw = "12345678901234567890123456789012";
        assert_eq!(Identifier::parse(raw).map(|id| id.kind()), Some(IdKind::Uuid));
        assert!(decode_identifier::<Uuid>(raw).is_ok());
        assert_eq!(
            decode_identifier::<u64>(raw).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
    }

    #[test]
    fn test_unparseable() {
        for raw in ["abc", "-1", "+5", "1.5", "18446744073709551616"] {
            let err = decode_identifier::<u64>(raw).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter, "input {raw}");
            assert_eq!(err.user_message(), "invalid id parameter");
        }
    }

    #[test]
    fn test_empty_is_not_found() {
        let err = decode_identifier::<u64>("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_out_of_range_for_narrow_type() {
        let err = decode_identifier::<u32>("4294967296").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(err.user_message(), "id parameter out of range");
    }

    #[test]
    fn test_unset_and_generate() {
        assert!(0u64.is_unset());
        assert!(!5i32.is_unset());
        assert!(Uuid::nil().is_unset());
        assert_eq!(u32::generate(3), Some(3));
        assert_eq!(i32::generate(u64::MAX), None);
        assert!(Uuid::generate(0).is_some_and(|id| !id.is_nil()));
    }

    #[test]
    fn test_identifier_untagged_serde() {
        let id: Identifier = serde_json::from_str("17").unwrap();
        assert_eq!(id, Identifier::Integer(17));
        let id: Identifier = serde_json::from_str(&format!("\"{SAMPLE_UUID}\"")).unwrap();
        assert_eq!(id.kind(), IdKind::Uuid);
    }
}
