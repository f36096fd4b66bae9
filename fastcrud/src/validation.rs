//! Validation Support
//!
//! The controller validates every entity before it reaches the repository. Entities opt in by
//! implementing [`Validatable`]. The default implementation enforces the fields marked
//! `#[schema(required)]`; override it to add custom rules.
//!
//! # Example
//!
//! ```rust,ignore
//! use fastcrud::validation::{Validatable, ValidationErrors, validate_required_fields, validators};
//!
//! #[derive(Clone, serde::Serialize, serde::Deserialize, fastcrud::DescribeSchema)]
//! pub struct Product {
//!     pub id: u64,
//!     #[schema(required)]
//!     pub name: String,
//!     pub price: i32,
//! }
//!
//! impl Validatable for Product {
//!     fn validate(&self) -> Result<(), ValidationErrors> {
//!         validate_required_fields(self)?;
//!         validators::validate_range("price", self.price, Some(1), None)?;
//!         Ok(())
//!     }
//! }
//! ```

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::schema::{DescribeSchema, schema_of};

/// Validation error with field name and message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// `Ok(())` when no error was collected.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was collected.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Trait for entities the controller validates before persisting.
///
/// The default implementation is [`validate_required_fields`], so `impl Validatable for
/// MyEntity {}` is enough to enforce `#[schema(required)]`.
pub trait Validatable: DescribeSchema + Serialize {
    /// Validate the instance
    ///
    /// # Errors
    ///
    /// Returns every rule the instance breaks.
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_required_fields(self)
    }
}

/// Checks that each required property of `T`'s schema is present, not null and, for strings,
/// not blank in the serialized form of `value`.
///
/// # Errors
///
/// Returns one [`ValidationError`] per missing field, in schema order.
pub fn validate_required_fields<T>(value: &T) -> Result<(), ValidationErrors>
where
    T: DescribeSchema + Serialize + ?Sized,
{
    let schema = schema_of::<T>();
    if schema.required.is_empty() {
        return Ok(());
    }

    let serialized = serde_json::to_value(value)
        .map_err(|err| ValidationError::new("_", format!("Unserializable value: {err}")))?;

    let mut errors = ValidationErrors::new();
    for name in &schema.required {
        let missing = match serialized.get(name) {
            None | Some(Value::Null) => true,
            Some(Value::String(text)) => text.trim().is_empty(),
            Some(_) => false,
        };
        if missing {
            errors.add(ValidationError::new(name.as_str(), "This field is required"));
        }
    }
    errors.result()
}

/// Helper validators for common patterns
pub mod validators {
    use super::ValidationError;
    use std::fmt;

    /// Validate string length is within range
    ///
    /// # Errors
    ///
    /// Fails when `value` is shorter than `min` or longer than `max` characters.
    pub fn validate_length(
        field: &str,
        value: &str,
        min: Option<usize>,
        max: Option<usize>,
    ) -> Result<(), ValidationError> {
        let len = value.chars().count();

        if let Some(min_len) = min
            && len < min_len
        {
            return Err(ValidationError::new(
                field,
                format!("Must be at least {min_len} characters"),
            ));
        }

        if let Some(max_len) = max
            && len > max_len
        {
            return Err(ValidationError::new(
                field,
                format!("Must be at most {max_len} characters"),
            ));
        }

        Ok(())
    }

    /// Validate number is within range
    ///
    /// # Errors
    ///
    /// Fails when `value` is outside `min..=max`.
    pub fn validate_range<T: PartialOrd + fmt::Display>(
        field: &str,
        value: T,
        min: Option<T>,
        max: Option<T>,
    ) -> Result<(), ValidationError> {
        if let Some(min_val) = min
            && value < min_val
        {
            return Err(ValidationError::new(field, format!("Must be at least {min_val}")));
        }

        if let Some(max_val) = max
            && value > max_val
        {
            return Err(ValidationError::new(field, format!("Must be at most {max_val}")));
        }

        Ok(())
    }

    /// Basic email validation
    ///
    /// # Errors
    ///
    /// Fails when `value` lacks `@` or `.`, or exceeds 255 characters.
    pub fn validate_email(field: &str, value: &str) -> Result<(), ValidationError> {
        if !value.contains('@') || !value.contains('.') {
            return Err(ValidationError::new(field, "Invalid email format"));
        }

        if value.len() > 255 {
            return Err(ValidationError::new(
                field,
                "Email must be at most 255 characters",
            ));
        }

        Ok(())
    }

    /// Validate value is not empty
    ///
    /// # Errors
    ///
    /// Fails when `value` is empty or whitespace.
    pub fn validate_required(field: &str, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, "This field is required"));
        }
        Ok(())
    }
}
