use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use super::{Schema, SchemaGenerator, SchemaKind};

/// Capability of a type to describe its own shape.
///
/// Implement it with `#[derive(DescribeSchema)]` for structs. Hand-written implementations
/// should call [`SchemaGenerator::subschema_for`] for nested types so that self-referential
/// shapes terminate.
pub trait DescribeSchema {
    /// Name under which the type is stored in a document's `definitions`.
    ///
    /// `None` for anonymous shapes (primitives, sequences, maps). Pointer-like wrappers
    /// report the name of the type they wrap.
    fn schema_name() -> Option<Cow<'static, str>> {
        None
    }

    /// Builds the schema of this type, recursing through `generator`.
    fn describe_schema(generator: &mut SchemaGenerator) -> Schema;
}

macro_rules! describe_primitive {
    ($($ty:ty => $kind:ident $(, $format:literal)?);* $(;)?) => {
        $(
            impl DescribeSchema for $ty {
                fn describe_schema(_: &mut SchemaGenerator) -> Schema {
                    Schema::primitive(SchemaKind::$kind)$(.with_format($format))?
                }
            }
        )*
    };
}

describe_primitive! {
    i8 => Integer;
    i16 => Integer;
    i32 => Integer;
    i64 => Integer, "int64";
    isize => Integer;
    u8 => Integer;
    u16 => Integer;
    u32 => Integer;
    u64 => Integer, "int64";
    usize => Integer;
    f32 => Number;
    f64 => Number, "double";
    bool => Boolean;
    char => String;
    str => String;
    String => String;
    uuid::Uuid => String, "uuid";
    chrono::NaiveDateTime => String, "date-time";
    chrono::NaiveDate => String, "date";
    serde_json::Value => Object;
}

impl<Tz: chrono::TimeZone> DescribeSchema for chrono::DateTime<Tz> {
    fn describe_schema(_: &mut SchemaGenerator) -> Schema {
        Schema::primitive(SchemaKind::String).with_format("date-time")
    }
}

// Pointer-like wrappers describe their pointee in place. They must not go through
// `subschema_for` themselves: they share the pointee's name, and re-entering it would be
// mistaken for a cycle.
macro_rules! describe_pointer {
    ($($wrapper:ident),*) => {
        $(
            impl<T: DescribeSchema + ?Sized> DescribeSchema for $wrapper<T> {
                fn schema_name() -> Option<Cow<'static, str>> {
                    T::schema_name()
                }

                fn describe_schema(generator: &mut SchemaGenerator) -> Schema {
                    T::describe_schema(generator)
                }
            }
        )*
    };
}

describe_pointer!(Box, Arc, Rc);

impl<T: DescribeSchema> DescribeSchema for Option<T> {
    fn schema_name() -> Option<Cow<'static, str>> {
        T::schema_name()
    }

    fn describe_schema(generator: &mut SchemaGenerator) -> Schema {
        T::describe_schema(generator)
    }
}

impl<T: DescribeSchema + ?Sized> DescribeSchema for &T {
    fn schema_name() -> Option<Cow<'static, str>> {
        T::schema_name()
    }

    fn describe_schema(generator: &mut SchemaGenerator) -> Schema {
        T::describe_schema(generator)
    }
}

macro_rules! describe_sequence {
    ($($seq:ident),*) => {
        $(
            impl<T: DescribeSchema> DescribeSchema for $seq<T> {
                fn describe_schema(generator: &mut SchemaGenerator) -> Schema {
                    Schema::array(generator.subschema_for::<T>())
                }
            }
        )*
    };
}

describe_sequence!(Vec, VecDeque, BTreeSet);

impl<T: DescribeSchema, S> DescribeSchema for HashSet<T, S> {
    fn describe_schema(generator: &mut SchemaGenerator) -> Schema {
        Schema::array(generator.subschema_for::<T>())
    }
}

impl<T: DescribeSchema> DescribeSchema for [T] {
    fn describe_schema(generator: &mut SchemaGenerator) -> Schema {
        Schema::array(generator.subschema_for::<T>())
    }
}

impl<T: DescribeSchema, const N: usize> DescribeSchema for [T; N] {
    fn describe_schema(generator: &mut SchemaGenerator) -> Schema {
        Schema::array(generator.subschema_for::<T>())
    }
}

impl<K, V> DescribeSchema for BTreeMap<K, V> {
    fn describe_schema(_: &mut SchemaGenerator) -> Schema {
        Schema::object()
    }
}

impl<K, V, S> DescribeSchema for HashMap<K, V, S> {
    fn describe_schema(_: &mut SchemaGenerator) -> Schema {
        Schema::object()
    }
}
