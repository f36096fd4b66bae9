mod attribute_parser;
mod codegen;
mod structs;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// ===================
/// `DescribeSchema` Macro
/// ===================
/// Implements `fastcrud::schema::DescribeSchema` for a struct with named fields, so that its
/// shape can be documented without runtime reflection.
///
/// Every field contributes one property, described by its own `DescribeSchema`
/// implementation (nested structs are inlined). The property name is the serialized one:
/// `#[serde(rename = "...")]`, else the container's `#[serde(rename_all = "...")]` rule,
/// else the Rust name.
///
/// Field attributes:
/// - `#[schema(required)]`: list the property in `required`
/// - `#[schema(description = "...")]`: property description (defaults to the doc comment)
/// - `#[schema(example = <expr>)]`: property example, any value convertible into JSON
/// - `#[schema(flatten)]` or `#[serde(flatten)]`: splice the field's properties and
///   required names into this struct instead of nesting them
/// - `#[schema(skip)]`, `#[serde(skip)]`, `#[serde(skip_serializing)]`: leave the field out
///
/// Container attributes:
/// - `#[schema(name = "...")]`: definition name, defaults to the struct name followed by
///   the names of its type arguments (`Page<User>` -> `PageUser`)
///
/// ```rust,ignore
/// #[derive(Serialize, Deserialize, DescribeSchema)]
/// #[serde(rename_all = "camelCase")]
/// pub struct Article {
///     pub id: u64,
///     /// Headline shown in listings
///     #[schema(required, example = "Hello")]
///     pub title: String,
///     #[serde(flatten)]
///     pub audit: Audit,
///     #[serde(skip)]
///     pub cache_key: String,
/// }
/// ```
#[proc_macro_derive(DescribeSchema, attributes(schema))]
pub fn describe_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    codegen::expand_describe_schema(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
