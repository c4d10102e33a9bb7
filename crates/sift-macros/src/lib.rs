//! Proc macros for sift.
//!
//! - [`Record`] - Generate typed `Field` constants and the `sift::Record`
//!   lookup table from a struct definition

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod record;

/// Derives `sift::Record` for a struct with named fields.
///
/// Every field whose type implements `sift::FieldValue` becomes queryable.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `skip` | Exclude this field from queries |
/// | `rename = "..."` | Use a custom name for queries and formatting |
///
/// # Generated Code
///
/// 1. One `Field` constant per field, named in SCREAMING_SNAKE_CASE after the
///    query name (`Person::NAME`, `Person::PET_NAME` for `rename = "pet.name"`)
/// 2. `Record::fields()` and `Record::field(name)` over those constants
///
/// # Example
///
/// ```ignore
/// use sift::Record;
///
/// #[derive(Record)]
/// struct Person {
///     name: String,
///     age: u32,
///     tags: Vec<String>,
///     #[record(rename = "nickname")]
///     alias: Option<String>,
///     #[record(skip)]
///     password_hash: String,
/// }
///
/// let adults = Person::AGE.greater_than_or_equal_to(18);
/// assert_eq!(adults.to_string(), "age >= 18");
/// assert!(Person::field("nickname").is_some());
/// assert!(Person::field("password_hash").is_none());
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
