//! Implementation of the `#[derive(Record)]` macro.
//!
//! For every queryable field this generates a hidden accessor function and a
//! public `Field` constant, then implements `sift::Record` over them.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{ext::IdentExt, spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::parse_record_attrs;

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut accessors: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut const_names = Vec::new();
    let mut lookup_arms: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let record_attrs = parse_record_attrs(&field.attrs)?;
        if record_attrs.skip {
            continue;
        }

        // Determine the query field name
        let plain_name = field_name.unraw().to_string();
        let query_name = record_attrs.rename.unwrap_or_else(|| plain_name.clone());
        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));
        let accessor_name = format_ident!("__sift_field_{}", plain_name);

        accessors.push(quote! {
            #[doc(hidden)]
            #[allow(non_snake_case)]
            fn #accessor_name(record: &Self) -> ::sift::Value<'_> {
                ::sift::FieldValue::field_value(&record.#field_name)
            }
        });

        field_constants.push(quote! {
            #[doc = concat!("Typed reference to the `", #query_name, "` field.")]
            pub const #const_name: ::sift::Field<Self> =
                ::sift::Field::new(#query_name, Self::#accessor_name);
        });

        lookup_arms.push(quote! {
            #query_name => ::std::option::Option::Some(Self::#const_name),
        });

        const_names.push(const_name);
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#accessors)*
            #(#field_constants)*
        }

        impl #impl_generics ::sift::Record for #struct_name #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<::sift::Field<Self>> {
                ::std::vec![#(Self::#const_names),*]
            }

            fn field(name: &str) -> ::std::option::Option<::sift::Field<Self>> {
                match name {
                    #(#lookup_arms)*
                    _ => ::std::option::Option::None,
                }
            }
        }
    };

    Ok(expanded)
}

/// Convert a field name to SCREAMING_SNAKE_CASE.
///
/// Dots in relationship names (`pet.name`) become underscores.
pub(super) fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' || c == '.' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}
