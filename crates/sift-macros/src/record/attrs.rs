//! Attribute parsing for the Record derive macro.
//!
//! This module parses the `#[record(...)]` field attributes.

use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

use super::derive::to_screaming_snake_case;

/// Field-level attributes from `#[record(...)]`.
#[derive(Debug, Clone, Default)]
pub struct RecordAttr {
    /// Leave this field out of the generated lookup table and constants.
    pub skip: bool,
    /// Custom field name for queries (default: field name).
    pub rename: Option<String>,
}

impl Parse for RecordAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = RecordAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => {
                    attr.skip = true;
                }

                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    let syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    else {
                        return Err(Error::new(
                            nv.value.span(),
                            "rename must be a string literal",
                        ));
                    };
                    let name = s.value();
                    if name.is_empty() {
                        return Err(Error::new(s.span(), "rename must not be empty"));
                    }
                    let const_name = to_screaming_snake_case(&name);
                    if syn::parse_str::<Ident>(&const_name).is_err() {
                        return Err(Error::new(
                            s.span(),
                            format!(
                                "rename \"{name}\" does not make a valid constant name (`{const_name}`)"
                            ),
                        ));
                    }
                    attr.rename = Some(name);
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown record attribute. Expected: skip or rename = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[record(...)]` attributes from a field's attributes.
pub fn parse_record_attrs(attrs: &[Attribute]) -> Result<RecordAttr> {
    for attr in attrs {
        if attr.path().is_ident("record") {
            return attr.parse_args::<RecordAttr>();
        }
    }
    Ok(RecordAttr::default())
}
