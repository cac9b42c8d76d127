//! Shared input validation for the derives.

use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{Data, DeriveInput, Field, Fields};

/// Returns the named fields of a struct, or a spanned error naming `derive`.
pub fn named_fields<'a>(
    input: &'a DeriveInput,
    derive: &str,
) -> syn::Result<&'a Punctuated<Field, Comma>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(&fields.named),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{} can only be derived for structs with named fields", derive),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{} can only be derived for structs", derive),
        )),
    }
}
