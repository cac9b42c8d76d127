//! Implementation of #[derive(FromContext)] proc-macro.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, LitStr, Type};

use crate::fields::named_fields;

pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let context_type = context_type(input)?;

    let field_inits = named_fields(input, "FromContext")?.iter().map(|field| {
        let field_name = &field.ident;
        let field_type = &field.ty;

        quote! {
            #field_name: <#field_type as crate::FromRef<#context_type>>::from_ref(ctx)
        }
    });

    Ok(quote! {
        impl #impl_generics crate::FromRef<#context_type> for #name #ty_generics #where_clause {
            fn from_ref(ctx: &#context_type) -> Self {
                Self {
                    #(#field_inits),*
                }
            }
        }
    })
}

/// Reads `#[from_context(Context = Path)]`, also accepting the quoted form
/// `Context = "Path"`. Defaults to `Context`.
fn context_type(input: &DeriveInput) -> syn::Result<Type> {
    let mut context_ty: Option<Type> = None;

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("from_context")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("Context") {
                return Err(meta.error("expected `Context = <type>`"));
            }

            let value = meta.value()?;
            context_ty = Some(if value.peek(LitStr) {
                value.parse::<LitStr>()?.parse()?
            } else {
                value.parse()?
            });
            Ok(())
        })?;
    }

    Ok(context_ty.unwrap_or_else(|| syn::parse_quote!(Context)))
}
