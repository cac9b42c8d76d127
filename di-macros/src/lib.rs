//! Compile-time dependency injection derives for spalce-common.
//!
//! - `#[derive(Context)]` makes each field of a context struct extractable
//! - `#[derive(FromContext)]` builds a struct by extracting every field
//!
//! Generated code references `crate::FromRef`, so the consuming crate must
//! define or re-export that trait at its root.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod context;
mod fields;
mod from_context;

/// Derive macro for creating a DI context.
///
/// Generates `FromRef<Self>` for the type of each field. Every field type
/// must implement `Clone`, and no two fields may share a type.
///
/// # Example
///
/// ```ignore
/// #[derive(Context, Clone)]
/// pub struct Context {
///     pub database: Database,
///     pub config: Arc<Config>,
/// }
///
/// // Generated implementations:
/// // impl FromRef<Context> for Database { ... }
/// // impl FromRef<Context> for Arc<Config> { ... }
/// ```
#[proc_macro_derive(Context)]
pub fn derive_context(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    context::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derive macro for types that can be constructed from a context.
///
/// Generates a `FromRef<Context>` implementation that resolves each field
/// with `FromRef::from_ref`. The context type defaults to `Context` in the
/// deriving module's scope.
///
/// # Example
///
/// ```ignore
/// #[derive(FromContext, Clone)]
/// pub struct RepositoryFactory {
///     database: Database,    // Database::from_ref(ctx)
///     config: Arc<Config>,   // Arc::<Config>::from_ref(ctx)
/// }
/// ```
///
/// # Custom Context Type
///
/// ```ignore
/// #[derive(FromContext)]
/// #[from_context(Context = AdminContext)]
/// pub struct AuditRepository {
///     database: Database,
/// }
/// ```
#[proc_macro_derive(FromContext, attributes(from_context))]
pub fn derive_from_context(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_context::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
