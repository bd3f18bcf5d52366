//! Procedural macros for use with [`reflex-object`].
//!
//! There is no need to directly add this crate to application
//! dependencies as these macros are already re-exported by
//! [`reflex-object`].
//!
//! [`reflex-object`]: ../reflex_object/

#[macro_use]
extern crate quote;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod ast;
mod attributed;
mod attrs;
mod rtti;
mod utils;

/// Implements `Rtti` for a struct or an enum.
///
/// The type is named after its identifier unless overridden
/// with `#[rtti(name = "...")]`. Base type names are listed
/// with `#[rtti(bases("A", "B"))]`, nearest first, and
/// `#[rtti(eq)]` compares objects through `PartialEq`.
#[proc_macro_derive(Rtti, attributes(rtti))]
pub fn derive_rtti(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    rtti::derive(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Implements `Attributed` for a struct with named fields.
///
/// Fields marked `#[attribute]` become prescribed attributes,
/// named after the field unless `#[attribute(name = "...")]`
/// says otherwise. Every `#[table(name = "...", size = N)]` on
/// the struct adds a table of `N` nested scopes after the
/// fields. The struct must implement `Clone` and `Rtti`.
#[proc_macro_derive(Attributed, attributes(attribute, table))]
pub fn derive_attributed(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    attributed::derive(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
