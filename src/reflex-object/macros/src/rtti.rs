use proc_macro2::TokenStream;
use syn::{DeriveInput, Result};

use crate::{ast::Input, utils::default_crate_path};

pub fn derive(node: DeriveInput) -> Result<TokenStream> {
    let input = Input::from_syn(&node, false)?;
    let path = default_crate_path();

    let ty = input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let name = input.name();
    let bases = input
        .attrs
        .rtti
        .as_ref()
        .map(|r| r.bases.as_slice())
        .unwrap_or_default();

    let equals = input
        .attrs
        .rtti
        .as_ref()
        .filter(|r| r.eq)
        .map(|_| {
            quote! {
                fn equals(&self, other: &dyn #path::Rtti) -> bool {
                    other
                        .as_any()
                        .downcast_ref::<Self>()
                        .map_or(false, |other| self == other)
                }
            }
        });

    Ok(quote! {
        impl #impl_generics #path::Rtti for #ty #ty_generics #where_clause {
            #[inline]
            fn type_name(&self) -> &'static str {
                #name
            }

            #[inline]
            fn type_chain(&self) -> &'static [&'static str] {
                &[#(#bases),*]
            }

            #[inline]
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            #equals
        }
    })
}
