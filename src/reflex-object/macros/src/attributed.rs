use proc_macro2::TokenStream;
use syn::{DeriveInput, LitInt, Result};

use crate::{ast::Input, utils::default_crate_path};

pub fn derive(node: DeriveInput) -> Result<TokenStream> {
    let input = Input::from_syn(&node, true)?;
    let path = default_crate_path();

    let ty = input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields: Vec<_> = input.attributes().collect();
    let idents = fields.iter().map(|f| f.ident);
    let names = fields.iter().map(|f| f.name());

    let table_names = input.attrs.tables.iter().map(|t| &t.name);
    let sizes = input.attrs.tables.iter().map(|t| {
        t.size
            .clone()
            .unwrap_or_else(|| LitInt::new("0", t.name.span()))
    });

    Ok(quote! {
        impl #impl_generics #path::Attributed for #ty #ty_generics #where_clause {
            fn signatures() -> ::std::vec::Vec<#path::Signature> {
                ::std::vec![
                    #(
                        // SAFETY: The projection only computes the
                        // address of a field of `Self`.
                        unsafe {
                            #path::Signature::field(#names, |this: *mut Self| {
                                ::std::ptr::addr_of_mut!((*this).#idents)
                            })
                        },
                    )*
                    #(
                        #path::Signature::table(#table_names, #sizes),
                    )*
                ]
            }

            fn clone_object(&self) -> ::std::boxed::Box<dyn #path::Attributed> {
                ::std::boxed::Box::new(::std::clone::Clone::clone(self))
            }

            #[inline]
            fn as_rtti(&self) -> &dyn #path::Rtti {
                self
            }
        }
    })
}
