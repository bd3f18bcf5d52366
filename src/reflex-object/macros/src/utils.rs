use syn::Path;

pub fn default_crate_path() -> Path {
    syn::parse_quote!(::reflex_object)
}
