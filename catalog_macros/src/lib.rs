extern crate proc_macro;

use catalog_gen::DeriveOptions;
use proc_macro::TokenStream;
use syn::{Item, parse_macro_input};

/// Derives the `OneOf` companions of an enumeration.
///
/// Accepts optional `crate = "path"`, `tags = "Ident"` and
/// `bindings = "Ident"` arguments. On anything but a plain enum the item is
/// kept and a compile error asks for the annotation to be removed.
#[proc_macro_attribute]
pub fn one_of(args: TokenStream, input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as Item);

    let mut options = DeriveOptions::default();
    let one_of_meta_parser = syn::meta::parser(|meta| options.parse_meta(meta));
    parse_macro_input!(args with one_of_meta_parser);

    catalog_gen::expand_attribute(item, &options).into()
}
