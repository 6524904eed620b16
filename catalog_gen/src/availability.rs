//! Availability qualifiers.
//!
//! Generated companions live beside the annotated type, so they must never be
//! compiled where the type itself is not. This pass collects the `cfg`
//! qualifiers of a declaration (or variant) so the synthesizer can prefix
//! them onto everything it emits.
//!
//! A `cfg` nested inside `cfg_attr` is rewritten to an unconditional form:
//! `#[cfg_attr(a, cfg(b))]` becomes `#[cfg(any(not(a), b))]`.

use proc_macro2::TokenStream;
use quote::{ToTokens, TokenStreamExt, quote};
use syn::punctuated::Punctuated;
use syn::{Attribute, Meta, Token, parse_quote};

#[derive(Debug, Clone, Default)]
pub struct Availability {
    attrs: Vec<Attribute>,
}

impl Availability {
    pub fn collect(attrs: &[Attribute]) -> Self {
        let mut collected = Vec::new();
        for attr in attrs {
            if attr.path().is_ident("cfg") {
                collected.push(attr.clone());
            } else if attr.path().is_ident("cfg_attr") {
                let Ok(metas) = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
                else {
                    tracing::trace!("skipping unparseable cfg_attr");
                    continue;
                };
                collect_conditional(&metas, &mut Vec::new(), &mut collected);
            }
        }
        Self { attrs: collected }
    }

    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl ToTokens for Availability {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.append_all(&self.attrs);
    }
}

/* `metas` is the argument list of one `cfg_attr`: a condition, then payload */
fn collect_conditional(
    metas: &Punctuated<Meta, Token![,]>,
    conditions: &mut Vec<TokenStream>,
    out: &mut Vec<Attribute>,
) {
    let mut iter = metas.iter();
    let Some(condition) = iter.next() else {
        return;
    };
    conditions.push(condition.to_token_stream());

    for payload in iter {
        let Meta::List(list) = payload else {
            continue;
        };
        if list.path.is_ident("cfg") {
            let predicate = &list.tokens;
            let guard = conjunction(conditions);
            out.push(parse_quote!(#[cfg(any(not(#guard), #predicate))]));
        } else if list.path.is_ident("cfg_attr") {
            if let Ok(nested) = list.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated) {
                collect_conditional(&nested, conditions, out);
            }
        }
    }

    conditions.pop();
}

fn conjunction(conditions: &[TokenStream]) -> TokenStream {
    match conditions {
        [single] => single.clone(),
        many => quote! { all(#(#many),*) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(attrs: Vec<Attribute>) -> String {
        Availability::collect(&attrs).to_token_stream().to_string()
    }

    #[test]
    fn plain_cfg_is_kept_verbatim() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[cfg(target_os = "ios")]),
            parse_quote!(#[derive(Debug)]),
            parse_quote!(#[doc = "docs"]),
        ];
        assert_eq!(rendered(attrs), quote!(#[cfg(target_os = "ios")]).to_string());
    }

    #[test]
    fn no_qualifiers_adds_nothing() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[derive(Clone)])];
        assert!(Availability::collect(&attrs).is_empty());
        assert_eq!(rendered(attrs), "");
    }

    #[test]
    fn nested_cfg_is_made_unconditional() {
        let attrs: Vec<Attribute> = vec![parse_quote!(
            #[cfg_attr(feature = "mobile", cfg(target_os = "ios"), derive(Debug))]
        )];
        assert_eq!(
            rendered(attrs),
            quote!(#[cfg(any(not(feature = "mobile"), target_os = "ios"))]).to_string()
        );
    }

    #[test]
    fn doubly_nested_conditions_are_conjoined() {
        let attrs: Vec<Attribute> = vec![parse_quote!(
            #[cfg_attr(unix, cfg_attr(feature = "ui", cfg(debug_assertions)))]
        )];
        assert_eq!(
            rendered(attrs),
            quote!(#[cfg(any(not(all(unix, feature = "ui")), debug_assertions))]).to_string()
        );
    }

    #[test]
    fn cfg_attr_without_cfg_payload_is_dropped() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[cfg_attr(test, derive(Debug))])];
        assert!(Availability::collect(&attrs).is_empty());
    }
}
