/* Field classification: plain value vs. already a two-way reference */

use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::visit_mut::{self, VisitMut};
use syn::{GenericArgument, Path, PathArguments, Type, TypePath};

/// Shape of one declared field type.
///
/// The check is purely syntactic and happens once, at extraction time. Every
/// renderer consumes this classification instead of re-inspecting the type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldShape {
    Plain(Type),
    AlreadyReference { outer: Type, inner: Type },
}

impl FieldShape {
    pub fn classify(ty: &Type, reference_ident: &str) -> Self {
        match reference_inner(ty, reference_ident) {
            Some(inner) => FieldShape::AlreadyReference {
                outer: ty.clone(),
                inner: inner.clone(),
            },
            None => FieldShape::Plain(ty.clone()),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, FieldShape::AlreadyReference { .. })
    }

    /// The referenced value type (`T` for both `T` and `Binding<T>`).
    pub fn value_type(&self) -> &Type {
        match self {
            FieldShape::Plain(ty) => ty,
            FieldShape::AlreadyReference { inner, .. } => inner,
        }
    }

    /// Type used in the reference mirror: wrapped exactly once.
    ///
    /// The mirror is a different type, so `Self` is spelled as `source`.
    pub fn reference_type(&self, runtime: &syn::Path, source: &Ident) -> TokenStream {
        match self {
            FieldShape::Plain(ty) => {
                let ty = resolve_self(ty, source);
                quote! { #runtime::Binding<#ty> }
            }
            FieldShape::AlreadyReference { outer, .. } => {
                let outer = resolve_self(outer, source);
                quote! { #outer }
            }
        }
    }
}

/* `Box<Self>` -> `Box<Tree>`, at any depth */
fn resolve_self(ty: &Type, source: &Ident) -> Type {
    let mut ty = ty.clone();
    SelfToSource(source).visit_type_mut(&mut ty);
    ty
}

struct SelfToSource<'a>(&'a Ident);

impl VisitMut for SelfToSource<'_> {
    fn visit_path_mut(&mut self, path: &mut Path) {
        if let Some(first) = path.segments.first_mut() {
            if first.ident == "Self" {
                let mut source = self.0.clone();
                source.set_span(first.ident.span());
                first.ident = source;
            }
        }
        visit_mut::visit_path_mut(self, path);
    }
}

/* `Binding<T>`, `catalog::Binding<T>`, ... -> `T` */
fn reference_inner<'a>(ty: &'a Type, reference_ident: &str) -> Option<&'a Type> {
    let path = match ty {
        Type::Path(TypePath { qself: None, path }) => path,
        Type::Group(group) => return reference_inner(&group.elem, reference_ident),
        Type::Paren(paren) => return reference_inner(&paren.elem, reference_ident),
        _ => return None,
    };

    let segment = path.segments.last()?;
    if segment.ident != reference_ident {
        return None;
    }

    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };

    let [GenericArgument::Type(inner)] = args.args.iter().collect::<Vec<_>>().as_slice() else {
        return None;
    };

    Some(inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::ToTokens;
    use syn::parse_quote;

    fn classify(ty: Type) -> FieldShape {
        FieldShape::classify(&ty, "Binding")
    }

    #[test]
    fn bare_and_qualified_bindings_are_references() {
        let shape = classify(parse_quote!(Binding<String>));
        assert!(shape.is_reference());
        assert_eq!(
            shape.value_type().to_token_stream().to_string(),
            quote!(String).to_string()
        );

        assert!(classify(parse_quote!(::catalog::Binding<Option<u8>>)).is_reference());
        assert!(classify(parse_quote!((Binding<u8>))).is_reference());
    }

    #[test]
    fn wrapped_or_malformed_bindings_are_plain() {
        assert!(!classify(parse_quote!(Option<Binding<u8>>)).is_reference());
        assert!(!classify(parse_quote!(Binding)).is_reference());
        assert!(!classify(parse_quote!(Binding<u8, u16>)).is_reference());
        assert!(!classify(parse_quote!(Bindings<u8>)).is_reference());
        assert!(!classify(parse_quote!(&'static Binding<u8>)).is_reference());
    }

    #[test]
    fn reference_type_never_double_wraps() {
        let runtime: syn::Path = parse_quote!(::catalog);
        let source: Ident = parse_quote!(Counter);

        let plain = classify(parse_quote!(u32));
        assert_eq!(
            plain.reference_type(&runtime, &source).to_string(),
            quote!(::catalog::Binding<u32>).to_string()
        );

        let already = classify(parse_quote!(Binding<u32>));
        assert_eq!(
            already.reference_type(&runtime, &source).to_string(),
            quote!(Binding<u32>).to_string()
        );
    }

    #[test]
    fn self_is_spelled_as_the_source_type() {
        let runtime: syn::Path = parse_quote!(::catalog);
        let source: Ident = parse_quote!(Tree);

        let boxed = classify(parse_quote!(Box<Self>));
        assert_eq!(
            boxed.reference_type(&runtime, &source).to_string(),
            quote!(::catalog::Binding<Box<Tree> >).to_string()
        );

        let nested = classify(parse_quote!(Binding<Vec<(Self, Option<Self>)>>));
        assert_eq!(
            nested.reference_type(&runtime, &source).to_string(),
            quote!(Binding<Vec<(Tree, Option<Tree>)> >).to_string()
        );

        let unrelated = classify(parse_quote!(SelfRef));
        assert_eq!(
            unrelated.reference_type(&runtime, &source).to_string(),
            quote!(::catalog::Binding<SelfRef>).to_string()
        );
    }

    #[test]
    fn custom_reference_ident_is_honoured() {
        let ty: Type = parse_quote!(Lens<u8>);
        assert!(FieldShape::classify(&ty, "Lens").is_reference());
        assert!(!FieldShape::classify(&ty, "Binding").is_reference());
    }
}
