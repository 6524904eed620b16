/* Structural scans over the items surrounding an annotated declaration */

use proc_macro2::Ident;
use syn::{Item, Path, Type};

/// True when a sibling already declares the tag type, i.e. the declaration
/// has been expanded before. Derivation then produces nothing.
pub fn already_expanded(tags: &Ident, siblings: &[Item]) -> bool {
    siblings
        .iter()
        .any(|item| declared_type_ident(item).is_some_and(|ident| ident == tags))
}

/// True when a sibling `impl <Trait> for <source>` exists, spelled either
/// bare or through the runtime crate path.
pub fn already_conformed(source: &Ident, siblings: &[Item], runtime: &Path, trait_ident: &str) -> bool {
    siblings.iter().any(|item| {
        let Item::Impl(item_impl) = item else {
            return false;
        };
        let Some((None, trait_path, _)) = &item_impl.trait_ else {
            return false;
        };
        names_trait(trait_path, runtime, trait_ident) && names_type(&item_impl.self_ty, source)
    })
}

fn declared_type_ident(item: &Item) -> Option<&Ident> {
    match item {
        Item::Enum(item) => Some(&item.ident),
        Item::Struct(item) => Some(&item.ident),
        Item::Type(item) => Some(&item.ident),
        Item::Union(item) => Some(&item.ident),
        _ => None,
    }
}

fn segments(path: &Path) -> Vec<String> {
    path.segments.iter().map(|segment| segment.ident.to_string()).collect()
}

fn names_trait(path: &Path, runtime: &Path, trait_ident: &str) -> bool {
    let spelled = segments(path);
    let mut qualified = segments(runtime);
    qualified.push(trait_ident.to_string());
    spelled == [trait_ident] || spelled == qualified
}

fn names_type(ty: &Type, source: &Ident) -> bool {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => {
            let path = &type_path.path;
            path.segments.len() == 1 && path.is_ident(source)
        }
        Type::Group(group) => names_type(&group.elem, source),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::Span;
    use syn::parse_quote;

    fn ident(name: &str) -> Ident {
        Ident::new(name, Span::call_site())
    }

    #[test]
    fn sibling_tag_type_marks_expansion() {
        let siblings: Vec<Item> = vec![
            parse_quote!(enum Content { Text }),
            parse_quote!(pub enum ContentTags { Text }),
        ];
        assert!(already_expanded(&ident("ContentTags"), &siblings));
        assert!(!already_expanded(&ident("OtherTags"), &siblings));
        assert!(!already_expanded(&ident("ContentTags"), &[]));
    }

    #[test]
    fn functions_named_like_tags_do_not_count() {
        let siblings: Vec<Item> = vec![parse_quote!(fn ContentTags() {})];
        assert!(!already_expanded(&ident("ContentTags"), &siblings));
    }

    #[test]
    fn conformance_is_found_bare_or_qualified() {
        let runtime: Path = parse_quote!(::catalog);
        let bare: Vec<Item> = vec![parse_quote!(impl OneOf for Content {})];
        let qualified: Vec<Item> = vec![parse_quote!(impl catalog::OneOf for Content {})];
        let other_type: Vec<Item> = vec![parse_quote!(impl OneOf for Position {})];
        let inherent: Vec<Item> = vec![parse_quote!(impl Content {})];
        let negative: Vec<Item> = vec![parse_quote!(impl !OneOf for Content {})];

        let source = ident("Content");
        assert!(already_conformed(&source, &bare, &runtime, "OneOf"));
        assert!(already_conformed(&source, &qualified, &runtime, "OneOf"));
        assert!(!already_conformed(&source, &other_type, &runtime, "OneOf"));
        assert!(!already_conformed(&source, &inherent, &runtime, "OneOf"));
        assert!(!already_conformed(&source, &negative, &runtime, "OneOf"));
    }
}
