/* Shape validation: only plain enumerations are derivable */

use crate::errors::ShapeError;
use syn::{Item, ItemEnum};

/// Terminal state of validation for one declaration.
#[derive(Debug)]
pub enum Validation<'a> {
    Accepted(&'a ItemEnum),
    Rejected(ShapeError),
}

pub fn validate(item: &Item) -> Validation<'_> {
    validate_with(item, "one_of")
}

pub fn validate_with<'a>(item: &'a Item, attribute: &str) -> Validation<'a> {
    let Item::Enum(item_enum) = item else {
        return Validation::Rejected(ShapeError::NotAVariant {
            kind: item_kind(item),
            attribute: attribute.to_string(),
        });
    };

    if !item_enum.generics.params.is_empty() || item_enum.generics.where_clause.is_some() {
        return Validation::Rejected(ShapeError::Generic {
            ident: item_enum.ident.to_string(),
            attribute: attribute.to_string(),
        });
    }

    Validation::Accepted(item_enum)
}

pub fn item_kind(item: &Item) -> &'static str {
    match item {
        Item::Const(_) => "const",
        Item::Enum(_) => "enum",
        Item::ExternCrate(_) => "extern crate",
        Item::Fn(_) => "fn",
        Item::ForeignMod(_) => "extern block",
        Item::Impl(_) => "impl",
        Item::Macro(_) => "macro invocation",
        Item::Mod(_) => "mod",
        Item::Static(_) => "static",
        Item::Struct(_) => "struct",
        Item::Trait(_) => "trait",
        Item::TraitAlias(_) => "trait alias",
        Item::Type(_) => "type alias",
        Item::Union(_) => "union",
        Item::Use(_) => "use",
        _ => "item",
    }
}
