//! Normalized model of an annotated enumeration.
//!
//! [`VariantDecl`] is built once per derivation from the parsed item and is
//! never mutated afterwards. Field order is preserved everywhere: it drives
//! the positional captures (`_0`, `_1`, ...) used by the renderer.

use crate::availability::Availability;
use crate::errors::ShapeError;
use crate::normalize::FieldShape;
use crate::validate::{Validation, validate};
use proc_macro2::Ident;
use syn::{Fields, Item, ItemEnum, Type, Variant, Visibility};

/// How an alternative spells its fields in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantStyle {
    Unit,
    Tuple,
    Named,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub label: Option<Ident>,
    pub ty: Type,
    pub shape: FieldShape,
}

impl Field {
    /// Builds a field, treating the `_` placeholder label as no label.
    pub fn new(label: Option<Ident>, ty: Type, reference_ident: &str) -> Self {
        let label = label.filter(|label| label != "_");
        let shape = FieldShape::classify(&ty, reference_ident);
        Self { label, ty, shape }
    }
}

#[derive(Debug, Clone)]
pub struct Alternative {
    pub name: Ident,
    pub fields: Vec<Field>,
    pub style: VariantStyle,
    pub availability: Availability,
}

impl Alternative {
    /// An alternative is positional as soon as one field lacks a label.
    pub fn new(name: Ident, fields: Vec<Field>, availability: Availability) -> Self {
        let style = if fields.is_empty() {
            VariantStyle::Unit
        } else if fields.iter().all(|field| field.label.is_some()) {
            VariantStyle::Named
        } else {
            VariantStyle::Tuple
        };
        Self { name, fields, style, availability }
    }

    fn from_variant(variant: &Variant, reference_ident: &str) -> Self {
        /* Field attributes (docs, default markers) do not reach the mirror */
        let fields = match &variant.fields {
            Fields::Named(named) => named
                .named
                .iter()
                .map(|field| Field::new(field.ident.clone(), field.ty.clone(), reference_ident))
                .collect(),
            Fields::Unnamed(unnamed) => unnamed
                .unnamed
                .iter()
                .map(|field| Field::new(None, field.ty.clone(), reference_ident))
                .collect(),
            Fields::Unit => Vec::new(),
        };
        Self::new(
            variant.ident.clone(),
            fields,
            Availability::collect(&variant.attrs),
        )
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }
}

#[derive(Debug, Clone)]
pub struct VariantDecl {
    pub ident: Ident,
    pub vis: Visibility,
    pub availability: Availability,
    pub alternatives: Vec<Alternative>,
}

impl VariantDecl {
    pub fn from_item(item: &Item, reference_ident: &str) -> Result<Self, ShapeError> {
        match validate(item) {
            Validation::Accepted(item_enum) => Ok(Self::from_enum(item_enum, reference_ident)),
            Validation::Rejected(error) => Err(error),
        }
    }

    pub fn from_enum(item: &ItemEnum, reference_ident: &str) -> Self {
        let alternatives = item
            .variants
            .iter()
            .map(|variant| Alternative::from_variant(variant, reference_ident))
            .collect();
        Self {
            ident: item.ident.clone(),
            vis: item.vis.clone(),
            availability: Availability::collect(&item.attrs),
            alternatives,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::Span;
    use quote::ToTokens;
    use syn::parse_quote;

    fn type_string(field: &Field) -> String {
        field.ty.to_token_stream().to_string()
    }

    #[test]
    fn struct_is_not_a_variant() {
        let item: Item = parse_quote! {
            pub struct Content {
                sample: String,
            }
        };
        assert!(matches!(
            VariantDecl::from_item(&item, "Binding"),
            Err(ShapeError::NotAVariant { kind: "struct", .. })
        ));
    }

    #[test]
    fn alternatives_and_fields_keep_order_and_labels() {
        let item: Item = parse_quote! {
            pub(crate) enum Content {
                Text { text: String, icon: Option<Icon>, icon_position: Position },
                Icon(Icon, String),
                Empty,
            }
        };
        let decl = VariantDecl::from_item(&item, "Binding").unwrap();
        let names: Vec<String> = decl.alternatives.iter().map(|alt| alt.name.to_string()).collect();
        assert_eq!(names, vec!["Text", "Icon", "Empty"]);
        assert!(matches!(decl.vis, Visibility::Restricted(_)));

        let text = &decl.alternatives[0];
        assert_eq!(text.style, VariantStyle::Named);
        let labels: Vec<String> = text
            .fields
            .iter()
            .map(|field| field.label.as_ref().unwrap().to_string())
            .collect();
        assert_eq!(labels, vec!["text", "icon", "icon_position"]);
        assert_eq!(type_string(&text.fields[1]), quote::quote!(Option<Icon>).to_string());

        let icon = &decl.alternatives[1];
        assert_eq!(icon.style, VariantStyle::Tuple);
        assert!(icon.fields.iter().all(|field| field.label.is_none()));

        assert_eq!(decl.alternatives[2].style, VariantStyle::Unit);
        assert_eq!(decl.alternatives[2].arity(), 0);
    }

    #[test]
    fn field_attributes_are_dropped_and_variant_cfg_kept() {
        let item: Item = parse_quote! {
            enum Flag {
                #[cfg(feature = "extra")]
                On {
                    /// Shown next to the toggle.
                    #[serde(default)]
                    label: String,
                },
                Off,
            }
        };
        let decl = VariantDecl::from_item(&item, "Binding").unwrap();
        assert_eq!(decl.alternatives[0].availability.attrs().len(), 1);
        assert!(decl.alternatives[1].availability.is_empty());
        assert_eq!(type_string(&decl.alternatives[0].fields[0]), "String");
    }

    #[test]
    fn placeholder_label_renders_positionally() {
        let ignored = Ident::new("_", Span::call_site());
        let named = Ident::new("icon", Span::call_site());
        let alt = Alternative::new(
            Ident::new("Text", Span::call_site()),
            vec![
                Field::new(Some(ignored), parse_quote!(String), "Binding"),
                Field::new(Some(named), parse_quote!(Icon), "Binding"),
            ],
            Availability::default(),
        );
        assert!(alt.fields[0].label.is_none());
        assert_eq!(alt.style, VariantStyle::Tuple);
    }

    #[test]
    fn already_reference_fields_are_classified() {
        let item: Item = parse_quote! {
            enum Linked {
                Mirror(Binding<i32>),
                Plain { value: i32 },
            }
        };
        let decl = VariantDecl::from_item(&item, "Binding").unwrap();
        assert!(decl.alternatives[0].fields[0].shape.is_reference());
        assert!(!decl.alternatives[1].fields[0].shape.is_reference());
    }
}
