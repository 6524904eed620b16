//! Per-alternative renderings.
//!
//! [`render`] is pure and total: every [`Alternative`] yields the four
//! fragments of [`RenderMode`], all sharing one field order and one set of
//! positional capture names (`_0`, `_1`, ...).
//!
//! The rebuild rendering is the lens: each field becomes a `Binding` whose
//! getter returns the captured value and whose setter writes a whole new
//! alternative through the root handle, with only that position replaced.
//! No interior aliasing into the enum is ever taken.

use crate::config::{DeriveOptions, GenConfig, parse_ident};
use crate::errors::GenResult;
use crate::schema::{Alternative, VariantStyle};
use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote};

/* Name of the root handle parameter inside the binding constructor */
pub(crate) const ROOT_HANDLE: &str = "choice";

/// Resolved names shared by every rendering of one declaration.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub source: Ident,
    pub tags: Ident,
    pub bindings: Ident,
    pub runtime: syn::Path,
    pub conformance_trait: Ident,
}

impl RenderContext {
    pub fn new(source: &Ident, config: &GenConfig, options: &DeriveOptions) -> GenResult<Self> {
        let runtime = match &options.runtime_crate {
            Some(path) => path.clone(),
            None => config.runtime_path()?,
        };
        let tags = match &options.tags {
            Some(tags) => tags.clone(),
            None => companion_ident("tags_suffix", source, &config.tags_suffix)?,
        };
        let bindings = match &options.bindings {
            Some(bindings) => bindings.clone(),
            None => companion_ident("bindings_suffix", source, &config.bindings_suffix)?,
        };
        let conformance_trait = parse_ident("conformance_trait", &config.conformance_trait)?;

        Ok(Self {
            source: source.clone(),
            tags,
            bindings,
            runtime,
            conformance_trait,
        })
    }
}

fn companion_ident(option: &'static str, source: &Ident, suffix: &str) -> GenResult<Ident> {
    let mut ident = parse_ident(option, &format!("{source}{suffix}"))?;
    ident.set_span(source.span());
    Ok(ident)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /* Variant of the tag type */
    TagOnly,
    /* Variant of the reference mirror */
    ReferenceTyped,
    /* Left side of a binding-constructor arm */
    PatternCapture,
    /* Right side of a binding-constructor arm */
    RebuildExpression,
}

impl RenderMode {
    pub const ALL: [RenderMode; 4] = [
        RenderMode::TagOnly,
        RenderMode::ReferenceTyped,
        RenderMode::PatternCapture,
        RenderMode::RebuildExpression,
    ];
}

#[derive(Debug, Clone)]
pub struct RenderedAlternative {
    pub name: Ident,
    pub tag_only: TokenStream,
    pub reference_typed: TokenStream,
    pub pattern_capture: TokenStream,
    pub rebuild_expression: TokenStream,
    /* `Self::Name { .. }`; read side of the choice accessor */
    pub read_pattern: TokenStream,
}

impl RenderedAlternative {
    pub fn get(&self, mode: RenderMode) -> &TokenStream {
        match mode {
            RenderMode::TagOnly => &self.tag_only,
            RenderMode::ReferenceTyped => &self.reference_typed,
            RenderMode::PatternCapture => &self.pattern_capture,
            RenderMode::RebuildExpression => &self.rebuild_expression,
        }
    }
}

pub fn render(alternative: &Alternative, ctx: &RenderContext) -> RenderedAlternative {
    tracing::trace!(
        alternative = %alternative.name,
        arity = alternative.arity(),
        "rendering alternative"
    );
    RenderedAlternative {
        name: alternative.name.clone(),
        tag_only: render_tag_only(alternative),
        reference_typed: render_reference_typed(alternative, ctx),
        pattern_capture: render_pattern_capture(alternative),
        rebuild_expression: render_rebuild_expression(alternative, ctx),
        read_pattern: render_read_pattern(alternative),
    }
}

pub(crate) fn capture_ident(index: usize) -> Ident {
    format_ident!("_{}", index)
}

fn captures(alternative: &Alternative) -> Vec<Ident> {
    (0..alternative.arity()).map(capture_ident).collect()
}

fn labels(alternative: &Alternative) -> Vec<&Ident> {
    alternative
        .fields
        .iter()
        .filter_map(|field| field.label.as_ref())
        .collect()
}

/* Wraps per-position fragments in the alternative's own field syntax */
fn shaped(alternative: &Alternative, head: TokenStream, parts: &[TokenStream]) -> TokenStream {
    match alternative.style {
        VariantStyle::Unit => head,
        VariantStyle::Tuple => quote! { #head(#(#parts),*) },
        VariantStyle::Named => {
            let labels = labels(alternative);
            quote! { #head { #(#labels: #parts),* } }
        }
    }
}

fn render_tag_only(alternative: &Alternative) -> TokenStream {
    let availability = &alternative.availability;
    let name = &alternative.name;
    quote! { #availability #name }
}

fn render_reference_typed(alternative: &Alternative, ctx: &RenderContext) -> TokenStream {
    let availability = &alternative.availability;
    let name = &alternative.name;
    let types: Vec<TokenStream> = alternative
        .fields
        .iter()
        .map(|field| field.shape.reference_type(&ctx.runtime, &ctx.source))
        .collect();
    let variant = shaped(alternative, quote!(#name), &types);
    quote! { #availability #variant }
}

fn render_pattern_capture(alternative: &Alternative) -> TokenStream {
    let name = &alternative.name;
    let captures: Vec<TokenStream> = captures(alternative)
        .into_iter()
        .map(|capture| quote!(#capture))
        .collect();
    shaped(alternative, quote!(Self::#name), &captures)
}

fn render_read_pattern(alternative: &Alternative) -> TokenStream {
    let name = &alternative.name;
    match alternative.style {
        VariantStyle::Unit => quote! { Self::#name },
        VariantStyle::Tuple => quote! { Self::#name(..) },
        VariantStyle::Named => quote! { Self::#name { .. } },
    }
}

fn render_rebuild_expression(alternative: &Alternative, ctx: &RenderContext) -> TokenStream {
    let name = &alternative.name;
    let bindings = &ctx.bindings;
    let references: Vec<TokenStream> = (0..alternative.arity())
        .map(|index| render_field_reference(alternative, index, ctx))
        .collect();
    shaped(alternative, quote!(#bindings::#name), &references)
}

/* The whole alternative, with `replacement` at `index` and the other captures held */
fn render_rebuilt_value(alternative: &Alternative, index: usize, replacement: &Ident) -> TokenStream {
    let name = &alternative.name;
    let values: Vec<TokenStream> = captures(alternative)
        .into_iter()
        .enumerate()
        .map(|(position, capture)| {
            if position == index {
                quote!(#replacement)
            } else {
                quote!(#capture.clone())
            }
        })
        .collect();
    shaped(alternative, quote!(Self::#name), &values)
}

fn render_field_reference(alternative: &Alternative, index: usize, ctx: &RenderContext) -> TokenStream {
    let field = &alternative.fields[index];
    let capture = capture_ident(index);

    /* Already a live reference: hand it out as-is, one layer only */
    if field.shape.is_reference() {
        return quote! { #capture.clone() };
    }

    let runtime = &ctx.runtime;
    let root = Ident::new(ROOT_HANDLE, Span::call_site());
    let value = Ident::new("__value", Span::call_site());
    let value_type = field.shape.value_type();
    let held: Vec<Ident> = captures(alternative)
        .into_iter()
        .enumerate()
        .filter(|(position, _)| *position != index)
        .map(|(_, capture)| capture)
        .collect();
    let rebuilt = render_rebuilt_value(alternative, index, &value);

    quote! {
        #runtime::Binding::new(
            {
                let #capture = #capture.clone();
                move || #capture.clone()
            },
            {
                let #root = #root.clone();
                #( let #held = #held.clone(); )*
                move |#value: #value_type| #root.set(#rebuilt)
            },
        )
    }
}
