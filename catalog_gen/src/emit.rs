//! The derivation pipeline for one declaration.
//!
//! [`expand`] runs validation, the idempotency guard, extraction, rendering
//! and synthesis in that order and reports one of three terminal states.
//! [`expand_attribute`] is the token-level entry used by the `#[one_of]`
//! attribute macro.

use crate::config::{DeriveOptions, GenConfig};
use crate::diagnostics::Diagnostic;
use crate::errors::GenResult;
use crate::file::strip_annotations;
use crate::guard::{already_conformed, already_expanded};
use crate::render::{RenderContext, render};
use crate::schema::VariantDecl;
use crate::synth::{GeneratedDecls, synthesize};
use crate::validate::{Validation, validate_with};
use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, quote};
use syn::Item;
use syn::spanned::Spanned;

#[derive(Debug)]
pub enum Expansion {
    /// Companions to insert after the declaration.
    Generated(Box<GeneratedDecls>),
    /// The declaration was expanded before; nothing is produced.
    Skipped,
    /// The declaration cannot be derived; nothing is produced.
    Rejected(Diagnostic),
}

impl Expansion {
    pub fn decls(&self) -> Option<&GeneratedDecls> {
        match self {
            Expansion::Generated(decls) => Some(decls.as_ref()),
            _ => None,
        }
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Expansion::Rejected(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }
}

/// Derives the companions of `item`.
///
/// `siblings` are the other items of the enclosing module, used by the
/// idempotency and conformance checks. Shape problems are reported as
/// [`Expansion::Rejected`]; `Err` is reserved for configuration errors.
pub fn expand(
    item: &Item,
    siblings: &[Item],
    config: &GenConfig,
    options: &DeriveOptions,
) -> GenResult<Expansion> {
    let item_enum = match validate_with(item, &config.attribute) {
        Validation::Accepted(item_enum) => item_enum,
        Validation::Rejected(error) => {
            return Ok(Expansion::Rejected(Diagnostic::rejection(
                error,
                item.span(),
                &config.attribute,
            )));
        }
    };

    let ctx = RenderContext::new(&item_enum.ident, config, options)?;
    if already_expanded(&ctx.tags, siblings) {
        tracing::debug!(ident = %item_enum.ident, tags = %ctx.tags, "already expanded, skipping");
        return Ok(Expansion::Skipped);
    }

    let decl = VariantDecl::from_enum(item_enum, &config.reference_ident);
    let rendered: Vec<_> = decl
        .alternatives
        .iter()
        .map(|alternative| render(alternative, &ctx))
        .collect();

    let conform = !already_conformed(&decl.ident, siblings, &ctx.runtime, &config.conformance_trait);
    if !conform {
        tracing::debug!(ident = %decl.ident, "conformance already declared");
    }

    let decls = synthesize(&decl, &rendered, &ctx, conform)?;
    tracing::debug!(
        ident = %decl.ident,
        alternatives = decl.alternatives.len(),
        "generated one_of companions"
    );
    Ok(Expansion::Generated(Box::new(decls)))
}

/// Expansion of `#[one_of]` on `item`.
///
/// The item is always re-emitted, so a rejected declaration still resolves
/// for the code around it; the diagnostic is anchored on the annotation.
/// Further `#[one_of]` annotations on the same item are dropped.
pub fn expand_attribute(mut item: Item, options: &DeriveOptions) -> TokenStream {
    let config = GenConfig::default();
    let repeated = strip_annotations(&mut item, &config.attribute);
    if repeated > 0 {
        tracing::debug!(repeated, "dropped repeated annotations");
    }

    match expand(&item, &[], &config, options) {
        Ok(Expansion::Generated(decls)) => quote! {
            #item
            #decls
        },
        Ok(Expansion::Skipped) => item.into_token_stream(),
        Ok(Expansion::Rejected(mut diagnostic)) => {
            diagnostic.span = Span::call_site();
            let error = diagnostic.to_compile_error();
            quote! {
                #error
                #item
            }
        }
        Err(error) => {
            let error = error.to_compile_error();
            quote! {
                #error
                #item
            }
        }
    }
}
