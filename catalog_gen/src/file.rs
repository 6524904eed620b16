//! Source-to-source pass over a whole Rust file.
//!
//! Every item annotated with the configured attribute (bare or as the last
//! segment of a path) is expanded, including inside inline `mod` blocks.
//! Siblings are the items of the same module. The annotation is removed
//! from the rewritten file and the companions follow the item directly.

use crate::config::{DeriveOptions, GenConfig};
use crate::diagnostics::Diagnostic;
use crate::emit::{Expansion, expand};
use crate::errors::{GenError, GenResult, ShapeError};
use quote::ToTokens;
use std::path::Path;
use syn::spanned::Spanned;
use syn::{Attribute, Item};

#[derive(Debug)]
pub struct FileExpansion {
    pub file: syn::File,
    /* One per rejected declaration, in source order */
    pub diagnostics: Vec<Diagnostic>,
    /* Number of declarations that produced companions */
    pub generated: usize,
}

impl FileExpansion {
    pub fn to_source(&self) -> String {
        self.file.to_token_stream().to_string()
    }

    /// Applies every diagnostic's fix to the text the pass was run on.
    pub fn apply_fixes(&self, source: &str) -> String {
        let mut edits: Vec<_> = self
            .diagnostics
            .iter()
            .filter_map(|diagnostic| diagnostic.fix.edit.as_ref())
            .collect();
        /* Back to front so earlier locations stay valid */
        edits.sort_by_key(|edit| std::cmp::Reverse(edit.start));
        edits
            .into_iter()
            .fold(source.to_string(), |text, edit| edit.apply(&text))
    }
}

#[derive(Default)]
struct Report {
    diagnostics: Vec<Diagnostic>,
    generated: usize,
}

impl Report {
    fn reject(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            line = diagnostic.location().line,
            error = %diagnostic.error,
            "rejected {}",
            diagnostic.message
        );
        self.diagnostics.push(diagnostic);
    }
}

pub fn expand_file(source: &str, config: &GenConfig) -> GenResult<FileExpansion> {
    config.check()?;
    let mut file = syn::parse_file(source)?;
    let mut report = Report::default();
    file.items = expand_items(std::mem::take(&mut file.items), config, &mut report)?;

    tracing::debug!(
        generated = report.generated,
        rejected = report.diagnostics.len(),
        "expanded file"
    );
    Ok(FileExpansion {
        file,
        diagnostics: report.diagnostics,
        generated: report.generated,
    })
}

pub fn expand_path(path: &Path, config: &GenConfig) -> GenResult<FileExpansion> {
    let source = std::fs::read_to_string(path).map_err(|source| GenError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "expanding source file");
    expand_file(&source, config)
}

fn expand_items(items: Vec<Item>, config: &GenConfig, report: &mut Report) -> GenResult<Vec<Item>> {
    let siblings = items.clone();
    let mut out = Vec::with_capacity(items.len());

    for mut item in items {
        if let Item::Mod(module) = &mut item {
            if let Some((_, content)) = &mut module.content {
                *content = expand_items(std::mem::take(content), config, report)?;
            }
        }

        let Some(annotation) = take_annotation(&mut item, &config.attribute) else {
            out.push(item);
            continue;
        };
        let options = match DeriveOptions::from_attribute(&annotation) {
            Ok(options) => options,
            Err(error) => {
                let error = ShapeError::InvalidArguments {
                    reason: error.to_string(),
                    attribute: config.attribute.clone(),
                };
                let diagnostic = Diagnostic::rejection(error, item.span(), &config.attribute);
                report.reject(diagnostic.with_annotation(&annotation));
                out.push(item);
                continue;
            }
        };

        match expand(&item, &siblings, config, &options)? {
            Expansion::Generated(decls) => {
                report.generated += 1;
                out.push(item);
                out.extend(decls.into_items());
            }
            Expansion::Skipped => out.push(item),
            Expansion::Rejected(diagnostic) => {
                report.reject(diagnostic.with_annotation(&annotation));
                out.push(item);
            }
        }
    }

    Ok(out)
}

fn is_annotation(attr: &Attribute, attribute: &str) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == attribute)
}

/* Removes and returns the first annotation naming `attribute` */
fn take_annotation(item: &mut Item, attribute: &str) -> Option<Attribute> {
    let attrs = item_attrs_mut(item)?;
    let position = attrs.iter().position(|attr| is_annotation(attr, attribute))?;
    Some(attrs.remove(position))
}

/* Drops every annotation naming `attribute`; returns how many there were */
pub(crate) fn strip_annotations(item: &mut Item, attribute: &str) -> usize {
    let Some(attrs) = item_attrs_mut(item) else {
        return 0;
    };
    let before = attrs.len();
    attrs.retain(|attr| !is_annotation(attr, attribute));
    before - attrs.len()
}

fn item_attrs_mut(item: &mut Item) -> Option<&mut Vec<Attribute>> {
    match item {
        Item::Const(item) => Some(&mut item.attrs),
        Item::Enum(item) => Some(&mut item.attrs),
        Item::ExternCrate(item) => Some(&mut item.attrs),
        Item::Fn(item) => Some(&mut item.attrs),
        Item::ForeignMod(item) => Some(&mut item.attrs),
        Item::Impl(item) => Some(&mut item.attrs),
        Item::Macro(item) => Some(&mut item.attrs),
        Item::Mod(item) => Some(&mut item.attrs),
        Item::Static(item) => Some(&mut item.attrs),
        Item::Struct(item) => Some(&mut item.attrs),
        Item::Trait(item) => Some(&mut item.attrs),
        Item::TraitAlias(item) => Some(&mut item.attrs),
        Item::Type(item) => Some(&mut item.attrs),
        Item::Union(item) => Some(&mut item.attrs),
        Item::Use(item) => Some(&mut item.attrs),
        _ => None,
    }
}
