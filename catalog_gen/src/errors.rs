use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the derivation engine.
pub type GenResult<T> = Result<T, GenError>;

/// Reasons a declaration annotated with `#[one_of]` cannot be derived.
///
/// These never abort a pass: they are turned into a [`crate::Diagnostic`]
/// carrying a fix that removes the annotation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The annotated item is not an enumeration.
    #[error("`#[{attribute}]` is only valid for enumerations (found {kind})")]
    NotAVariant {
        kind: &'static str,
        attribute: String,
    },

    /// The annotated enumeration declares generic parameters.
    #[error("`#[{attribute}]` does not support generic enumerations (`{ident}`)")]
    Generic { ident: String, attribute: String },

    /// The annotation's own arguments did not parse.
    #[error("invalid `#[{attribute}]` arguments: {reason}")]
    InvalidArguments { reason: String, attribute: String },
}

impl ShapeError {
    /* Short, user-facing message without the found-kind detail */
    pub fn headline(&self) -> String {
        match self {
            ShapeError::NotAVariant { attribute, .. } => {
                format!("`#[{attribute}]` is only valid for enumerations.")
            }
            ShapeError::Generic { attribute, .. } => {
                format!("`#[{attribute}]` does not support generic enumerations.")
            }
            ShapeError::InvalidArguments { reason, attribute } => {
                format!("Invalid `#[{attribute}]` arguments: {reason}.")
            }
        }
    }
}

/// Top-level errors produced by the engine outside of shape validation.
#[derive(Debug, Error)]
pub enum GenError {
    /// Source text or generated tokens failed to parse.
    #[error("failed to parse: {0}")]
    Parse(#[from] syn::Error),

    /// Reading a source or configuration file failed.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration YAML was malformed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yml::Error),

    /// A configuration value does not form a valid Rust path or identifier.
    #[error("invalid option '{name}': {reason}")]
    InvalidOption { name: &'static str, reason: String },
}

impl GenError {
    /// Renders the error as a `compile_error!` invocation for macro frontends.
    pub fn to_compile_error(&self) -> proc_macro2::TokenStream {
        match self {
            GenError::Parse(error) => error.to_compile_error(),
            other => syn::Error::new(proc_macro2::Span::call_site(), other.to_string())
                .to_compile_error(),
        }
    }
}
