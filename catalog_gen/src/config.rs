//! Engine configuration.
//!
//! [`GenConfig`] holds the naming conventions shared by every declaration in
//! a pass and can be loaded from YAML. [`DeriveOptions`] carries the
//! per-declaration overrides written as `#[one_of(...)]` arguments.

use crate::errors::{GenError, GenResult};
use proc_macro2::Ident;
use serde::Deserialize;
use std::path::Path;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr, Meta};

/* ============================================================================
   Pass Configuration
   ============================================================================ */

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenConfig {
    /* Path of the runtime crate providing `Binding`, `OneOf` and `DefaultChoice` */
    pub runtime_crate: String,
    /* Name of the annotation requesting derivation */
    pub attribute: String,
    /* Suffix appended to the enum name for the tag type */
    pub tags_suffix: String,
    /* Suffix appended to the enum name for the reference mirror type */
    pub bindings_suffix: String,
    /* Last path segment identifying an already reference-typed field */
    pub reference_ident: String,
    /* Capability trait attached by the conformance impl */
    pub conformance_trait: String,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            runtime_crate: "::catalog".to_string(),
            attribute: "one_of".to_string(),
            tags_suffix: "Tags".to_string(),
            bindings_suffix: "Bindings".to_string(),
            reference_ident: "Binding".to_string(),
            conformance_trait: "OneOf".to_string(),
        }
    }
}

impl GenConfig {
    /* Parse and check a YAML configuration document */
    pub fn from_yaml_str(yaml: &str) -> GenResult<Self> {
        let config: GenConfig = serde_yml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /* Load a YAML configuration file from disk */
    pub fn load(path: &Path) -> GenResult<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|source| GenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Confirms every configured name forms valid Rust syntax.
    pub fn check(&self) -> GenResult<()> {
        self.runtime_path()?;
        parse_ident("attribute", &self.attribute)?;
        parse_ident("reference_ident", &self.reference_ident)?;
        parse_ident("conformance_trait", &self.conformance_trait)?;
        parse_ident("tags_suffix", &format!("T{}", self.tags_suffix))?;
        parse_ident("bindings_suffix", &format!("T{}", self.bindings_suffix))?;
        if self.tags_suffix == self.bindings_suffix {
            return Err(GenError::InvalidOption {
                name: "bindings_suffix",
                reason: "must differ from tags_suffix".to_string(),
            });
        }
        Ok(())
    }

    pub fn runtime_path(&self) -> GenResult<syn::Path> {
        syn::parse_str(&self.runtime_crate).map_err(|err| GenError::InvalidOption {
            name: "runtime_crate",
            reason: err.to_string(),
        })
    }
}

pub(crate) fn parse_ident(name: &'static str, text: &str) -> GenResult<Ident> {
    syn::parse_str(text).map_err(|err| GenError::InvalidOption {
        name,
        reason: format!("`{text}` is not an identifier: {err}"),
    })
}

/* ============================================================================
   Per-declaration Options
   ============================================================================ */

/// Overrides taken from `#[one_of(crate = "...", tags = "...", bindings = "...")]`.
#[derive(Debug, Clone, Default)]
pub struct DeriveOptions {
    pub runtime_crate: Option<syn::Path>,
    pub tags: Option<Ident>,
    pub bindings: Option<Ident>,
}

impl DeriveOptions {
    /// Parses one `key = "value"` entry; suitable for `syn::meta::parser`.
    pub fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("crate") {
            let lit: LitStr = meta.value()?.parse()?;
            self.runtime_crate = Some(lit.parse()?);
        } else if meta.path.is_ident("tags") {
            let lit: LitStr = meta.value()?.parse()?;
            self.tags = Some(lit.parse()?);
        } else if meta.path.is_ident("bindings") {
            let lit: LitStr = meta.value()?.parse()?;
            self.bindings = Some(lit.parse()?);
        } else {
            return Err(meta.error("unsupported one_of property"));
        }
        Ok(())
    }

    /// Reads the options out of an annotation found in source text.
    pub fn from_attribute(attr: &Attribute) -> syn::Result<Self> {
        let mut options = DeriveOptions::default();
        if let Meta::Path(_) = attr.meta {
            return Ok(options);
        }
        attr.parse_nested_meta(|meta| options.parse_meta(meta))?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn yaml_overrides_only_named_fields() {
        let config = GenConfig::from_yaml_str("tags_suffix: Kind\nruntime_crate: \"crate::ui\"\n").unwrap();
        assert_eq!(config.tags_suffix, "Kind");
        assert_eq!(config.runtime_crate, "crate::ui");
        assert_eq!(config.bindings_suffix, "Bindings");
    }

    #[test]
    fn yaml_rejects_unknown_keys() {
        assert!(matches!(
            GenConfig::from_yaml_str("tag_suffix: Kind\n"),
            Err(GenError::Config(_))
        ));
    }

    #[test]
    fn invalid_runtime_path_is_reported() {
        let err = GenConfig::from_yaml_str("runtime_crate: \"not a path\"\n").unwrap_err();
        assert!(matches!(err, GenError::InvalidOption { name: "runtime_crate", .. }));
    }

    #[test]
    fn colliding_suffixes_are_rejected() {
        let err = GenConfig::from_yaml_str("tags_suffix: Mirror\nbindings_suffix: Mirror\n")
            .unwrap_err();
        assert!(matches!(err, GenError::InvalidOption { name: "bindings_suffix", .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.yaml");
        std::fs::write(&path, "bindings_suffix: Refs\n").unwrap();
        let config = GenConfig::load(&path).unwrap();
        assert_eq!(config.bindings_suffix, "Refs");

        let missing = GenConfig::load(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(missing, GenError::Io { .. }));
    }

    #[test]
    fn attribute_options_are_parsed() {
        let attr: Attribute = parse_quote!(#[one_of(crate = "crate::rt", tags = "Kind")]);
        let options = DeriveOptions::from_attribute(&attr).unwrap();
        assert_eq!(options.tags.unwrap(), "Kind");
        assert!(options.bindings.is_none());
        assert!(options.runtime_crate.is_some());

        let bare: Attribute = parse_quote!(#[one_of]);
        assert!(DeriveOptions::from_attribute(&bare).unwrap().tags.is_none());

        let bogus: Attribute = parse_quote!(#[one_of(unknown = "x")]);
        assert!(DeriveOptions::from_attribute(&bogus).is_err());
    }
}
