//! Derivation engine behind `#[one_of]`.
//!
//! Given a Rust `enum`, the engine synthesizes companions that let a UI
//! present and edit the current alternative through live two-way bindings:
//!
//! * `{Name}Tags`, one fieldless variant per alternative, with `ALL` and `name`;
//! * `{Name}Bindings`, the same alternatives with every field as a `Binding`;
//! * `choice` / `set_choice` on `{Name}`;
//! * `{Name}::binding`, building field bindings from a binding to the whole value;
//! * `impl OneOf for {Name}`, unless one already exists.
//!
//! The engine is pure: [`expand`] works on one parsed item, [`expand_file`]
//! rewrites a whole source file, and [`expand_attribute`] serves the
//! attribute macro.

pub mod availability;
pub mod config;
pub mod diagnostics;
pub mod emit;
pub mod errors;
pub mod file;
pub mod guard;
pub mod normalize;
pub mod render;
pub mod schema;
pub mod synth;
pub mod validate;

pub use availability::Availability;
pub use config::{DeriveOptions, GenConfig};
pub use diagnostics::{Diagnostic, Fix, Location, TextEdit};
pub use emit::{Expansion, expand, expand_attribute};
pub use errors::{GenError, GenResult, ShapeError};
pub use file::{FileExpansion, expand_file, expand_path};
pub use guard::{already_conformed, already_expanded};
pub use normalize::FieldShape;
pub use render::{RenderContext, RenderMode, RenderedAlternative, render};
pub use schema::{Alternative, Field, VariantDecl, VariantStyle};
pub use synth::{GeneratedDecls, synthesize};
pub use validate::{Validation, validate};
