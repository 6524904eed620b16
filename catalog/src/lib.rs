//! Runtime support for `#[one_of]` enumerations.
//!
//! [`Binding`] is the two-way reference the generated code hands out.
//! [`OneOf`] is implemented by the attribute; [`DefaultChoice`] is written by
//! hand and supplies the value an alternative starts from when selected.
//! `Option<T>` of a `OneOf` type is itself `OneOf`, with `None` as the last
//! alternative.

mod binding;
mod choice;

pub use binding::Binding;
pub use catalog_macros::one_of;
pub use choice::{DefaultChoice, OneOf};
