use crate::Binding;
use std::fmt;

/// A value that is exactly one of a closed set of alternatives.
///
/// Usually implemented by `#[one_of]`. `Tags` names the alternatives without
/// their fields; `Bindings` exposes the fields of the current alternative as
/// [`Binding`]s.
pub trait OneOf: Sized {
    type Tags: Copy + Eq + fmt::Debug;
    type Bindings;

    fn choice(&self) -> Self::Tags;

    fn set_choice(&mut self, choice: Self::Tags);

    /// Every alternative, in declaration order.
    fn all_cases() -> Vec<Self::Tags>;

    fn name_for(choice: Self::Tags) -> String {
        format!("{choice:?}")
    }

    /// Bindings to the fields of the alternative `choice` currently holds.
    ///
    /// The derived implementation clones captured fields on every read and
    /// write, so it requires each field type to be `Clone`.
    fn binding(choice: &Binding<Self>) -> Self::Bindings;

    /// [`OneOf::all_cases`] without `ignored`, for pickers that hide some
    /// alternatives.
    fn filter_cases(ignored: &[Self::Tags]) -> Vec<Self::Tags> {
        Self::all_cases()
            .into_iter()
            .filter(|choice| !ignored.contains(choice))
            .collect()
    }
}

/// The value a freshly selected alternative starts from.
pub trait DefaultChoice: OneOf {
    fn default_for(choice: Self::Tags) -> Self;
}

/* `None` is one more alternative, listed last */
impl<T: DefaultChoice + Clone + 'static> OneOf for Option<T> {
    type Tags = Option<T::Tags>;
    type Bindings = Option<T::Bindings>;

    fn choice(&self) -> Self::Tags {
        self.as_ref().map(T::choice)
    }

    fn set_choice(&mut self, choice: Self::Tags) {
        *self = Self::default_for(choice);
    }

    fn all_cases() -> Vec<Self::Tags> {
        T::all_cases()
            .into_iter()
            .map(Some)
            .chain(std::iter::once(None))
            .collect()
    }

    fn name_for(choice: Self::Tags) -> String {
        match choice {
            Some(choice) => T::name_for(choice),
            None => "none".to_string(),
        }
    }

    fn binding(choice: &Binding<Self>) -> Self::Bindings {
        choice
            .get()
            .map(|current| T::binding(&choice.on_none(current)))
    }
}

impl<T: DefaultChoice + Clone + 'static> DefaultChoice for Option<T> {
    fn default_for(choice: Self::Tags) -> Self {
        choice.map(T::default_for)
    }
}
