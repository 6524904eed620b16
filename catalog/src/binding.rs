use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A live two-way reference to a value owned elsewhere.
///
/// A binding is a getter plus a setter. Clones share both. Reads return the
/// value by copy, so a write never overlaps a read of the same root.
pub struct Binding<T> {
    get: Rc<dyn Fn() -> T>,
    set: Rc<dyn Fn(T)>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            get: Rc::clone(&self.get),
            set: Rc::clone(&self.set),
        }
    }
}

impl<T: 'static> Binding<T> {
    pub fn new(get: impl Fn() -> T + 'static, set: impl Fn(T) + 'static) -> Self {
        Self {
            get: Rc::new(get),
            set: Rc::new(set),
        }
    }

    /// Root binding over a shared cell.
    pub fn from_cell(cell: Rc<RefCell<T>>) -> Self
    where
        T: Clone,
    {
        let reader = Rc::clone(&cell);
        Self::new(
            move || reader.borrow().clone(),
            move |value| *cell.borrow_mut() = value,
        )
    }

    /// Root binding owning a fresh cell holding `value`.
    pub fn shared(value: T) -> Self
    where
        T: Clone,
    {
        Self::from_cell(Rc::new(RefCell::new(value)))
    }

    /// Read-only binding; writes are dropped.
    pub fn constant(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(move || value.clone(), |_| {})
    }

    pub fn get(&self) -> T {
        (self.get)()
    }

    pub fn set(&self, value: T) {
        (self.set)(value)
    }

    /// Read, modify in place, write back.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut value = self.get();
        f(&mut value);
        self.set(value);
    }

    /// Lens into a part of the value.
    ///
    /// Writing the part reads the whole value, patches it with `set` and
    /// writes the whole value back.
    pub fn map<U: 'static>(
        &self,
        get: impl Fn(&T) -> U + 'static,
        set: impl Fn(&mut T, U) + 'static,
    ) -> Binding<U> {
        let reader = self.clone();
        let writer = self.clone();
        Binding::new(
            move || get(&reader.get()),
            move |part| {
                let mut whole = writer.get();
                set(&mut whole, part);
                writer.set(whole);
            },
        )
    }
}

impl<W: Clone + 'static> Binding<Option<W>> {
    /// Unwrapped view of an optional value; reads `fallback` while empty and
    /// writes always store `Some`.
    pub fn on_none(&self, fallback: W) -> Binding<W> {
        let reader = self.clone();
        let writer = self.clone();
        Binding::new(
            move || reader.get().unwrap_or_else(|| fallback.clone()),
            move |value| writer.set(Some(value)),
        )
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Binding").field(&self.get()).finish()
    }
}
