//! Positional state cells owned by components.
//!
//! A [`StateCell`] holds one value and a changed flag. Writes go through a
//! [`Setter`], which compares by value: writing an equal value is a no-op and
//! never marks the owning component dirty. The flag is cleared by the owning
//! component at the end of each of its renders.

use alloc::rc::Rc;
use core::{
    any::{Any, type_name},
    cell::{Cell, RefCell},
    fmt,
};

/// A single persisted, change-tracked value.
pub struct StateCell<T> {
    value: RefCell<T>,
    changed: Cell<bool>,
}

impl<T> StateCell<T> {
    /// Creates an unchanged cell holding `value`.
    pub const fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            changed: Cell::new(false),
        }
    }

    /// Returns `true` if the value was replaced since the last render.
    ///
    /// Reading the flag does not reset it.
    pub fn is_changed(&self) -> bool {
        self.changed.get()
    }

    pub(crate) fn settle(&self) {
        self.changed.set(false);
    }
}

impl<T: Clone> StateCell<T> {
    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }
}

impl<T: PartialEq> StateCell<T> {
    /// Replaces the value if it differs from the current one.
    pub fn set(&self, value: T) {
        let mut current = self.value.borrow_mut();
        if *current != value {
            *current = value;
            self.changed.set(true);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCell")
            .field("value", &self.value)
            .field("changed", &self.changed.get())
            .finish()
    }
}

/// Writes to a [`StateCell`] from event handlers.
pub struct Setter<T>(Rc<StateCell<T>>);

impl<T> Setter<T> {
    pub(crate) const fn new(cell: Rc<StateCell<T>>) -> Self {
        Self(cell)
    }
}

impl<T: PartialEq> Setter<T> {
    /// Stores `value`, marking the owning component dirty if it changed.
    pub fn set(&self, value: T) {
        self.0.set(value);
    }
}

impl<T: Clone> Setter<T> {
    /// Returns the latest value, including writes made after the last render.
    #[must_use]
    pub fn get(&self) -> T {
        self.0.get()
    }
}

impl<T: Clone + PartialEq> Setter<T> {
    /// Computes a new value from the latest one and stores it.
    pub fn update(&self, f: impl FnOnce(T) -> T) {
        let next = f(self.get());
        self.set(next);
    }
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Setter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Setter<{}>", type_name::<T>())
    }
}

/// Type-erased view of a cell used by its owning component.
pub(crate) trait Slot {
    fn is_changed(&self) -> bool;
    fn settle(&self);
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

impl fmt::Debug for dyn Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("changed", &self.is_changed())
            .finish()
    }
}

impl<T: 'static> Slot for StateCell<T> {
    fn is_changed(&self) -> bool {
        Self::is_changed(self)
    }

    fn settle(&self) {
        Self::settle(self);
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_writes_do_not_mark_changed() {
        let cell = Rc::new(StateCell::new(3));
        let setter = Setter::new(Rc::clone(&cell));
        setter.set(3);
        assert!(!cell.is_changed());
        setter.set(4);
        assert!(cell.is_changed());
        assert_eq!(cell.get(), 4);
    }

    #[test]
    fn reading_the_flag_does_not_reset_it() {
        let cell = StateCell::new("a".to_owned());
        cell.set("b".to_owned());
        assert!(cell.is_changed());
        assert!(cell.is_changed());
        cell.settle();
        assert!(!cell.is_changed());
    }

    #[test]
    fn update_reads_latest_value() {
        let cell = Rc::new(StateCell::new(0));
        let setter = Setter::new(Rc::clone(&cell));
        setter.update(|n| n + 1);
        setter.update(|n| n + 1);
        assert_eq!(setter.get(), 2);
    }

    #[test]
    fn erased_slot_downcasts_to_its_type() {
        let slot: Rc<dyn Slot> = Rc::new(StateCell::new(1_u8));
        assert!(Rc::clone(&slot).into_any().downcast::<StateCell<u8>>().is_ok());
        assert!(slot.into_any().downcast::<StateCell<i32>>().is_err());
    }
}
