//! The render context handed to component render functions.

use alloc::rc::Rc;
use core::any::type_name;

use crate::{
    error::StateOrderViolation,
    state::{Setter, Slot, StateCell},
};

/// Access to the state cells of the component currently rendering.
///
/// A `Hooks` value only exists for the duration of one render call. Cells are
/// identified by the order in which [`Hooks::use_state`] is called, so every
/// render of a component must call it the same number of times, in the same
/// order, with the same types.
#[derive(Debug)]
pub struct Hooks<'a> {
    slots: &'a mut Vec<Rc<dyn Slot>>,
    cursor: usize,
    initialized: bool,
    violation: Option<StateOrderViolation>,
}

impl<'a> Hooks<'a> {
    pub(crate) const fn new(slots: &'a mut Vec<Rc<dyn Slot>>, initialized: bool) -> Self {
        Self {
            slots,
            cursor: 0,
            initialized,
            violation: None,
        }
    }

    /// Returns the value of the next state cell and a setter for it.
    ///
    /// On the first render the cell is created with `default`. Later renders
    /// ignore `default` and read the cell at the same position.
    ///
    /// If the call order differs from the first render, the violation is
    /// recorded and reported by the component once the render function
    /// returns; the value handed back in that case is `default`, backed by a
    /// cell that is not stored anywhere.
    pub fn use_state<T>(&mut self, default: T) -> (T, Setter<T>)
    where
        T: Clone + PartialEq + 'static,
    {
        let index = self.cursor;
        self.cursor += 1;

        if !self.initialized {
            let cell = Rc::new(StateCell::new(default));
            self.slots.push(Rc::clone(&cell) as Rc<dyn Slot>);
            return (cell.get(), Setter::new(cell));
        }

        let cell = match self.slots.get(index) {
            Some(slot) => Rc::clone(slot).into_any().downcast::<StateCell<T>>().ok(),
            None => None,
        };
        if let Some(cell) = cell {
            return (cell.get(), Setter::new(cell));
        }

        let violation = if index < self.slots.len() {
            StateOrderViolation::TypeMismatch {
                index,
                requested: type_name::<T>(),
            }
        } else {
            StateOrderViolation::TooManyCalls {
                expected: self.slots.len(),
            }
        };
        self.violation.get_or_insert(violation);
        let detached = Rc::new(StateCell::new(default));
        (detached.get(), Setter::new(detached))
    }

    /// Consumes the context, reporting any ordering violation.
    pub(crate) fn finish(self) -> Result<(), StateOrderViolation> {
        if let Some(violation) = self.violation {
            return Err(violation);
        }
        if self.initialized && self.cursor < self.slots.len() {
            return Err(StateOrderViolation::TooFewCalls {
                expected: self.slots.len(),
                found: self.cursor,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_render_allocates_cells() {
        let mut slots = Vec::new();
        let mut hooks = Hooks::new(&mut slots, false);
        let (a, _) = hooks.use_state(1);
        let (b, _) = hooks.use_state("x");
        assert_eq!((a, b), (1, "x"));
        assert!(hooks.finish().is_ok());
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn later_renders_read_by_position() {
        let mut slots = Vec::new();
        let mut hooks = Hooks::new(&mut slots, false);
        let (_, set) = hooks.use_state(1);
        hooks.finish().expect("first render");
        set.set(5);

        let mut hooks = Hooks::new(&mut slots, true);
        let (value, _) = hooks.use_state(1);
        assert_eq!(value, 5);
        assert!(hooks.finish().is_ok());
    }

    #[test]
    fn extra_call_is_reported() {
        let mut slots = Vec::new();
        let mut hooks = Hooks::new(&mut slots, false);
        hooks.use_state(0);
        hooks.finish().expect("first render");

        let mut hooks = Hooks::new(&mut slots, true);
        hooks.use_state(0);
        let (value, _) = hooks.use_state(9);
        assert_eq!(value, 9);
        assert_eq!(
            hooks.finish(),
            Err(StateOrderViolation::TooManyCalls { expected: 1 })
        );
    }

    #[test]
    fn missing_call_is_reported() {
        let mut slots = Vec::new();
        let mut hooks = Hooks::new(&mut slots, false);
        hooks.use_state(0);
        hooks.use_state(0);
        hooks.finish().expect("first render");

        let mut hooks = Hooks::new(&mut slots, true);
        hooks.use_state(0);
        assert_eq!(
            hooks.finish(),
            Err(StateOrderViolation::TooFewCalls {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn swapped_types_are_reported() {
        let mut slots = Vec::new();
        let mut hooks = Hooks::new(&mut slots, false);
        hooks.use_state(0_i32);
        hooks.finish().expect("first render");

        let mut hooks = Hooks::new(&mut slots, true);
        hooks.use_state(false);
        assert!(matches!(
            hooks.finish(),
            Err(StateOrderViolation::TypeMismatch { index: 0, .. })
        ));
    }
}
