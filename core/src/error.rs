//! Errors surfaced by the reconciliation engine.

pub use crate::backend::BackendError;

/// A component used [`Hooks::use_state`](crate::Hooks::use_state) differently
/// from its previous renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StateOrderViolation {
    /// The render function asked for more cells than it created on first render.
    #[error("use_state called more than {expected} times")]
    TooManyCalls {
        /// Cells created on the first render.
        expected: usize,
    },
    /// The render function left cells unread.
    #[error("use_state called {found} times, expected {expected}")]
    TooFewCalls {
        /// Cells created on the first render.
        expected: usize,
        /// Cells read during this render.
        found: usize,
    },
    /// The cell at `index` holds a value of another type.
    #[error("state cell {index} does not hold a `{requested}`")]
    TypeMismatch {
        /// Position of the offending cell.
        index: usize,
        /// Type the render function asked for.
        requested: &'static str,
    },
}

/// Errors that abort an update cycle.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A component broke the stable call order of its state cells.
    #[error("component `{component}` broke its state call order: {violation}")]
    StateOrder {
        /// Name of the offending component.
        component: &'static str,
        /// What went wrong.
        violation: StateOrderViolation,
    },
    /// The backend could not create or manage a primitive.
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// A click callback panicked.
    #[error("click handler panicked: {message}")]
    Callback {
        /// The panic payload, when it was a string.
        message: String,
    },
    /// An update was requested before anything was mounted.
    #[error("no root node has been mounted")]
    NotMounted,
}
