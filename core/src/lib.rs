//! The reconciliation engine behind Eddy.
//!
//! A UI is a tree of [`Node`]s mounted into a [`Window`]. Leaves and
//! containers are plain data; [`Component`]s wrap render functions and keep
//! positional state cells through [`Hooks::use_state`]. When a click handler
//! writes to a cell, the window walks the tree and rebuilds the subtree under
//! the nearest container whose child reports itself dirty. Nothing outside
//! that subtree is touched.
//!
//! ```ignore
//! use eddy_core::{Component, MemoryBackend, Window, button, label, nodes, vstack};
//!
//! let counter = Component::new("Counter", |hooks| {
//!     let (count, set_count) = hooks.use_state(0);
//!     vstack(nodes![
//!         button("+1", move || set_count.set(count + 1)),
//!         label(count.to_string()),
//!     ])
//! });
//! Window::new(MemoryBackend::new()).mount(counter)?;
//! ```

extern crate alloc;

pub mod backend;
mod component;
pub mod components;
mod error;
mod hooks;
mod node;
mod state;
mod window;

pub use backend::{
    Action, Backend, BackendError, Direction, Event, Handle, HandleKind, MemoryBackend,
    SurfaceSize,
    memory::{Scripted, Stats},
};
pub use component::{Component, component};
pub use components::{Button, Container, Label, button, container, hstack, label, vstack};
pub use error::{Error, StateOrderViolation};
pub use hooks::Hooks;
pub use node::{AnyNode, Context, IntoNode, Node};
pub use state::{Setter, StateCell};
pub use window::Window;
