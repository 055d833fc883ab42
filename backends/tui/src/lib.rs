#![allow(clippy::multiple_crate_versions)]

//! Terminal backend for Eddy.
//!
//! [`TuiBackend`] keeps the primitive tree in memory and draws it as text.
//! Buttons are reached with the keyboard: Tab and the arrow keys move the
//! focus, Enter or Space clicks, `q` or Esc quits.

pub use crate::backend::{TuiBackend, TuiBackendBuilder};
pub use crate::renderer::{RenderFrame, RenderLine, RenderSegment, Renderer};
pub use crate::terminal::Terminal;

mod backend;
mod renderer;
mod terminal;
