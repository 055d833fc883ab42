//! The capability surface the engine consumes from a graphical backend.
//!
//! A backend owns every native resource. The engine only ever sees opaque
//! [`Handle`]s, creates primitives through the [`Backend`] trait and hands
//! them back through [`Backend::destroy`] before creating replacements.
//!
//! Two implementations ship with the framework:
//!
//! - [`MemoryBackend`] keeps primitives in memory and records every creation
//!   and destruction. Tests use it to verify handle identity.
//! - `eddy-tui` draws the primitive tree into a terminal.

pub mod memory;

use alloc::rc::Rc;
use core::fmt;

pub use memory::MemoryBackend;

/// The kind of primitive a [`Handle`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// A top-level native surface (a window).
    Surface,
    /// A layout primitive that arranges children.
    Layout,
    /// A leaf widget: text or clickable.
    Widget,
}

/// Identity of a native primitive created by a [`Backend`].
///
/// Handles are never reused by a backend, so two handles compare equal only
/// if they refer to the same native resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    id: u64,
    kind: HandleKind,
}

impl Handle {
    /// Creates a handle from a backend-assigned id.
    #[must_use]
    pub const fn new(id: u64, kind: HandleKind) -> Self {
        Self { id, kind }
    }

    /// Returns the raw id assigned by the backend.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.id
    }

    /// Returns the kind of primitive.
    #[must_use]
    pub const fn kind(self) -> HandleKind {
        self.kind
    }

    /// Returns `true` if this handle refers to a layout primitive.
    #[must_use]
    pub const fn is_layout(self) -> bool {
        matches!(self.kind, HandleKind::Layout)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            HandleKind::Surface => "surface",
            HandleKind::Layout => "layout",
            HandleKind::Widget => "widget",
        };
        write!(f, "{kind}#{}", self.id)
    }
}

/// Arrangement of children inside a layout primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Children placed horizontally, first child leftmost.
    LeftToRight,
    /// Children placed horizontally, first child rightmost.
    RightToLeft,
    /// Children placed vertically, first child on top.
    #[default]
    TopToBottom,
    /// Children placed vertically, first child at the bottom.
    BottomToTop,
}

impl Direction {
    /// Returns `true` for the two horizontal directions.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftToRight | Self::RightToLeft)
    }

    /// Returns `true` when children are laid out in reverse order.
    #[must_use]
    pub const fn is_reversed(self) -> bool {
        matches!(self, Self::RightToLeft | Self::BottomToTop)
    }
}

/// Requested size of a surface, in backend units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    /// Width of the surface.
    pub width: u32,
    /// Height of the surface.
    pub height: u32,
}

impl SurfaceSize {
    /// Creates a new surface size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// A click callback attached to a clickable primitive.
///
/// Actions are cheap to clone; the backend keeps one copy alongside the
/// primitive and hands it back through [`Event::Click`] when the user
/// activates it.
#[derive(Clone)]
pub struct Action(Rc<dyn Fn()>);

impl Action {
    /// Wraps a closure into an action.
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invokes the callback.
    pub fn call(&self) {
        (self.0)();
    }

    /// Returns `true` if both actions share the same callback.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

/// Events reported by [`Backend::next_event`].
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Event {
    /// The user activated a clickable primitive.
    Click(Action),
    /// The user asked to close the application.
    Quit,
}

/// Errors raised by a backend.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BackendError {
    /// No native surface could be created or none is available.
    #[error("backend surface is unavailable")]
    SurfaceUnavailable,
    /// A primitive could not be created.
    #[error("failed to create {primitive} primitive: {reason}")]
    Creation {
        /// The kind of primitive that was requested.
        primitive: &'static str,
        /// Backend-specific explanation.
        reason: String,
    },
    /// The handle does not refer to a live primitive of this backend.
    #[error("unknown handle {0}")]
    UnknownHandle(Handle),
    /// Low level I/O failure.
    #[error("backend I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Native primitive provider driven by the engine.
///
/// Every method is called synchronously from the main thread. The engine
/// guarantees that each handle is destroyed exactly once and never used
/// after destruction.
pub trait Backend {
    /// Creates the top-level surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the native surface cannot be created.
    fn create_surface(&mut self, title: &str, size: SurfaceSize) -> Result<Handle, BackendError>;

    /// Makes the surface visible.
    ///
    /// # Errors
    ///
    /// Returns an error if `surface` is not a live surface.
    fn show_surface(&mut self, surface: Handle) -> Result<(), BackendError>;

    /// Replaces the content displayed by `surface` with `content`.
    ///
    /// # Errors
    ///
    /// Returns an error if either handle is unknown.
    fn set_content(&mut self, surface: Handle, content: Handle) -> Result<(), BackendError>;

    /// Creates an empty layout primitive.
    ///
    /// # Errors
    ///
    /// Returns an error if the primitive cannot be created.
    fn create_layout(&mut self, direction: Direction) -> Result<Handle, BackendError>;

    /// Appends `child` to the children of `layout`.
    ///
    /// # Errors
    ///
    /// Returns an error if either handle is unknown or `layout` is not a layout.
    fn attach_child(&mut self, layout: Handle, child: Handle) -> Result<(), BackendError>;

    /// Creates a text primitive.
    ///
    /// # Errors
    ///
    /// Returns an error if the primitive cannot be created.
    fn create_text(&mut self, text: &str) -> Result<Handle, BackendError>;

    /// Creates a clickable primitive that reports `on_click` when activated.
    ///
    /// # Errors
    ///
    /// Returns an error if the primitive cannot be created.
    fn create_clickable(&mut self, text: &str, on_click: Action) -> Result<Handle, BackendError>;

    /// Releases a primitive, detaching it from its parent first.
    fn destroy(&mut self, handle: Handle);

    /// Blocks until the next user event. `None` ends the event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the native event source fails.
    fn next_event(&mut self) -> Result<Option<Event>, BackendError>;
}
