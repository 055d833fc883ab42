//! The capability set shared by every element of a UI tree.
//!
//! A tree is made of three kinds of nodes:
//!
//! - leaves ([`Label`](crate::Label), [`Button`](crate::Button)) that create a
//!   single widget primitive,
//! - [`Container`](crate::Container)s that own an ordered list of children and
//!   a layout primitive,
//! - [`Component`](crate::Component)s that wrap a render function and own
//!   state cells.
//!
//! Every node owns at most one backend handle, created by its last
//! [`Node::render`] and released before a new one is created.

use core::fmt::Debug;

use crate::{
    Error,
    backend::{Backend, Handle},
};

/// Borrowed environment passed down through `render`, `update` and `delete`.
///
/// The context is never stored by a node; it is only valid for one call.
pub struct Context<'a> {
    backend: &'a mut dyn Backend,
}

impl<'a> Context<'a> {
    /// Creates a context over `backend`.
    pub fn new(backend: &'a mut dyn Backend) -> Self {
        Self { backend }
    }

    /// Returns the backend primitives are created on.
    pub fn backend(&mut self) -> &mut dyn Backend {
        self.backend
    }

    /// Destroys `handle` if present, leaving `None` behind.
    pub fn release(&mut self, handle: &mut Option<Handle>) {
        if let Some(handle) = handle.take() {
            self.backend.destroy(handle);
        }
    }
}

impl Debug for Context<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Context(..)")
    }
}

/// A renderable element of the UI tree.
pub trait Node: Debug {
    /// Releases the previous output, then creates and returns a fresh handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or a component breaks its state
    /// call order.
    fn render(&mut self, cx: &mut Context<'_>) -> Result<Handle, Error>;

    /// Returns `true` if this node must be rebuilt by its parent.
    ///
    /// Must be free of side effects: parents call it on every update.
    fn is_dirty(&self) -> bool;

    /// Rebuilds whatever part of this subtree is dirty, in place.
    ///
    /// # Errors
    ///
    /// Propagates errors from any render performed during the update.
    fn update(&mut self, cx: &mut Context<'_>) -> Result<(), Error>;

    /// Releases every backend resource held by this subtree.
    fn delete(&mut self, cx: &mut Context<'_>);

    /// Returns the handle produced by the last render, if still live.
    fn handle(&self) -> Option<Handle>;
}

/// A type-erased, owned [`Node`].
#[derive(Debug)]
pub struct AnyNode(Box<dyn Node>);

impl AnyNode {
    /// Boxes `node`.
    pub fn new(node: impl Node + 'static) -> Self {
        Self(Box::new(node))
    }

    /// Borrows the inner node.
    #[must_use]
    pub fn as_node(&self) -> &dyn Node {
        self.0.as_ref()
    }

    /// Mutably borrows the inner node.
    pub fn as_node_mut(&mut self) -> &mut dyn Node {
        self.0.as_mut()
    }
}

impl Node for AnyNode {
    fn render(&mut self, cx: &mut Context<'_>) -> Result<Handle, Error> {
        self.0.render(cx)
    }

    fn is_dirty(&self) -> bool {
        self.0.is_dirty()
    }

    fn update(&mut self, cx: &mut Context<'_>) -> Result<(), Error> {
        self.0.update(cx)
    }

    fn delete(&mut self, cx: &mut Context<'_>) {
        self.0.delete(cx);
    }

    fn handle(&self) -> Option<Handle> {
        self.0.handle()
    }
}

/// Conversion into an [`AnyNode`].
pub trait IntoNode {
    /// Performs the conversion.
    fn into_node(self) -> AnyNode;
}

impl IntoNode for AnyNode {
    fn into_node(self) -> AnyNode {
        self
    }
}

/// Implements [`IntoNode`] for concrete node types.
#[macro_export]
macro_rules! impl_into_node {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::IntoNode for $ty {
                fn into_node(self) -> $crate::AnyNode {
                    $crate::AnyNode::new(self)
                }
            }
        )*
    };
}

/// Builds a `Vec<AnyNode>` from heterogeneous nodes.
///
/// ```ignore
/// vstack(nodes![label("Count"), button("+", increment)])
/// ```
#[macro_export]
macro_rules! nodes {
    () => {
        ::std::vec::Vec::<$crate::AnyNode>::new()
    };
    ($($node:expr),+ $(,)?) => {
        ::std::vec![$($crate::IntoNode::into_node($node)),+]
    };
}
