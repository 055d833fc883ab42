//! Components: render functions with persistent state.
//!
//! A [`Component`] wraps a render function. Every render calls the function
//! again with a fresh [`Hooks`] context, replaces the previous child subtree
//! wholesale with the returned node, and clears the changed flag of every
//! state cell. Between renders, event handlers write to the cells through
//! [`Setter`](crate::Setter)s, which makes the component report itself dirty
//! to its parent.

use alloc::rc::Rc;
use core::fmt;

use crate::{
    AnyNode, Context, Error, Handle, Hooks, IntoNode, Node,
    state::Slot,
};

type RenderFn = Box<dyn FnMut(&mut Hooks<'_>) -> AnyNode>;

/// A node produced by a render function.
pub struct Component {
    name: &'static str,
    render_fn: RenderFn,
    state: Vec<Rc<dyn Slot>>,
    child: Option<AnyNode>,
    initialized: bool,
}

impl Component {
    /// Wraps `render`. `name` identifies the component in logs and errors.
    pub fn new<F, N>(name: &'static str, mut render: F) -> Self
    where
        F: FnMut(&mut Hooks<'_>) -> N + 'static,
        N: IntoNode,
    {
        Self {
            name,
            render_fn: Box::new(move |hooks| render(hooks).into_node()),
            state: Vec::new(),
            child: None,
            initialized: false,
        }
    }

    /// Returns the component name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the subtree produced by the last render.
    #[must_use]
    pub const fn child(&self) -> Option<&AnyNode> {
        self.child.as_ref()
    }

    /// Returns the number of state cells owned by this component.
    #[must_use]
    pub fn state_len(&self) -> usize {
        self.state.len()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("child", &self.child)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

impl Node for Component {
    fn render(&mut self, cx: &mut Context<'_>) -> Result<Handle, Error> {
        self.delete(cx);

        let mut hooks = Hooks::new(&mut self.state, self.initialized);
        let mut child = (self.render_fn)(&mut hooks);
        hooks.finish().map_err(|violation| {
            tracing::error!(component = self.name, %violation, "state call order changed");
            Error::StateOrder {
                component: self.name,
                violation,
            }
        })?;
        // Cells now exist whatever happens to the child below.
        self.initialized = true;

        tracing::debug!(component = self.name, "rendering component");
        let handle = child.render(cx);
        self.child = Some(child);
        let handle = handle?;

        for cell in &self.state {
            cell.settle();
        }
        Ok(handle)
    }

    fn is_dirty(&self) -> bool {
        self.state.iter().any(|cell| cell.is_changed())
            || self.child.as_ref().is_some_and(Node::is_dirty)
    }

    fn update(&mut self, cx: &mut Context<'_>) -> Result<(), Error> {
        match &mut self.child {
            Some(child) => child.update(cx),
            None => Ok(()),
        }
    }

    fn delete(&mut self, cx: &mut Context<'_>) {
        if let Some(mut child) = self.child.take() {
            child.delete(cx);
        }
    }

    fn handle(&self) -> Option<Handle> {
        self.child.as_ref().and_then(Node::handle)
    }
}

crate::impl_into_node!(Component);

/// Creates a [`Component`] from a render function taking props by reference.
///
/// ```ignore
/// fn greeting(hooks: &mut Hooks<'_>, name: &String) -> Label {
///     let (count, _) = hooks.use_state(0);
///     label(format!("Hello {name} #{count}"))
/// }
///
/// let node = component("Greeting", "Ada".to_owned(), greeting);
/// ```
pub fn component<P, N>(
    name: &'static str,
    props: P,
    render: fn(&mut Hooks<'_>, &P) -> N,
) -> Component
where
    P: 'static,
    N: IntoNode + 'static,
{
    Component::new(name, move |hooks| render(hooks, &props))
}
