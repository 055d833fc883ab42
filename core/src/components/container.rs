//! Ordered composites of child nodes.
//!
//! A container is the unit of incremental rebuild. When any direct child
//! reports [`Node::is_dirty`], the container destroys every child and renders
//! them all again into its existing layout primitive. Clean children are
//! never diffed; the coarse rebuild keeps the model simple.

use crate::{AnyNode, Context, Direction, Error, Handle, IntoNode, Node};

/// A node arranging its children along a [`Direction`].
#[derive(Debug)]
pub struct Container {
    direction: Direction,
    children: Vec<AnyNode>,
    layout: Option<Handle>,
}

impl Container {
    /// Creates a container. The order of `children` is fixed from now on.
    pub fn new(direction: Direction, children: impl IntoIterator<Item = AnyNode>) -> Self {
        Self {
            direction,
            children: children.into_iter().collect(),
            layout: None,
        }
    }

    /// Returns the layout direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the children in order.
    #[must_use]
    pub fn children(&self) -> &[AnyNode] {
        &self.children
    }

    /// Destroys and re-renders every child into the current layout primitive.
    fn rebuild(&mut self, cx: &mut Context<'_>) -> Result<(), Error> {
        let Some(layout) = self.layout else {
            return Ok(());
        };
        for child in &mut self.children {
            child.delete(cx);
        }
        for child in &mut self.children {
            let handle = child.render(cx)?;
            cx.backend().attach_child(layout, handle)?;
        }
        Ok(())
    }
}

impl Node for Container {
    fn render(&mut self, cx: &mut Context<'_>) -> Result<Handle, Error> {
        self.delete(cx);
        let layout = cx.backend().create_layout(self.direction)?;
        self.layout = Some(layout);
        self.rebuild(cx)?;
        Ok(layout)
    }

    fn is_dirty(&self) -> bool {
        false
    }

    fn update(&mut self, cx: &mut Context<'_>) -> Result<(), Error> {
        if self.children.iter().any(Node::is_dirty) {
            tracing::debug!(
                direction = ?self.direction,
                children = self.children.len(),
                "rebuilding container"
            );
            return self.rebuild(cx);
        }
        for child in &mut self.children {
            child.update(cx)?;
        }
        Ok(())
    }

    fn delete(&mut self, cx: &mut Context<'_>) {
        for child in &mut self.children {
            child.delete(cx);
        }
        cx.release(&mut self.layout);
    }

    fn handle(&self) -> Option<Handle> {
        self.layout
    }
}

crate::impl_into_node!(Container);

/// Creates a [`Container`] from anything convertible into nodes.
pub fn container<I>(direction: Direction, children: I) -> Container
where
    I: IntoIterator,
    I::Item: IntoNode,
{
    Container::new(direction, children.into_iter().map(IntoNode::into_node))
}

/// Creates a top-to-bottom [`Container`].
pub fn vstack<I>(children: I) -> Container
where
    I: IntoIterator,
    I::Item: IntoNode,
{
    container(Direction::TopToBottom, children)
}

/// Creates a left-to-right [`Container`].
pub fn hstack<I>(children: I) -> Container
where
    I: IntoIterator,
    I::Item: IntoNode,
{
    container(Direction::LeftToRight, children)
}
