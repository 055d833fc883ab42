//! Clickable leaf nodes.

use crate::{Action, Context, Error, Handle, Node};

/// A leaf node that runs a callback when clicked.
///
/// The callback runs inside the window's dispatch step; once it returns, the
/// window runs an update pass over the whole tree. That pass is the only way
/// state changes reach the screen.
#[derive(Debug, Clone)]
pub struct Button {
    text: String,
    on_click: Action,
    handle: Option<Handle>,
}

impl Button {
    /// Creates a button labelled `text`.
    pub fn new(text: impl Into<String>, on_click: impl Fn() + 'static) -> Self {
        Self {
            text: text.into(),
            on_click: Action::new(on_click),
            handle: None,
        }
    }

    /// Returns the button label.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the click action.
    #[must_use]
    pub const fn action(&self) -> &Action {
        &self.on_click
    }
}

impl Node for Button {
    fn render(&mut self, cx: &mut Context<'_>) -> Result<Handle, Error> {
        cx.release(&mut self.handle);
        let handle = cx
            .backend()
            .create_clickable(&self.text, self.on_click.clone())?;
        self.handle = Some(handle);
        Ok(handle)
    }

    fn is_dirty(&self) -> bool {
        false
    }

    fn update(&mut self, _cx: &mut Context<'_>) -> Result<(), Error> {
        Ok(())
    }

    fn delete(&mut self, cx: &mut Context<'_>) {
        cx.release(&mut self.handle);
    }

    fn handle(&self) -> Option<Handle> {
        self.handle
    }
}

crate::impl_into_node!(Button);

/// Creates a [`Button`].
pub fn button(text: impl Into<String>, on_click: impl Fn() + 'static) -> Button {
    Button::new(text, on_click)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBackend;
    use std::{cell::Cell, rc::Rc};

    #[test]
    fn backend_receives_the_callback() {
        let clicks = Rc::new(Cell::new(0));
        let mut node = button("ok", {
            let clicks = Rc::clone(&clicks);
            move || clicks.set(clicks.get() + 1)
        });
        let mut backend = MemoryBackend::new();
        let handle = node.render(&mut Context::new(&mut backend)).expect("render");

        let action = backend.action_of(handle).expect("clickable");
        assert!(action.ptr_eq(node.action()));
        action.call();
        assert_eq!(clicks.get(), 1);
        assert!(!node.is_dirty());
    }
}
