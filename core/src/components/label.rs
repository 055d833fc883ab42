//! Static text.

use crate::{Context, Error, Handle, Node};

/// A leaf node displaying a string.
#[derive(Debug, Clone)]
pub struct Label {
    text: String,
    handle: Option<Handle>,
}

impl Label {
    /// Creates a label showing `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            handle: None,
        }
    }

    /// Returns the displayed text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Node for Label {
    fn render(&mut self, cx: &mut Context<'_>) -> Result<Handle, Error> {
        cx.release(&mut self.handle);
        let handle = cx.backend().create_text(&self.text)?;
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

crate::impl_into_node!(Label);

/// Creates a [`Label`].
pub fn label(text: impl Into<String>) -> Label {
    Label::new(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBackend;

    #[test]
    fn rerender_replaces_handle() {
        let mut backend = MemoryBackend::new();
        let mut cx = Context::new(&mut backend);
        let mut node = label("hello");
        let first = node.render(&mut cx).expect("render");
        let second = node.render(&mut cx).expect("render");
        assert_ne!(first, second);
        assert!(!backend.is_live(first));
        assert_eq!(backend.text_of(second), Some("hello"));
    }

    #[test]
    fn delete_releases_handle() {
        let mut backend = MemoryBackend::new();
        let mut node = label("bye");
        let mut cx = Context::new(&mut backend);
        node.render(&mut cx).expect("render");
        node.delete(&mut cx);
        assert_eq!(node.handle(), None);
        assert_eq!(backend.live(), 0);
    }
}
