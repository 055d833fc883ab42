use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use eddy_core::{
    Action, Backend, BackendError, Direction, Event, Handle, MemoryBackend, SurfaceSize,
};

use crate::{renderer::Renderer, terminal::Terminal};

/// A [`Backend`] that draws into a terminal.
///
/// Primitives live in an in-memory store; the terminal is redrawn lazily,
/// right before waiting for the next key, whenever the tree changed.
#[derive(Debug)]
pub struct TuiBackend {
    store: MemoryBackend,
    terminal: Terminal,
    renderer: Renderer,
    focus: usize,
    stale: bool,
}

impl TuiBackend {
    /// Creates a backend drawing to `stdout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialised.
    pub fn stdout() -> Result<Self, BackendError> {
        TuiBackendBuilder::new().build()
    }

    /// Creates a backend drawing into memory and replaying `keys`.
    #[must_use]
    pub fn buffered(keys: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self::with_terminal(Terminal::buffered(keys))
    }

    fn with_terminal(terminal: Terminal) -> Self {
        Self {
            store: MemoryBackend::new(),
            terminal,
            renderer: Renderer::new(),
            focus: 0,
            stale: true,
        }
    }

    /// Provides immutable access to the primitive store.
    #[must_use]
    pub const fn store(&self) -> &MemoryBackend {
        &self.store
    }

    /// Provides immutable access to the terminal handle.
    #[must_use]
    pub const fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    /// Returns the last frame drawn by a buffered backend.
    #[must_use]
    pub fn snapshot(&self) -> Option<&str> {
        self.terminal.snapshot()
    }

    /// Returns the focused clickable, if any.
    #[must_use]
    pub fn focused(&self) -> Option<Handle> {
        let clickables = self.store.clickables();
        if clickables.is_empty() {
            return None;
        }
        clickables.get(self.focus.min(clickables.len() - 1)).copied()
    }

    fn draw(&mut self) -> Result<(), BackendError> {
        let frame = self.renderer.render(&self.store, self.focused());
        self.terminal.render(&frame)?;
        tracing::trace!(lines = frame.lines().len(), "frame drawn");
        self.stale = false;
        Ok(())
    }

    fn move_focus(&mut self, forward: bool) {
        let count = self.store.clickables().len();
        if count == 0 {
            return;
        }
        let current = self.focus.min(count - 1);
        self.focus = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
        self.stale = true;
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Event> {
        tracing::trace!(?key, "key pressed");
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Event::Quit)
            }
            KeyCode::Char('q') | KeyCode::Esc => Some(Event::Quit),
            KeyCode::Tab | KeyCode::Right | KeyCode::Down => {
                self.move_focus(true);
                None
            }
            KeyCode::BackTab | KeyCode::Left | KeyCode::Up => {
                self.move_focus(false);
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let focused = self.focused()?;
                self.store.action_of(focused).map(Event::Click)
            }
            _ => None,
        }
    }

    fn touch<T>(&mut self, result: T) -> T {
        self.stale = true;
        result
    }
}

impl Backend for TuiBackend {
    fn create_surface(&mut self, title: &str, size: SurfaceSize) -> Result<Handle, BackendError> {
        let result = self.store.create_surface(title, size);
        self.touch(result)
    }

    fn show_surface(&mut self, surface: Handle) -> Result<(), BackendError> {
        let result = self.store.show_surface(surface);
        self.touch(result)
    }

    fn set_content(&mut self, surface: Handle, content: Handle) -> Result<(), BackendError> {
        let result = self.store.set_content(surface, content);
        self.touch(result)
    }

    fn create_layout(&mut self, direction: Direction) -> Result<Handle, BackendError> {
        self.store.create_layout(direction)
    }

    fn attach_child(&mut self, layout: Handle, child: Handle) -> Result<(), BackendError> {
        let result = self.store.attach_child(layout, child);
        self.touch(result)
    }

    fn create_text(&mut self, text: &str) -> Result<Handle, BackendError> {
        self.store.create_text(text)
    }

    fn create_clickable(&mut self, text: &str, on_click: Action) -> Result<Handle, BackendError> {
        self.store.create_clickable(text, on_click)
    }

    fn destroy(&mut self, handle: Handle) {
        self.store.destroy(handle);
        self.stale = true;
    }

    fn next_event(&mut self) -> Result<Option<Event>, BackendError> {
        loop {
            if self.stale {
                self.draw()?;
            }
            let Some(key) = self.terminal.read_key()? else {
                return Ok(None);
            };
            if let Some(event) = self.handle_key(key) {
                return Ok(Some(event));
            }
        }
    }
}

/// Builder for [`TuiBackend`] instances.
#[derive(Debug, Default)]
pub struct TuiBackendBuilder {
    terminal: Option<Terminal>,
}

impl TuiBackendBuilder {
    /// Creates a new builder with default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self { terminal: None }
    }

    /// Overrides the terminal handle used by the backend.
    #[must_use]
    pub fn with_terminal(mut self, terminal: Terminal) -> Self {
        self.terminal = Some(terminal);
        self
    }

    /// Consumes the builder and produces a [`TuiBackend`].
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialised.
    pub fn build(self) -> Result<TuiBackend, BackendError> {
        let terminal = match self.terminal {
            Some(terminal) => terminal,
            None => Terminal::stdout()?,
        };
        Ok(TuiBackend::with_terminal(terminal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eddy_core::{Component, Window, button, label, nodes, vstack};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn counter() -> Component {
        Component::new("Counter", |hooks| {
            let (count, set_count) = hooks.use_state(0);
            let decrement = set_count.clone();
            vstack(nodes![
                button("-", move || decrement.set(count - 1)),
                button("+", move || set_count.set(count + 1)),
                label(format!("count: {count}")),
            ])
        })
    }

    #[test]
    fn keyboard_drives_the_window() {
        let backend = TuiBackend::buffered([
            key(KeyCode::Tab),
            key(KeyCode::Enter),
            key(KeyCode::Enter),
            key(KeyCode::Char('q')),
        ]);
        let mut window = Window::new(backend).title("Counter");
        window.mount(counter()).expect("mount");

        let snapshot = window.backend().snapshot().expect("buffered");
        assert!(snapshot.contains("count: 2"), "{snapshot}");
        assert!(snapshot.starts_with("Counter"));
    }

    #[test]
    fn focus_wraps_around() {
        let backend = TuiBackend::buffered([
            key(KeyCode::Up),
            key(KeyCode::Enter),
            key(KeyCode::Esc),
        ]);
        let mut window = Window::new(backend);
        window.mount(counter()).expect("mount");

        let snapshot = window.backend().snapshot().expect("buffered");
        assert!(snapshot.contains("count: 1"), "{snapshot}");
    }

    #[test]
    fn exhausted_input_ends_the_loop() {
        let mut window = Window::new(TuiBackend::buffered([]));
        window.mount(label("idle")).expect("mount");
        let snapshot = window.backend().snapshot().expect("buffered");
        assert!(snapshot.ends_with("idle"));
        assert_eq!(window.backend().focused(), None);
    }
}
