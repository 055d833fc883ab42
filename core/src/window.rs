//! The root controller.
//!
//! A [`Window`] owns the backend, the single native surface and the root
//! node. It performs the initial mount, runs the event loop, and is where
//! every click re-enters the engine:
//!
//! ```text
//! backend event ─▶ Window::dispatch ─▶ callback writes state cells
//!                                   └▶ Window::update ─▶ rebuild dirty subtree
//! ```

use core::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::{
    Action, AnyNode, Backend, Context, Error, Event, Handle, IntoNode, Node, SurfaceSize,
};

/// Owner of the backend surface and the root of the node tree.
#[derive(Debug)]
pub struct Window<B> {
    backend: B,
    title: String,
    size: SurfaceSize,
    surface: Option<Handle>,
    root: Option<AnyNode>,
}

impl<B: Backend> Window<B> {
    /// Creates a window that will draw through `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            title: "Eddy".to_owned(),
            size: SurfaceSize::default(),
            surface: None,
            root: None,
        }
    }

    /// Sets the surface title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the surface size.
    #[must_use]
    pub const fn size(mut self, size: SurfaceSize) -> Self {
        self.size = size;
        self
    }

    /// Mounts `root` and runs the event loop until the backend ends it.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial mount fails or an update cycle is
    /// aborted.
    pub fn mount(&mut self, root: impl IntoNode) -> Result<(), Error> {
        self.attach(root)?;
        self.run()
    }

    /// Creates the surface, renders `root` into it and shows it.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface or any primitive cannot be created.
    pub fn attach(&mut self, root: impl IntoNode) -> Result<(), Error> {
        if let Some(mut old) = self.root.take() {
            old.delete(&mut Context::new(&mut self.backend));
        }
        let surface = match self.surface {
            Some(surface) => surface,
            None => {
                let surface = self.backend.create_surface(&self.title, self.size)?;
                self.surface = Some(surface);
                surface
            }
        };
        self.root = Some(root.into_node());
        tracing::debug!(title = %self.title, %surface, "mounting root node");
        self.refresh()?;
        self.backend.show_surface(surface)?;
        Ok(())
    }

    /// Pulls events from the backend until it reports the end of the loop.
    ///
    /// # Errors
    ///
    /// Stops at the first failed update cycle and returns its error.
    pub fn run(&mut self) -> Result<(), Error> {
        while let Some(event) = self.backend.next_event()? {
            if matches!(event, Event::Quit) {
                tracing::debug!("event loop quit");
                break;
            }
            self.dispatch(event)?;
        }
        Ok(())
    }

    /// Handles one backend event.
    ///
    /// # Errors
    ///
    /// See [`Window::click`].
    pub fn dispatch(&mut self, event: Event) -> Result<(), Error> {
        match event {
            Event::Click(action) => self.click(&action),
            Event::Quit => Ok(()),
        }
    }

    /// Runs a click callback, then the global update.
    ///
    /// A panicking callback abandons the cycle before any handle is touched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Callback`] if the callback panics, or any error from
    /// [`Window::update`].
    pub fn click(&mut self, action: &Action) -> Result<(), Error> {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| action.call())) {
            let message = panic_message(payload.as_ref());
            tracing::error!(%message, "click handler panicked, update abandoned");
            return Err(Error::Callback { message });
        }
        self.update()
    }

    /// Brings the tree in sync with its state.
    ///
    /// A dirty root is rendered again and replaces the surface content.
    /// Otherwise the root locates and rebuilds its dirty subtrees in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotMounted`] before [`Window::attach`], or any error
    /// raised while rendering.
    pub fn update(&mut self) -> Result<(), Error> {
        let root = self.root.as_mut().ok_or(Error::NotMounted)?;
        if root.is_dirty() {
            return self.refresh();
        }
        root.update(&mut Context::new(&mut self.backend))
    }

    /// Renders the root node again and attaches it to the surface.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotMounted`] before [`Window::attach`], or any error
    /// raised while rendering.
    pub fn refresh(&mut self) -> Result<(), Error> {
        let (Some(root), Some(surface)) = (self.root.as_mut(), self.surface) else {
            return Err(Error::NotMounted);
        };
        tracing::debug!("refreshing root node");
        let handle = root.render(&mut Context::new(&mut self.backend))?;
        self.backend.set_content(surface, handle)?;
        Ok(())
    }

    /// Tears down the tree and the surface.
    pub fn close(&mut self) {
        if let Some(mut root) = self.root.take() {
            root.delete(&mut Context::new(&mut self.backend));
        }
        if let Some(surface) = self.surface.take() {
            self.backend.destroy(surface);
        }
    }

    /// Returns the root node, once mounted.
    #[must_use]
    pub fn root(&self) -> Option<&AnyNode> {
        self.root.as_ref()
    }

    /// Returns the surface handle, once created.
    #[must_use]
    pub const fn surface(&self) -> Option<Handle> {
        self.surface
    }

    /// Borrows the backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutably borrows the backend.
    pub const fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Closes the window and returns its backend.
    pub fn into_backend(mut self) -> B {
        self.close();
        self.backend
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryBackend, Scripted, button, label, nodes, vstack};

    #[test]
    fn attach_shows_surface_with_content() {
        let mut window = Window::new(MemoryBackend::new()).title("t");
        window.attach(label("hi")).expect("attach");
        let surface = window.surface().expect("surface");
        let backend = window.backend();
        assert!(backend.is_visible(surface));
        let content = backend.content_of(surface).expect("content");
        assert_eq!(backend.text_of(content), Some("hi"));
    }

    #[test]
    fn update_before_mount_fails() {
        let mut window = Window::new(MemoryBackend::new());
        assert!(matches!(window.update(), Err(Error::NotMounted)));
    }

    #[test]
    fn surface_failure_is_fatal() {
        let mut backend = MemoryBackend::new();
        backend.fail_next(1);
        let mut window = Window::new(backend);
        let err = window.attach(label("x")).expect_err("no surface");
        assert!(matches!(err, Error::Backend(_)));
    }

    #[test]
    fn mount_returns_when_script_ends() {
        let backend = MemoryBackend::with_script([Scripted::Click("go".to_owned())]);
        let mut window = Window::new(backend);
        window
            .mount(vstack(nodes![button("go", || {})]))
            .expect("mount");
        assert_eq!(window.backend().stats().layouts, 1);
    }

    #[test]
    fn panicking_callback_leaves_tree_untouched() {
        let mut window = Window::new(MemoryBackend::new());
        window
            .attach(vstack(nodes![button("boom", || panic!("kaboom"))]))
            .expect("attach");
        let before = window.backend().stats();
        let handle = window.backend().find_clickable("boom").expect("button");
        let action = window.backend().action_of(handle).expect("action");

        let err = window.click(&action).expect_err("panic surfaces");
        assert!(matches!(err, Error::Callback { ref message } if message == "kaboom"));
        assert_eq!(window.backend().stats(), before);
        assert!(window.backend().is_live(handle));
    }

    #[test]
    fn close_releases_everything() {
        let mut window = Window::new(MemoryBackend::new());
        window.attach(vstack(nodes![label("a"), label("b")])).expect("attach");
        let backend = window.into_backend();
        assert_eq!(backend.live(), 0);
        assert_eq!(backend.surface(), None);
    }
}
