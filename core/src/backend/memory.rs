//! A headless backend that keeps every primitive in memory.
//!
//! [`MemoryBackend`] never talks to a real toolkit. It assigns fresh ids to
//! every primitive, counts creations and destructions, and can replay a
//! script of clicks so a complete [`Window::mount`](crate::Window::mount)
//! runs without a display.

use alloc::collections::VecDeque;
use core::fmt::Write as _;
use std::collections::HashMap;

use super::{Action, Backend, BackendError, Direction, Event, Handle, HandleKind, SurfaceSize};

#[derive(Debug)]
enum Body {
    Surface {
        title: String,
        size: SurfaceSize,
        visible: bool,
        content: Option<Handle>,
    },
    Layout {
        direction: Direction,
        children: Vec<Handle>,
    },
    Text(String),
    Clickable {
        text: String,
        action: Action,
    },
}

#[derive(Debug)]
struct Primitive {
    parent: Option<Handle>,
    body: Body,
}

/// Counters describing the primitives a backend has seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Primitives created, surfaces excluded.
    pub created: usize,
    /// Primitives destroyed.
    pub destroyed: usize,
    /// Layout primitives created.
    pub layouts: usize,
    /// Text primitives created.
    pub texts: usize,
    /// Clickable primitives created.
    pub clickables: usize,
}

/// A scripted user interaction replayed by [`MemoryBackend::next_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted {
    /// Clicks the first live clickable (in tree order) with this text.
    Click(String),
    /// Clicks the n-th live clickable in tree order.
    ClickNth(usize),
    /// Ends the event loop.
    Quit,
}

/// In-memory implementation of [`Backend`].
#[derive(Debug, Default)]
pub struct MemoryBackend {
    next_id: u64,
    primitives: HashMap<u64, Primitive>,
    surface: Option<Handle>,
    stats: Stats,
    script: VecDeque<Scripted>,
    failures: usize,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that replays `script` from [`Backend::next_event`].
    #[must_use]
    pub fn with_script(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Queues one more scripted interaction.
    pub fn push_script(&mut self, step: Scripted) {
        self.script.push_back(step);
    }

    /// Makes the next `count` primitive creations fail.
    pub fn fail_next(&mut self, count: usize) {
        self.failures = count;
    }

    /// Returns the creation and destruction counters.
    #[must_use]
    pub const fn stats(&self) -> Stats {
        self.stats
    }

    /// Returns the number of live primitives, surfaces included.
    #[must_use]
    pub fn live(&self) -> usize {
        self.primitives.len()
    }

    /// Returns `true` if `handle` has been created and not destroyed.
    #[must_use]
    pub fn is_live(&self, handle: Handle) -> bool {
        self.primitives.contains_key(&handle.id())
    }

    /// Returns the surface created by [`Backend::create_surface`].
    #[must_use]
    pub const fn surface(&self) -> Option<Handle> {
        self.surface
    }

    /// Returns the content currently attached to `surface`.
    #[must_use]
    pub fn content_of(&self, surface: Handle) -> Option<Handle> {
        match self.primitives.get(&surface.id()).map(|p| &p.body) {
            Some(Body::Surface { content, .. }) => *content,
            _ => None,
        }
    }

    /// Returns `true` once the surface has been shown.
    #[must_use]
    pub fn is_visible(&self, surface: Handle) -> bool {
        matches!(
            self.primitives.get(&surface.id()).map(|p| &p.body),
            Some(Body::Surface { visible: true, .. })
        )
    }

    /// Returns the children attached to `layout`, in attachment order.
    #[must_use]
    pub fn children_of(&self, layout: Handle) -> &[Handle] {
        match self.primitives.get(&layout.id()).map(|p| &p.body) {
            Some(Body::Layout { children, .. }) => children.as_slice(),
            _ => &[],
        }
    }

    /// Returns the direction of a layout primitive.
    #[must_use]
    pub fn direction_of(&self, layout: Handle) -> Option<Direction> {
        match self.primitives.get(&layout.id()).map(|p| &p.body) {
            Some(Body::Layout { direction, .. }) => Some(*direction),
            _ => None,
        }
    }

    /// Returns the title of a surface.
    #[must_use]
    pub fn title_of(&self, surface: Handle) -> Option<&str> {
        match self.primitives.get(&surface.id()).map(|p| &p.body) {
            Some(Body::Surface { title, .. }) => Some(title.as_str()),
            _ => None,
        }
    }

    /// Returns the text of a text or clickable primitive.
    #[must_use]
    pub fn text_of(&self, handle: Handle) -> Option<&str> {
        match self.primitives.get(&handle.id()).map(|p| &p.body) {
            Some(Body::Text(text) | Body::Clickable { text, .. }) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Returns the action wired to a clickable primitive.
    #[must_use]
    pub fn action_of(&self, handle: Handle) -> Option<Action> {
        match self.primitives.get(&handle.id()).map(|p| &p.body) {
            Some(Body::Clickable { action, .. }) => Some(action.clone()),
            _ => None,
        }
    }

    /// Returns every widget reachable from the surface, in tree order.
    #[must_use]
    pub fn widgets(&self) -> Vec<Handle> {
        let mut out = Vec::new();
        if let Some(root) = self.surface.and_then(|s| self.content_of(s)) {
            self.collect_widgets(root, &mut out);
        }
        out
    }

    /// Returns every clickable reachable from the surface, in tree order.
    #[must_use]
    pub fn clickables(&self) -> Vec<Handle> {
        self.widgets()
            .into_iter()
            .filter(|h| self.action_of(*h).is_some())
            .collect()
    }

    /// Finds the first reachable clickable showing `text`.
    #[must_use]
    pub fn find_clickable(&self, text: &str) -> Option<Handle> {
        self.clickables()
            .into_iter()
            .find(|h| self.text_of(*h) == Some(text))
    }

    /// Finds the first reachable text primitive matching `predicate`.
    #[must_use]
    pub fn find_text(&self, predicate: impl Fn(&str) -> bool) -> Option<Handle> {
        self.widgets().into_iter().find(|h| {
            self.action_of(*h).is_none() && self.text_of(*h).is_some_and(&predicate)
        })
    }

    /// Renders the reachable tree as indented text.
    #[must_use]
    pub fn snapshot(&self) -> String {
        let mut out = String::new();
        if let Some(surface) = self.surface
            && let Some(Primitive {
                body: Body::Surface { title, size, content, .. },
                ..
            }) = self.primitives.get(&surface.id())
        {
            let _ = writeln!(out, "surface {title:?} {}x{}", size.width, size.height);
            if let Some(root) = content {
                self.write_node(*root, 1, &mut out);
            }
        }
        out
    }

    /// Renders the subtree rooted at `handle` as indented text.
    #[must_use]
    pub fn snapshot_of(&self, handle: Handle) -> String {
        let mut out = String::new();
        self.write_node(handle, 0, &mut out);
        out
    }

    fn collect_widgets(&self, handle: Handle, out: &mut Vec<Handle>) {
        match self.primitives.get(&handle.id()).map(|p| &p.body) {
            Some(Body::Layout { children, .. }) => {
                for child in children {
                    self.collect_widgets(*child, out);
                }
            }
            Some(Body::Text(_) | Body::Clickable { .. }) => out.push(handle),
            Some(Body::Surface { .. }) | None => {}
        }
    }

    fn write_node(&self, handle: Handle, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        match self.primitives.get(&handle.id()).map(|p| &p.body) {
            Some(Body::Layout { direction, children }) => {
                let _ = writeln!(out, "{indent}layout {direction:?}");
                for child in children {
                    self.write_node(*child, depth + 1, out);
                }
            }
            Some(Body::Text(text)) => {
                let _ = writeln!(out, "{indent}text {text:?}");
            }
            Some(Body::Clickable { text, .. }) => {
                let _ = writeln!(out, "{indent}button {text:?}");
            }
            Some(Body::Surface { .. }) | None => {}
        }
    }

    fn allocate(&mut self, kind: HandleKind, body: Body) -> Result<Handle, BackendError> {
        if self.failures > 0 {
            self.failures -= 1;
            let primitive = match kind {
                HandleKind::Surface => return Err(BackendError::SurfaceUnavailable),
                HandleKind::Layout => "layout",
                HandleKind::Widget => "widget",
            };
            return Err(BackendError::Creation {
                primitive,
                reason: "injected failure".to_owned(),
            });
        }

        self.next_id += 1;
        let handle = Handle::new(self.next_id, kind);
        match &body {
            Body::Surface { .. } => {}
            Body::Layout { .. } => {
                self.stats.created += 1;
                self.stats.layouts += 1;
            }
            Body::Text(_) => {
                self.stats.created += 1;
                self.stats.texts += 1;
            }
            Body::Clickable { .. } => {
                self.stats.created += 1;
                self.stats.clickables += 1;
            }
        }
        self.primitives
            .insert(handle.id(), Primitive { parent: None, body });
        tracing::trace!(%handle, "created primitive");
        Ok(handle)
    }

    fn resolve_script(&self, step: Scripted) -> Option<Event> {
        match step {
            Scripted::Click(text) => {
                let handle = self.find_clickable(&text);
                if handle.is_none() {
                    tracing::warn!(%text, "scripted click found no clickable");
                }
                handle.and_then(|h| self.action_of(h)).map(Event::Click)
            }
            Scripted::ClickNth(index) => {
                let handle = self.clickables().get(index).copied();
                if handle.is_none() {
                    tracing::warn!(index, "scripted click index out of range");
                }
                handle.and_then(|h| self.action_of(h)).map(Event::Click)
            }
            Scripted::Quit => Some(Event::Quit),
        }
    }
}

impl Backend for MemoryBackend {
    fn create_surface(&mut self, title: &str, size: SurfaceSize) -> Result<Handle, BackendError> {
        let handle = self.allocate(
            HandleKind::Surface,
            Body::Surface {
                title: title.to_owned(),
                size,
                visible: false,
                content: None,
            },
        )?;
        self.surface = Some(handle);
        Ok(handle)
    }

    fn show_surface(&mut self, surface: Handle) -> Result<(), BackendError> {
        match self.primitives.get_mut(&surface.id()).map(|p| &mut p.body) {
            Some(Body::Surface { visible, .. }) => {
                *visible = true;
                Ok(())
            }
            _ => Err(BackendError::UnknownHandle(surface)),
        }
    }

    fn set_content(&mut self, surface: Handle, content: Handle) -> Result<(), BackendError> {
        if !self.is_live(content) {
            return Err(BackendError::UnknownHandle(content));
        }
        match self.primitives.get_mut(&surface.id()).map(|p| &mut p.body) {
            Some(Body::Surface { content: slot, .. }) => *slot = Some(content),
            _ => return Err(BackendError::UnknownHandle(surface)),
        }
        if let Some(primitive) = self.primitives.get_mut(&content.id()) {
            primitive.parent = Some(surface);
        }
        Ok(())
    }

    fn create_layout(&mut self, direction: Direction) -> Result<Handle, BackendError> {
        self.allocate(
            HandleKind::Layout,
            Body::Layout {
                direction,
                children: Vec::new(),
            },
        )
    }

    fn attach_child(&mut self, layout: Handle, child: Handle) -> Result<(), BackendError> {
        if !self.is_live(child) {
            return Err(BackendError::UnknownHandle(child));
        }
        match self.primitives.get_mut(&layout.id()).map(|p| &mut p.body) {
            Some(Body::Layout { children, .. }) => children.push(child),
            _ => return Err(BackendError::UnknownHandle(layout)),
        }
        if let Some(primitive) = self.primitives.get_mut(&child.id()) {
            primitive.parent = Some(layout);
        }
        Ok(())
    }

    fn create_text(&mut self, text: &str) -> Result<Handle, BackendError> {
        self.allocate(HandleKind::Widget, Body::Text(text.to_owned()))
    }

    fn create_clickable(&mut self, text: &str, on_click: Action) -> Result<Handle, BackendError> {
        self.allocate(
            HandleKind::Widget,
            Body::Clickable {
                text: text.to_owned(),
                action: on_click,
            },
        )
    }

    fn destroy(&mut self, handle: Handle) {
        let Some(primitive) = self.primitives.remove(&handle.id()) else {
            tracing::warn!(%handle, "destroying unknown primitive");
            return;
        };
        if let Some(parent) = primitive.parent {
            match self.primitives.get_mut(&parent.id()).map(|p| &mut p.body) {
                Some(Body::Layout { children, .. }) => children.retain(|c| *c != handle),
                Some(Body::Surface { content, .. }) if *content == Some(handle) => {
                    *content = None;
                }
                _ => {}
            }
        }
        if let Body::Layout { children, .. } = &primitive.body {
            for child in children {
                if let Some(orphan) = self.primitives.get_mut(&child.id()) {
                    orphan.parent = None;
                }
            }
        }
        if self.surface == Some(handle) {
            self.surface = None;
        } else {
            self.stats.destroyed += 1;
        }
        tracing::trace!(%handle, "destroyed primitive");
    }

    fn next_event(&mut self) -> Result<Option<Event>, BackendError> {
        while let Some(step) = self.script.pop_front() {
            if let Some(event) = self.resolve_script(step) {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }
}
