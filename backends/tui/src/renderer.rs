use crossterm::style::{Attribute, Attributes, ContentStyle, StyledContent};
use eddy_core::{Handle, MemoryBackend};
use unicode_width::UnicodeWidthStr;

/// Columns between children of a horizontal layout.
const COLUMN_GAP: usize = 1;

/// Represents a fully resolved frame ready to be drawn to the terminal.
#[derive(Debug, Default, Clone)]
pub struct RenderFrame {
    lines: Vec<RenderLine>,
}

impl RenderFrame {
    /// Appends a line.
    pub fn push(&mut self, line: RenderLine) {
        self.lines.push(line);
    }

    /// Returns the set of lines recorded in this frame.
    #[must_use]
    pub fn lines(&self) -> &[RenderLine] {
        &self.lines
    }

    /// Returns the frame as plain text, one line per row.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        self.lines
            .iter()
            .map(RenderLine::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Representation of a single line in the terminal output.
#[derive(Debug, Default, Clone)]
pub struct RenderLine {
    segments: Vec<RenderSegment>,
}

impl RenderLine {
    /// Pushes a new segment onto the line.
    pub fn push(&mut self, segment: RenderSegment) {
        self.segments.push(segment);
    }

    /// Returns the list of segments contained in this line.
    #[must_use]
    pub fn segments(&self) -> &[RenderSegment] {
        &self.segments
    }

    /// Display width in terminal columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.segments.iter().map(|s| s.content.width()).sum()
    }

    fn plain_text(&self) -> String {
        self.segments.iter().map(RenderSegment::content).collect()
    }

    fn pad_to(&mut self, width: usize) {
        let current = self.width();
        if current < width {
            self.push(RenderSegment::plain(" ".repeat(width - current)));
        }
    }

    fn append(&mut self, other: Self) {
        self.segments.extend(other.segments);
    }
}

/// Atomic piece of content rendered on a line.
#[derive(Debug, Clone)]
pub struct RenderSegment {
    content: String,
    style: ContentStyle,
}

impl RenderSegment {
    /// Creates a plain (unstyled) segment.
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: ContentStyle::new(),
        }
    }

    /// Creates a segment with custom styling.
    pub fn styled(content: impl Into<String>, style: ContentStyle) -> Self {
        Self {
            content: content.into(),
            style,
        }
    }

    /// Borrows the raw text stored in this segment.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Converts this segment into a [`StyledContent`] for printing through crossterm.
    #[must_use]
    pub fn as_styled_content(&self) -> StyledContent<String> {
        self.style.apply(self.content.clone())
    }
}

/// A rectangular run of lines produced for one primitive.
#[derive(Debug, Default)]
struct Block {
    lines: Vec<RenderLine>,
}

impl Block {
    fn line(line: RenderLine) -> Self {
        Self { lines: vec![line] }
    }

    fn width(&self) -> usize {
        self.lines.iter().map(RenderLine::width).max().unwrap_or(0)
    }

    fn stack(blocks: Vec<Self>) -> Self {
        Self {
            lines: blocks.into_iter().flat_map(|b| b.lines).collect(),
        }
    }

    fn beside(blocks: Vec<Self>) -> Self {
        let height = blocks.iter().map(|b| b.lines.len()).max().unwrap_or(0);
        let mut lines = vec![RenderLine::default(); height];
        let last = blocks.len().saturating_sub(1);
        for (index, block) in blocks.into_iter().enumerate() {
            let width = block.width() + if index == last { 0 } else { COLUMN_GAP };
            let mut rows = block.lines.into_iter();
            for line in &mut lines {
                let mut cell = rows.next().unwrap_or_default();
                cell.pad_to(width);
                line.append(cell);
            }
        }
        Self { lines }
    }
}

/// Walks the primitive tree and produces terminal friendly frames.
#[derive(Debug, Default)]
pub struct Renderer;

impl Renderer {
    /// Creates a new renderer instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Renders the content of the surface held by `store`.
    ///
    /// `focus` is highlighted when it refers to a clickable primitive.
    #[must_use]
    pub fn render(&self, store: &MemoryBackend, focus: Option<Handle>) -> RenderFrame {
        let mut frame = RenderFrame::default();
        let Some(surface) = store.surface() else {
            return frame;
        };
        if let Some(title) = store.title_of(surface) {
            let mut style = ContentStyle::new();
            style.attributes = Attributes::from(Attribute::Bold);
            let mut line = RenderLine::default();
            line.push(RenderSegment::styled(title, style));
            frame.push(line);
            frame.push(RenderLine::default());
        }
        if let Some(content) = store.content_of(surface) {
            frame.lines.extend(Self::block(store, content, focus).lines);
        }
        frame
    }

    fn block(store: &MemoryBackend, handle: Handle, focus: Option<Handle>) -> Block {
        if let Some(direction) = store.direction_of(handle) {
            let mut children: Vec<Block> = store
                .children_of(handle)
                .iter()
                .map(|child| Self::block(store, *child, focus))
                .collect();
            if direction.is_reversed() {
                children.reverse();
            }
            return if direction.is_horizontal() {
                Block::beside(children)
            } else {
                Block::stack(children)
            };
        }

        let text = store.text_of(handle).unwrap_or_default();
        let mut line = RenderLine::default();
        if store.action_of(handle).is_some() {
            let mut style = ContentStyle::new();
            if focus == Some(handle) {
                style.attributes =
                    Attributes::from(Attribute::Reverse) | Attributes::from(Attribute::Bold);
            }
            line.push(RenderSegment::styled(format!("[ {text} ]"), style));
        } else {
            line.push(RenderSegment::plain(text));
        }
        Block::line(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eddy_core::{Action, Backend, Direction, SurfaceSize};

    fn store_with(direction: Direction) -> (MemoryBackend, Handle) {
        let mut store = MemoryBackend::new();
        let surface = store
            .create_surface("Demo", SurfaceSize::default())
            .expect("surface");
        let layout = store.create_layout(direction).expect("layout");
        for text in ["a", "bb"] {
            let child = store.create_text(text).expect("text");
            store.attach_child(layout, child).expect("attach");
        }
        let button = store
            .create_clickable("go", Action::new(|| {}))
            .expect("button");
        store.attach_child(layout, button).expect("attach");
        store.set_content(surface, layout).expect("content");
        (store, button)
    }

    #[test]
    fn render_vertical_layout() {
        let (store, _) = store_with(Direction::TopToBottom);
        let frame = Renderer::new().render(&store, None);
        assert_eq!(frame.to_plain_text(), "Demo\n\na\nbb\n[ go ]");
    }

    #[test]
    fn render_horizontal_layout_with_gap() {
        let (store, _) = store_with(Direction::LeftToRight);
        let frame = Renderer::new().render(&store, None);
        assert_eq!(frame.lines()[2].segments()[0].content(), "a");
        assert_eq!(frame.to_plain_text(), "Demo\n\na bb [ go ]");
    }

    #[test]
    fn reversed_directions_flip_children() {
        let (store, _) = store_with(Direction::BottomToTop);
        let frame = Renderer::new().render(&store, None);
        assert_eq!(frame.to_plain_text(), "Demo\n\n[ go ]\nbb\na");
    }

    #[test]
    fn focused_button_is_highlighted() {
        let (store, button) = store_with(Direction::TopToBottom);
        let frame = Renderer::new().render(&store, Some(button));
        let segment = &frame.lines()[4].segments()[0];
        assert!(segment.as_styled_content().style().attributes.has(Attribute::Reverse));
    }

    #[test]
    fn side_by_side_blocks_are_padded() {
        let mut store = MemoryBackend::new();
        let surface = store
            .create_surface("", SurfaceSize::default())
            .expect("surface");
        let row = store.create_layout(Direction::LeftToRight).expect("row");
        let column = store.create_layout(Direction::TopToBottom).expect("column");
        for text in ["x", "yyy"] {
            let child = store.create_text(text).expect("text");
            store.attach_child(column, child).expect("attach");
        }
        let right = store.create_text("z").expect("text");
        store.attach_child(row, column).expect("attach");
        store.attach_child(row, right).expect("attach");
        store.set_content(surface, row).expect("content");

        let frame = Renderer::new().render(&store, None);
        assert_eq!(frame.to_plain_text(), "\n\nx   z\nyyy  ");
    }
}
