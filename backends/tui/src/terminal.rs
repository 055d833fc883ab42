use std::{
    collections::VecDeque,
    io::{self, Stdout, Write},
};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event as TermEvent, KeyEvent, KeyEventKind},
    execute, queue,
    style::PrintStyledContent,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use eddy_core::BackendError;

use crate::renderer::{RenderFrame, RenderLine};

/// Represents the concrete input/output target the terminal backend uses.
#[derive(Debug)]
enum TerminalTarget {
    Stdout {
        handle: Stdout,
        raw_mode: bool,
        alternate_screen: bool,
        cursor_hidden: bool,
    },
    Buffer {
        output: Vec<u8>,
        keys: VecDeque<KeyEvent>,
    },
}

impl TerminalTarget {
    fn stdout() -> Result<Self, BackendError> {
        terminal::enable_raw_mode()?;
        // Drop restores whatever succeeded if a later step fails.
        let mut target = Self::Stdout {
            handle: io::stdout(),
            raw_mode: true,
            alternate_screen: false,
            cursor_hidden: false,
        };
        if let Self::Stdout {
            handle,
            alternate_screen,
            cursor_hidden,
            ..
        } = &mut target
        {
            execute!(handle, EnterAlternateScreen)?;
            *alternate_screen = true;
            execute!(handle, Hide)?;
            *cursor_hidden = true;
        }
        Ok(target)
    }

    fn buffered(keys: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self::Buffer {
            output: Vec::new(),
            keys: keys.into_iter().collect(),
        }
    }

    fn write_frame(&mut self, frame: &RenderFrame) -> Result<(), BackendError> {
        match self {
            Self::Stdout { handle, .. } => {
                queue!(handle, MoveTo(0, 0), Clear(ClearType::All))?;
                for (row, line) in frame.lines().iter().enumerate() {
                    let row = u16::try_from(row).unwrap_or(u16::MAX);
                    queue!(handle, MoveTo(0, row))?;
                    write_line_stdout(handle, line)?;
                }
                handle.flush()?;
                Ok(())
            }
            Self::Buffer { output, .. } => {
                output.clear();
                output.extend_from_slice(frame.to_plain_text().as_bytes());
                Ok(())
            }
        }
    }

    fn read_key(&mut self) -> Result<Option<KeyEvent>, BackendError> {
        match self {
            Self::Stdout { .. } => loop {
                if let TermEvent::Key(key) = event::read()?
                    && key.kind == KeyEventKind::Press
                {
                    return Ok(Some(key));
                }
            },
            Self::Buffer { keys, .. } => Ok(keys.pop_front()),
        }
    }
}

impl Drop for TerminalTarget {
    fn drop(&mut self) {
        if let Self::Stdout {
            handle,
            raw_mode,
            alternate_screen,
            cursor_hidden,
        } = self
        {
            if *cursor_hidden {
                let _ = execute!(handle, Show);
            }
            if *alternate_screen {
                let _ = execute!(handle, LeaveAlternateScreen);
            }
            if *raw_mode {
                let _ = terminal::disable_raw_mode();
            }
        }
    }
}

fn write_line_stdout(handle: &mut Stdout, line: &RenderLine) -> Result<(), BackendError> {
    for segment in line.segments() {
        queue!(handle, PrintStyledContent(segment.as_styled_content()))?;
    }
    Ok(())
}

/// Thin wrapper around the concrete terminal target.
#[derive(Debug)]
pub struct Terminal {
    target: TerminalTarget,
}

impl Terminal {
    /// Creates a terminal bound to the process `stdout` handle, enabling raw mode
    /// and entering the alternate screen buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or the alternate screen cannot be enabled.
    pub fn stdout() -> Result<Self, BackendError> {
        Ok(Self {
            target: TerminalTarget::stdout()?,
        })
    }

    /// Creates an in-memory terminal that replays `keys` as input.
    ///
    /// Once the keys run out, reading input reports the end of the session.
    #[must_use]
    pub fn buffered(keys: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self {
            target: TerminalTarget::buffered(keys),
        }
    }

    /// Draws a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn render(&mut self, frame: &RenderFrame) -> Result<(), BackendError> {
        self.target.write_frame(frame)
    }

    /// Blocks until a key is pressed. `None` means input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    pub fn read_key(&mut self) -> Result<Option<KeyEvent>, BackendError> {
        self.target.read_key()
    }

    /// Returns the last frame written when the terminal was created via [`Self::buffered`].
    #[must_use]
    pub fn snapshot(&self) -> Option<&str> {
        match &self.target {
            TerminalTarget::Buffer { output, .. } => core::str::from_utf8(output).ok(),
            TerminalTarget::Stdout { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{RenderLine, RenderSegment};
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn buffered_terminal_replays_keys() {
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let mut terminal = Terminal::buffered([key]);
        assert_eq!(terminal.read_key().expect("read"), Some(key));
        assert_eq!(terminal.read_key().expect("read"), None);
    }

    #[test]
    fn stdout_target_only_undoes_completed_steps() {
        // Nothing was switched on, so dropping must not touch the terminal.
        let target = TerminalTarget::Stdout {
            handle: io::stdout(),
            raw_mode: false,
            alternate_screen: false,
            cursor_hidden: false,
        };
        drop(target);
        assert!(!terminal::is_raw_mode_enabled().unwrap_or(false));
    }

    #[test]
    fn buffered_terminal_keeps_last_frame() {
        let mut terminal = Terminal::buffered([]);
        assert_eq!(terminal.snapshot(), Some(""));
        let mut frame = RenderFrame::default();
        let mut line = RenderLine::default();
        line.push(RenderSegment::plain("hello"));
        frame.push(line);
        terminal.render(&frame).expect("render");
        assert_eq!(terminal.snapshot(), Some("hello"));
    }
}
