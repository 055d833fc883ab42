use std::{fmt, rc::Rc};

use eddy::{
    AnyNode, Button, Component, Container, Hooks, IntoNode, button, component, hstack, label,
    vstack,
};

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    /// Moves first.
    X,
    /// Moves second.
    O,
}

impl Player {
    /// Returns the player to move.
    #[must_use]
    pub const fn to_move(x_is_next: bool) -> Self {
        if x_is_next { Self::X } else { Self::O }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::O => "O",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The nine cells of a board, row by row.
pub type Squares = [Option<Player>; 9];

const EMPTY: Squares = [None; 9];

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Returns the player owning a complete line, if any.
#[must_use]
pub fn calculate_winner(squares: &Squares) -> Option<Player> {
    LINES.iter().find_map(|&[a, b, c]| {
        let player = squares[a]?;
        (squares[b] == Some(player) && squares[c] == Some(player)).then_some(player)
    })
}

struct SquareProps {
    value: Option<Player>,
    on_click: Rc<dyn Fn()>,
}

/// A single cell, shown as a button.
pub fn square(value: Option<Player>, on_click: impl Fn() + 'static) -> Component {
    let props = SquareProps {
        value,
        on_click: Rc::new(on_click),
    };
    component("Square", props, render_square)
}

fn render_square(_: &mut Hooks<'_>, props: &SquareProps) -> Button {
    let on_click = Rc::clone(&props.on_click);
    let text = props.value.map_or(" ", Player::as_str);
    button(text, move || on_click())
}

struct BoardProps {
    x_is_next: bool,
    squares: Squares,
    on_play: Rc<dyn Fn(Squares)>,
}

/// The status line above a three by three grid of squares.
///
/// Clicking an empty square while nobody has won hands the next position to
/// `on_play`. Every other click is ignored.
pub fn board(x_is_next: bool, squares: Squares, on_play: impl Fn(Squares) + 'static) -> Component {
    let props = BoardProps {
        x_is_next,
        squares,
        on_play: Rc::new(on_play),
    };
    component("Board", props, render_board)
}

fn render_board(_: &mut Hooks<'_>, props: &BoardProps) -> Container {
    let status = match calculate_winner(&props.squares) {
        Some(winner) => format!("Winner: {winner}"),
        None => format!("Next player: {}", Player::to_move(props.x_is_next)),
    };

    let mut children: Vec<AnyNode> = vec![label(status).into_node()];
    children.extend(props.squares.chunks(3).enumerate().map(|(row, cells)| {
        hstack(cells.iter().enumerate().map(|(column, value)| {
            square(*value, play_at(props, row * 3 + column))
        }))
        .into_node()
    }));
    vstack(children)
}

fn play_at(props: &BoardProps, index: usize) -> impl Fn() + 'static {
    let squares = props.squares;
    let x_is_next = props.x_is_next;
    let on_play = Rc::clone(&props.on_play);
    move || {
        if squares[index].is_some() || calculate_winner(&squares).is_some() {
            return;
        }
        let mut next = squares;
        next[index] = Some(Player::to_move(x_is_next));
        on_play(next);
    }
}

/// The whole game: a board beside the list of past moves.
///
/// Jumping to move `i` shows that position and gives the turn to X when `i`
/// is even. Playing from an earlier move discards the moves after it.
#[must_use]
pub fn game() -> Component {
    Component::new("Game", |hooks| {
        let (x_is_next, set_x_is_next) = hooks.use_state(true);
        let (history, set_history) = hooks.use_state(vec![EMPTY]);
        let (current_move, set_current_move) = hooks.use_state(0_usize);
        let current = history.get(current_move).copied().unwrap_or(EMPTY);

        let moves: Vec<Button> = (0..history.len())
            .map(|step| {
                let description = if step > 0 {
                    format!("Go to move #{step}")
                } else {
                    "Go to game start".to_owned()
                };
                let set_current_move = set_current_move.clone();
                let set_x_is_next = set_x_is_next.clone();
                button(description, move || {
                    set_current_move.set(step);
                    set_x_is_next.set(step % 2 == 0);
                })
            })
            .collect();

        let on_play = move |next: Squares| {
            let keep = (current_move + 1).min(history.len());
            let mut next_history = history[..keep].to_vec();
            next_history.push(next);
            set_current_move.set(next_history.len() - 1);
            set_history.set(next_history);
            set_x_is_next.set(!x_is_next);
        };

        hstack([
            board(x_is_next, current, on_play).into_node(),
            vstack(moves).into_node(),
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use eddy::{Handle, MemoryBackend, Window};

    fn mounted() -> Window<MemoryBackend> {
        let mut window = Window::new(MemoryBackend::new()).title("Tic-tac-toe");
        window.attach(game()).expect("attach");
        window
    }

    /// Squares come first in tree order, row by row.
    fn click_square(window: &mut Window<MemoryBackend>, index: usize) {
        let handle = window.backend().clickables()[index];
        click(window, handle);
    }

    fn click_text(window: &mut Window<MemoryBackend>, text: &str) {
        let handle = window
            .backend()
            .find_clickable(text)
            .unwrap_or_else(|| panic!("no button {text:?}"));
        click(window, handle);
    }

    fn click(window: &mut Window<MemoryBackend>, handle: Handle) {
        let action = window.backend().action_of(handle).expect("action");
        window.click(&action).expect("update");
    }

    fn board_handle(window: &Window<MemoryBackend>) -> Handle {
        let backend = window.backend();
        let content = backend
            .content_of(backend.surface().expect("surface"))
            .expect("content");
        backend.children_of(content)[0]
    }

    fn status(window: &Window<MemoryBackend>) -> String {
        let backend = window.backend();
        let handle = backend
            .find_text(|t| t.starts_with("Next player") || t.starts_with("Winner"))
            .expect("status");
        backend.text_of(handle).unwrap_or_default().to_owned()
    }

    fn cells(window: &Window<MemoryBackend>) -> Vec<String> {
        let backend = window.backend();
        backend.clickables()[..9]
            .iter()
            .map(|h| backend.text_of(*h).unwrap_or_default().to_owned())
            .collect()
    }

    fn moves(window: &Window<MemoryBackend>) -> Vec<String> {
        let backend = window.backend();
        backend.clickables()[9..]
            .iter()
            .map(|h| backend.text_of(*h).unwrap_or_default().to_owned())
            .collect()
    }

    #[test]
    fn winner_is_found_on_every_line() {
        for line in LINES {
            let mut squares = EMPTY;
            for index in line {
                squares[index] = Some(Player::O);
            }
            assert_eq!(calculate_winner(&squares), Some(Player::O), "{line:?}");
        }
    }

    #[test]
    fn no_winner_without_a_full_line() {
        assert_eq!(calculate_winner(&EMPTY), None);
        let mut squares = EMPTY;
        squares[0] = Some(Player::X);
        squares[1] = Some(Player::X);
        squares[2] = Some(Player::O);
        assert_eq!(calculate_winner(&squares), None);
    }

    #[test]
    fn players_alternate() {
        let mut window = mounted();
        assert_eq!(status(&window), "Next player: X");

        click_square(&mut window, 4);
        assert_eq!(status(&window), "Next player: O");
        click_square(&mut window, 0);
        assert_eq!(status(&window), "Next player: X");

        let cells = cells(&window);
        assert_eq!(cells[4], "X");
        assert_eq!(cells[0], "O");
        assert_eq!(moves(&window), ["Go to game start", "Go to move #1", "Go to move #2"]);
    }

    #[test]
    fn occupied_square_is_a_no_op() {
        let mut window = mounted();
        click_square(&mut window, 4);
        let widgets = window.backend().widgets();
        let stats = window.backend().stats();
        let snapshot = window.backend().snapshot();

        click_square(&mut window, 4);

        assert_eq!(window.backend().widgets(), widgets);
        assert_eq!(window.backend().stats(), stats);
        assert_eq!(window.backend().snapshot(), snapshot);
    }

    #[test]
    fn clicks_after_a_win_are_no_ops() {
        let mut window = mounted();
        for index in [0, 3, 1, 4, 2] {
            click_square(&mut window, index);
        }
        assert_eq!(status(&window), "Winner: X");
        let widgets = window.backend().widgets();
        let stats = window.backend().stats();
        let cells_before = cells(&window);

        click_square(&mut window, 8);
        click_square(&mut window, 5);

        assert_eq!(window.backend().widgets(), widgets);
        assert_eq!(window.backend().stats(), stats);
        assert_eq!(cells(&window), cells_before);
        assert_eq!(status(&window), "Winner: X");
    }

    #[test]
    fn jumping_to_start_restores_the_empty_board() {
        let mut window = mounted();
        let initial = window.backend().snapshot_of(board_handle(&window));

        for index in [0, 4, 8] {
            click_square(&mut window, index);
        }
        assert_ne!(window.backend().snapshot_of(board_handle(&window)), initial);

        click_text(&mut window, "Go to game start");
        assert_eq!(window.backend().snapshot_of(board_handle(&window)), initial);
        assert_eq!(status(&window), "Next player: X");
        // The history itself is kept until the next move.
        assert_eq!(moves(&window).len(), 4);
    }

    #[test]
    fn jumping_sets_the_turn_from_the_move_number() {
        let mut window = mounted();
        for index in [0, 4, 8] {
            click_square(&mut window, index);
        }

        click_text(&mut window, "Go to move #1");
        assert_eq!(status(&window), "Next player: O");
        assert_eq!(cells(&window)[0], "X");
        assert_eq!(cells(&window)[4], " ");

        click_text(&mut window, "Go to move #2");
        assert_eq!(status(&window), "Next player: X");
        assert_eq!(cells(&window)[4], "O");
    }

    #[test]
    fn playing_after_a_jump_truncates_history() {
        let mut window = mounted();
        for index in [0, 4, 8] {
            click_square(&mut window, index);
        }
        click_text(&mut window, "Go to move #1");
        click_square(&mut window, 2);

        assert_eq!(moves(&window), ["Go to game start", "Go to move #1", "Go to move #2"]);
        let cells = cells(&window);
        assert_eq!(cells[0], "X");
        assert_eq!(cells[2], "O");
        assert_eq!(cells[4], " ");
        assert_eq!(cells[8], " ");
        assert_eq!(status(&window), "Next player: X");
    }
}
