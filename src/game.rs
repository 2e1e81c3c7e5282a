use std::process::exit;
use std::time::Instant;

use crate::state::{Direction, Frame, GameState, SCREEN_HEIGHT, SCREEN_WIDTH, UNIT_SIZE};
use crate::term::TermManager;
use crate::tone::Speaker;
use crate::{Coords, TermCoords};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::info;

const BOARD_COLS: u16 = (SCREEN_WIDTH / UNIT_SIZE) as u16;
const BOARD_ROWS: u16 = (SCREEN_HEIGHT / UNIT_SIZE) as u16;

const SNAKE_BODY_CHAR: char = '█';
const APPLE_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

/// Interactive session: owns the terminal, the speaker and the game state,
/// and drives ticks off a deadline-based timer whose interval the game
/// adjusts as apples are eaten.
pub struct SnakeSession {
    term: TermManager,
    speaker: Speaker,
    drawn: Vec<TermCoords>,
}

impl SnakeSession {
    pub fn new() -> Self {
        SnakeSession {
            term: TermManager::new((BOARD_COLS, BOARD_ROWS)),
            speaker: Speaker,
            drawn: vec![],
        }
    }

    pub fn initialize(&mut self) {
        if !self.term.fits() {
            eprintln!(
                "Terminal too small: need at least {}x{} cells.",
                BOARD_COLS + 2,
                BOARD_ROWS + 3
            );
            exit(1);
        }

        self.term.setup();
    }

    pub fn show_intro(&mut self) {
        let lines = &[
            "Arrow keys or WASD to move",
            "R to restart after a crash",
            "Esc or CTRL+C to quit",
            "",
            "Press any key to begin",
        ];

        self.term.show_message(lines);

        if is_exit_key(&self.term.read_key_blocking()) {
            self.clean_exit();
        }

        self.term.hide_message();
    }

    pub fn run(&mut self) {
        let mut state = GameState::new();
        info!("session started");
        self.reset_board(&state);

        loop {
            // Input arrives between ticks; the tick fires on the deadline.
            let deadline = Instant::now() + state.delay();
            loop {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                if let Some(ev) = self.term.poll_key(deadline - now) {
                    self.handle_key(&ev, &mut state);
                }
            }

            if state.is_running() {
                state.tick(&self.speaker);
                let frame = state.render_data();
                self.draw(&frame);
                if !frame.running {
                    info!("game over, score {}", frame.score);
                    self.show_game_over(&frame);
                }
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn handle_key(&mut self, ev: &KeyEvent, state: &mut GameState) {
        if is_exit_key(ev) {
            self.clean_exit();
        }

        match ev.code {
            KeyCode::Char('w') | KeyCode::Up => state.handle_direction(Direction::Up),
            KeyCode::Char('a') | KeyCode::Left => state.handle_direction(Direction::Left),
            KeyCode::Char('s') | KeyCode::Down => state.handle_direction(Direction::Down),
            KeyCode::Char('d') | KeyCode::Right => state.handle_direction(Direction::Right),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if !state.is_running() {
                    state.restart();
                    info!("restart");
                    self.reset_board(state);
                }
            }
            _ => {}
        }
    }

    fn reset_board(&mut self, state: &GameState) {
        self.term.hide_message();
        self.term.clear();
        self.term.draw_board_frame();
        self.drawn.clear();
        self.draw(&state.render_data());
    }

    fn draw(&mut self, frame: &Frame) {
        for &cell in &self.drawn {
            self.term.print_cell(cell, ' ');
        }
        self.drawn.clear();

        if let Some(cell) = to_board_cell(frame.food) {
            self.term.print_cell(cell, APPLE_CHAR);
            self.drawn.push(cell);
        }

        for (i, &seg) in frame.segments.iter().enumerate() {
            if let Some(cell) = to_board_cell(seg) {
                let ch = if i == 0 { head_char(frame.heading) } else { SNAKE_BODY_CHAR };
                self.term.print_cell(cell, ch);
                self.drawn.push(cell);
            }
        }

        self.term.print_score(frame.score);
        self.term.flush();
    }

    fn show_game_over(&mut self, frame: &Frame) {
        for &seg in &frame.segments {
            if let Some(cell) = to_board_cell(seg) {
                self.term.print_cell(cell, DEAD_SNAKE_CHAR);
            }
        }

        self.term.show_message(&[
            "Game over!",
            &*format!("Score: {}", frame.score),
            "",
            "Press R to restart,",
            "or Esc to quit.",
        ]);
    }

    fn clean_exit(&mut self) -> ! {
        self.term.restore();
        info!("exit");
        exit(0);
    }
}

fn head_char(heading: Direction) -> char {
    match heading {
        Direction::Up => '^',
        Direction::Down => 'v',
        Direction::Left => '<',
        Direction::Right => '>',
    }
}

// The dead head can sit one unit outside the field; it has no cell to draw.
fn to_board_cell(pos: Coords) -> Option<TermCoords> {
    if pos.0 < 0 || pos.1 < 0 || pos.0 >= SCREEN_WIDTH || pos.1 >= SCREEN_HEIGHT {
        return None;
    }

    Some(((pos.0 / UNIT_SIZE) as u16, (pos.1 / UNIT_SIZE) as u16))
}

fn is_exit_key(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Esc, .. })
        || matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
