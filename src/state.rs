//! Game rules: movement, growth, collision detection and difficulty scaling.
//!
//! The play field is a 24x24 grid of 25px cells, addressed in pixel
//! coordinates like the renderer sees them. The body lives in a
//! fixed-capacity arena with an explicit active length; moving shifts every
//! segment into the slot ahead of it, one slot past the active range
//! included, so that growth simply extends the active range into a slot the
//! shift already filled.

use std::time::Duration;

use rand::rngs::ThreadRng;
use rand::Rng;

use crate::tone::Chime;
use crate::{Coords, GameInt};
use Direction::*;

pub const SCREEN_WIDTH: GameInt = 600;
pub const SCREEN_HEIGHT: GameInt = 600;
pub const UNIT_SIZE: GameInt = 25;
pub const GAME_UNITS: usize = ((SCREEN_WIDTH / UNIT_SIZE) * (SCREEN_HEIGHT / UNIT_SIZE)) as usize;

const INITIAL_BODY_PARTS: usize = 6;
const START_DELAY_MS: u64 = 150;
const MIN_DELAY_MS: u64 = 50;
const SPEEDUP_STEP_MS: u64 = 15;
const APPLES_PER_SPEEDUP: u32 = 3;

const EAT_TONE_HZ: u32 = 900;
const EAT_TONE_MS: u64 = 100;
const CRASH_TONE_HZ: u32 = 200;
const CRASH_TONE_MS: u64 = 400;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn step(self) -> Coords {
        match self {
            Up => (0, -UNIT_SIZE),
            Down => (0, UNIT_SIZE),
            Left => (-UNIT_SIZE, 0),
            Right => (UNIT_SIZE, 0),
        }
    }
}

/// Read-only snapshot handed to the renderer once per tick.
pub struct Frame {
    pub running: bool,
    pub score: u32,
    pub food: Coords,
    pub heading: Direction,
    pub segments: Vec<Coords>,
}

pub struct GameState<R = ThreadRng> {
    rng: R,
    body: Vec<Coords>,
    body_parts: usize,
    food: Coords,
    direction: Direction,
    running: bool,
    apples_eaten: u32,
    delay_ms: u64,
}

impl GameState<ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl<R: Rng> GameState<R> {
    pub fn with_rng(rng: R) -> Self {
        let mut state = GameState {
            rng,
            body: vec![(0, 0); GAME_UNITS],
            body_parts: INITIAL_BODY_PARTS,
            food: (0, 0),
            direction: Right,
            running: true,
            apples_eaten: 0,
            delay_ms: START_DELAY_MS,
        };
        state.place_food();
        state
    }

    /// Advances the game by one time step: move, then the food check, then
    /// the collision check. Eating and dying are signalled on `chime`.
    pub fn tick(&mut self, chime: &dyn Chime) {
        if !self.running {
            return;
        }

        self.advance();
        self.check_food(chime);
        self.check_collisions(chime);
    }

    /// Applies a direction change immediately, unless it is the exact
    /// opposite of the current heading.
    pub fn handle_direction(&mut self, new_direction: Direction) {
        match (new_direction, self.direction) {
            (Up, Down) | (Down, Up) | (Left, Right) | (Right, Left) => {}
            _ => self.direction = new_direction,
        }
    }

    /// Rebuilds the starting state after a crash. A no-op while running.
    pub fn restart(&mut self) {
        if self.running {
            return;
        }

        self.body_parts = INITIAL_BODY_PARTS;
        self.apples_eaten = 0;
        self.direction = Right;
        for cell in &mut self.body {
            *cell = (0, 0);
        }
        self.delay_ms = START_DELAY_MS;
        self.place_food();
        self.running = true;
    }

    pub fn render_data(&self) -> Frame {
        Frame {
            running: self.running,
            score: self.apples_eaten,
            food: self.food,
            heading: self.direction,
            segments: self.body[..self.body_parts].to_vec(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn score(&self) -> u32 {
        self.apples_eaten
    }

    /// Current tick interval. The session loop re-reads this every cycle,
    /// which is how eating apples speeds the timer up.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    fn advance(&mut self) {
        // Shift from the tail towards the head, writing the dormant slot
        // one past the active range first.
        for i in (1..=self.body_parts).rev() {
            self.body[i] = self.body[i - 1];
        }

        let (dx, dy) = self.direction.step();
        let head = self.body[0];
        self.body[0] = (head.0 + dx, head.1 + dy);
    }

    fn check_food(&mut self, chime: &dyn Chime) {
        if self.body[0] != self.food {
            return;
        }

        self.body_parts += 1;
        self.apples_eaten += 1;
        chime.play_tone(EAT_TONE_HZ, EAT_TONE_MS);

        if self.apples_eaten % APPLES_PER_SPEEDUP == 0 && self.delay_ms > MIN_DELAY_MS {
            self.delay_ms = (self.delay_ms - SPEEDUP_STEP_MS).max(MIN_DELAY_MS);
        }

        self.place_food();
    }

    fn check_collisions(&mut self, chime: &dyn Chime) {
        let head = self.body[0];

        for i in (1..self.body_parts).rev() {
            if head == self.body[i] {
                self.running = false;
            }
        }

        if head.0 < 0 || head.0 >= SCREEN_WIDTH || head.1 < 0 || head.1 >= SCREEN_HEIGHT {
            self.running = false;
        }

        if !self.running {
            chime.play_tone(CRASH_TONE_HZ, CRASH_TONE_MS);
        }
    }

    // Food may land on a cell the body occupies; no exclusion check.
    fn place_food(&mut self) {
        let cols = SCREEN_WIDTH / UNIT_SIZE;
        let rows = SCREEN_HEIGHT / UNIT_SIZE;
        self.food = (
            self.rng.gen_range(0..cols) * UNIT_SIZE,
            self.rng.gen_range(0..rows) * UNIT_SIZE,
        );
    }
}
