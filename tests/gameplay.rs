use std::time::Duration;

use rand::rngs::mock::StepRng;

use sidewinder::state::{Direction, GameState, SCREEN_WIDTH, UNIT_SIZE};
use sidewinder::tone::Chime;

struct Silent;

impl Chime for Silent {
    fn play_tone(&self, _freq_hz: u32, _duration_ms: u64) {}
}

/// A zero rng stream pins every food placement to the origin cell, making
/// whole games deterministic.
fn deterministic_game() -> GameState<StepRng> {
    GameState::with_rng(StepRng::new(0, 0))
}

#[test]
fn uninterrupted_run_exits_the_right_boundary_on_tick_24() {
    let mut state = deterministic_game();

    for tick in 1..=23 {
        state.tick(&Silent);
        let frame = state.render_data();
        assert!(frame.running, "still inside the field on tick {}", tick);
        assert_eq!(frame.segments[0], (tick * UNIT_SIZE, 0));
    }

    state.tick(&Silent);
    let frame = state.render_data();
    assert!(!frame.running);
    assert_eq!(frame.segments[0], (SCREEN_WIDTH, 0));
    assert_eq!(frame.score, 0);
}

#[test]
fn reversing_input_is_ignored_mid_run() {
    let mut state = deterministic_game();

    state.handle_direction(Direction::Left);
    state.tick(&Silent);

    let frame = state.render_data();
    assert_eq!(frame.heading, Direction::Right);
    assert_eq!(frame.segments[0], (UNIT_SIZE, 0));
}

#[test]
fn looping_back_to_the_origin_eats_and_then_crashes() {
    let mut state = deterministic_game();

    // The food sits at the origin, on top of the still-folded tail. Circle
    // back onto it: the eat registers first, the self-collision second.
    state.tick(&Silent);
    state.handle_direction(Direction::Down);
    state.tick(&Silent);
    state.handle_direction(Direction::Left);
    state.tick(&Silent);
    state.handle_direction(Direction::Up);
    state.tick(&Silent);

    let frame = state.render_data();
    assert_eq!(frame.segments[0], (0, 0));
    assert_eq!(frame.score, 1);
    assert_eq!(frame.segments.len(), 7);
    assert!(!frame.running);
}

#[test]
fn restart_after_a_crash_starts_a_fresh_game() {
    let mut state = deterministic_game();

    while state.is_running() {
        state.tick(&Silent);
    }

    state.restart();
    let frame = state.render_data();
    assert!(frame.running);
    assert_eq!(frame.score, 0);
    assert_eq!(frame.heading, Direction::Right);
    assert_eq!(frame.segments, vec![(0, 0); 6]);
    assert_eq!(state.delay(), Duration::from_millis(150));

    state.tick(&Silent);
    assert_eq!(state.render_data().segments[0], (UNIT_SIZE, 0));
}
