//! Integration test: run lifecycle
//!
//! Drives whole runs through `RunState::step` with a seeded rng: menu →
//! playing → scored cycles → death → reset, all without a live terminal.

use cloudhop::game::{Input, Mode, Player, RunState, StepEvent};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const DT: f64 = 1.0 / 60.0;

fn flap() -> Input {
    Input {
        flap: true,
        ..Input::default()
    }
}

/// Step `count` frames with no input at a fixed 60 fps cadence.
fn run_frames(state: &mut RunState, rng: &mut ChaCha8Rng, count: u32) -> Vec<StepEvent> {
    let mut events = Vec::new();
    for _ in 0..count {
        events.extend(state.step(Input::default(), DT, rng));
    }
    events
}

#[test]
fn menu_leaves_player_parked() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut state = RunState::new();

    run_frames(&mut state, &mut rng, 300);
    assert_eq!(state.mode, Mode::Menu);
    assert_eq!(state.player, Player::new());
    assert_eq!(state.score(), 0);
    assert!(state.pipes().is_empty());
}

#[test]
fn full_run_reaches_death_and_resets() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut state = RunState::new();

    state.step(flap(), DT, &mut rng);
    assert!(matches!(state.mode, Mode::Playing { .. }));
    assert!(state.player.falling);

    // Without further flaps the player settles on the floor; the first
    // bottom pipe reaches its column and ends the run.
    let mut events = Vec::new();
    for _ in 0..2000 {
        events.extend(state.step(Input::default(), DT, &mut rng));
        if matches!(state.mode, Mode::Dead { .. }) {
            break;
        }
    }
    assert_eq!(events, vec![StepEvent::Died]);
    assert!(matches!(state.mode, Mode::Dead { .. }));
    assert!(
        state.score() >= 10,
        "two full spawn cycles fit before the first pipe arrives"
    );
    assert_eq!(state.best, state.score());
    assert_eq!(state.player.vy, 0.0);
    assert!(!state.player.falling);
    assert!(!state.pipes().is_empty(), "death screen keeps the frozen pipes");

    // The death screen ignores everything but the flap edge.
    let events = run_frames(&mut state, &mut rng, 30);
    assert!(events.is_empty());
    assert!(matches!(state.mode, Mode::Dead { .. }));

    let best = state.best;
    state.step(flap(), DT, &mut rng);
    assert_eq!(state.mode, Mode::Menu);
    assert_eq!(state.player, Player::new());
    assert!(state.pipes().is_empty());
    assert_eq!(state.score(), 0);
    assert_eq!(state.best, best);

    // And the next flap starts a clean run.
    state.step(flap(), DT, &mut rng);
    assert!(matches!(state.mode, Mode::Playing { .. }));
    assert!(state.pipes().is_empty());
    assert_eq!(state.score(), 0);
}

#[test]
fn runs_replay_deterministically() {
    let play = || {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut state = RunState::new();
        state.step(flap(), DT, &mut rng);
        for frame in 0..600u32 {
            let input = if frame % 20 == 0 {
                flap()
            } else {
                Input::default()
            };
            state.step(input, DT, &mut rng);
        }
        state
    };
    assert_eq!(play(), play());
}

#[test]
fn mute_toggle_is_orthogonal_to_the_run() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut state = RunState::new();
    let toggle = Input {
        toggle_mute: true,
        ..Input::default()
    };

    state.step(toggle, DT, &mut rng);
    assert!(state.muted);
    assert_eq!(state.mode, Mode::Menu);

    state.step(flap(), DT, &mut rng);
    let snapshot = state.clone();
    state.step(toggle, DT, &mut rng);
    assert!(!state.muted);
    assert_eq!(state.score(), snapshot.score());
    assert!(matches!(state.mode, Mode::Playing { .. }));
}
