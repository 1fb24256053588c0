//! Integration test: obstacle lifecycle
//!
//! Spawn geometry, advance/cull behavior, and scoring cadence over real
//! frames, driven through `RunState::step` with a seeded rng.

use cloudhop::game::{
    Input, Mode, Pipe, Rect, RunState, GAP_SIZE_MAX, GAP_SIZE_MIN, GAP_Y_MAX, GAP_Y_MIN,
    PIPE_SPEED, PIPE_WIDTH, PLAYFIELD_H,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const DT: f64 = 1.0 / 60.0;

fn flap() -> Input {
    Input {
        flap: true,
        ..Input::default()
    }
}

#[test]
fn spawned_pairs_share_column_and_legal_gap() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut state = RunState::new();
    state.step(flap(), DT, &mut rng);

    let mut pairs_seen = 0;
    for _ in 0..1200 {
        let before = state.pipes().len();
        state.step(Input::default(), DT, &mut rng);
        let pipes = state.pipes();
        if pipes.len() > before {
            assert_eq!(pipes.len(), before + 2, "pipes always arrive as a pair");
            let top = pipes[pipes.len() - 2];
            let bottom = pipes[pipes.len() - 1];

            assert_eq!(top.rect.x, bottom.rect.x);
            assert_eq!(top.rect.y, 0.0);
            assert_eq!(bottom.rect.bottom(), PLAYFIELD_H);

            let gap = bottom.rect.y - top.rect.bottom();
            assert!((GAP_SIZE_MIN as f64..=GAP_SIZE_MAX as f64).contains(&gap));
            assert!((GAP_Y_MIN as f64..=GAP_Y_MAX as f64).contains(&top.rect.bottom()));
            pairs_seen += 1;
        }
        if matches!(state.mode, Mode::Dead { .. }) {
            break;
        }
    }
    assert!(pairs_seen >= 2);
}

#[test]
fn pipes_advance_left_and_leave_in_order() {
    // Short top pipes sit above the parked player, so the run never ends
    // while they march off the left edge.
    let stub = |x: f64| Pipe {
        rect: Rect {
            x,
            y: 0.0,
            w: PIPE_WIDTH,
            h: 100.0,
        },
    };
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut state = RunState::new();
    state.player.y = PLAYFIELD_H - 100.0;
    state.mode = Mode::Playing {
        pipes: vec![stub(5.0), stub(120.0), stub(260.0)],
        score: 0,
        spawn_timer: 10_000,
    };

    let mut alive = state.pipes().len();
    for _ in 0..200 {
        let xs_before: Vec<f64> = state.pipes().iter().map(|p| p.rect.x).collect();
        state.step(Input::default(), DT, &mut rng);
        let pipes = state.pipes();

        // Survivors all have their right edge inside the playfield and keep
        // their relative order.
        for pipe in pipes {
            assert!(pipe.rect.right() >= 0.0);
        }
        let xs: Vec<f64> = pipes.iter().map(|p| p.rect.x).collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]));

        // Culling only ever drops the leftmost pipe, and only once its right
        // edge has crossed x = 0.
        if pipes.len() < alive {
            assert_eq!(pipes.len(), alive - 1);
            assert!(xs_before[0] + PIPE_WIDTH - PIPE_SPEED * DT < 0.0);
            alive = pipes.len();
        }
    }
    assert!(state.pipes().is_empty(), "every stub eventually scrolls off");
    assert!(matches!(state.mode, Mode::Playing { .. }));
}

#[test]
fn score_climbs_in_fives_across_cycles() {
    let mut rng = ChaCha8Rng::seed_from_u64(23);
    let mut state = RunState::new();
    // dt = 0 freezes all motion so the frame-counted countdown is the only
    // thing advancing; pipes pile up at the spawn column untouched.
    state.step(flap(), 0.0, &mut rng);

    let mut scores_at_spawn = Vec::new();
    for _ in 0..3000 {
        let before = state.pipes().len();
        state.step(Input::default(), 0.0, &mut rng);
        if state.pipes().len() > before {
            scores_at_spawn.push(state.score());
        }
    }
    assert!(scores_at_spawn.len() >= 10);
    for (i, score) in scores_at_spawn.iter().enumerate() {
        assert_eq!(*score, 5 * (i as u32 + 1));
    }
}
