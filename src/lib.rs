//! Terminal side-scroller: fixed 600x450 playfield projected onto half-block
//! pixels, with the whole game expressed as a per-frame state transition.

pub mod audio;
pub mod game;
pub mod render;

pub use game::{Input, Mode, Pipe, Player, Rect, RunState, StepEvent};
