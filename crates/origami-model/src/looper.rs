//! Ping-pong sweep over the repeat range, one step per driver tick.
//!
//! The direction flip is decided from the cursor position when the tick
//! fires, but only takes effect on the following tick; the current tick
//! still moves in the old direction. From range `[2, 5]` at step 4 going
//! forward, the sweep goes 4 -> 5 -> 4 -> 3 and so on.

use crate::cursor::{change_step, StepOrigin};
use crate::state::{FoldState, FoldStateUpdate, StepIdx};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopDirection {
    #[default]
    Forward,
    Backward,
}

impl LoopDirection {
    pub fn delta(self) -> StepIdx {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopAdvance {
    pub update: FoldStateUpdate,
    pub next_direction: LoopDirection,
}

/// One loop tick. `None` when no loop is active.
pub fn advance_loop(state: &FoldState, direction: LoopDirection) -> Option<LoopAdvance> {
    let active = state.repeat?;
    let dist_from_start = state.step_idx - active.range.start();
    let dist_from_end = active.range.end() - state.step_idx;

    let next_direction = match direction {
        LoopDirection::Backward if dist_from_start == -1 => LoopDirection::Forward,
        LoopDirection::Forward if dist_from_end == 1 => LoopDirection::Backward,
        unchanged => unchanged,
    };

    Some(LoopAdvance {
        update: change_step(state, direction.delta(), StepOrigin::Looper),
        next_direction,
    })
}
