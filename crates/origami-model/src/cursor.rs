//! Step cursor: index/path translation, bounded moves and the selection
//! state machine.
//!
//! Every function here is pure. It reads the current [`FoldState`] and
//! returns the update to merge. Starting and stopping the loop driver is
//! left to the caller, signalled through [`LoopCommand`].

use origami_compiler::StepArray;
use origami_ir::StepPath;

use crate::state::{FoldState, FoldStateUpdate, RepeatLoop, RepeatRange, StepIdx};

/// Who asked for a step change. Only user moves cancel a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOrigin {
    User,
    Looper,
}

pub fn clamp_step(idx: StepIdx, max_steps: usize) -> StepIdx {
    idx.clamp(-1, max_steps as StepIdx)
}

/// Move the cursor by `delta`, clamped to `[-1, max_steps]`.
pub fn change_step(state: &FoldState, delta: StepIdx, origin: StepOrigin) -> FoldStateUpdate {
    let step_idx = clamp_step(state.step_idx.saturating_add(delta), state.max_steps);
    let update = FoldStateUpdate::step(step_idx);
    match origin {
        StepOrigin::User => update.clearing_loop(),
        StepOrigin::Looper => update,
    }
}

/// Jump to the last real step. Ends any active loop.
pub fn jump_to_end(state: &FoldState) -> FoldStateUpdate {
    FoldStateUpdate::step((state.max_idx() - 1).max(-1)).clearing_loop()
}

/// Back to "not started". Ends the loop, like [`jump_to_end`].
pub fn jump_to_start() -> FoldStateUpdate {
    FoldStateUpdate::step(-1).clearing_loop()
}

/// Index of the step whose path is exactly `path`.
pub fn locate_step(steps: &StepArray, path: &StepPath) -> Option<usize> {
    steps.iter().position(|entry| entry.path == *path)
}

/// First and last steps whose path is an ancestor or descendant of `path`.
pub fn find_in_use_family(steps: &StepArray, path: &StepPath) -> Option<(usize, usize)> {
    let first = steps.iter().position(|entry| entry.path.is_related(path))?;
    let last = steps.iter().rposition(|entry| entry.path.is_related(path))?;
    Some((first, last))
}

/// What a clicked tree node stands for in the step array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The node is itself a step.
    Exact(usize),
    /// The node covers (or sits inside) a run of steps.
    Family { first: usize, last: usize },
}

impl Selection {
    pub fn bounds(&self) -> (StepIdx, StepIdx) {
        match *self {
            Self::Exact(idx) => (idx as StepIdx, idx as StepIdx),
            Self::Family { first, last } => (first as StepIdx, last as StepIdx),
        }
    }
}

pub fn resolve_selection(steps: &StepArray, path: &StepPath) -> Option<Selection> {
    if let Some(idx) = locate_step(steps, path) {
        return Some(Selection::Exact(idx));
    }
    find_in_use_family(steps, path).map(|(first, last)| Selection::Family { first, last })
}

/// What the loop driver should do after a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopCommand {
    Start,
    Stop,
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOutcome {
    pub selection: Selection,
    pub update: FoldStateUpdate,
    pub loop_command: LoopCommand,
}

/// A tree node was clicked. `extend` is the range-selection modifier.
///
/// Returns `None` when `path` matches no step at all.
pub fn select(
    state: &FoldState,
    steps: &StepArray,
    path: &StepPath,
    extend: bool,
) -> Option<SelectOutcome> {
    let selection = resolve_selection(steps, path)?;
    let (start, end) = selection.bounds();

    let (update, loop_command) = match (extend, state.repeat) {
        (false, _) => (
            FoldStateUpdate::step(start - 1).clearing_loop(),
            LoopCommand::Stop,
        ),
        (true, None) => {
            let repeat = RepeatLoop {
                root: start,
                range: RepeatRange::new(start, end),
            };
            (
                FoldStateUpdate::step(start - 1).with_loop(repeat),
                LoopCommand::Start,
            )
        }
        (true, Some(active)) => {
            let range = extend_range(active.root, selection);
            let repeat = RepeatLoop {
                root: active.root,
                range,
            };
            (
                FoldStateUpdate::step(range.start() - 1).with_loop(repeat),
                LoopCommand::Keep,
            )
        }
    };

    tracing::debug!(
        %path,
        extend,
        ?selection,
        step_idx = ?update.step_idx,
        ?loop_command,
        "selected tree node"
    );

    Some(SelectOutcome {
        selection,
        update,
        loop_command,
    })
}

fn extend_range(root: StepIdx, selection: Selection) -> RepeatRange {
    match selection {
        Selection::Exact(idx) => RepeatRange::new(root, idx as StepIdx),
        Selection::Family { first, last } => {
            let (first, last) = (first as StepIdx, last as StepIdx);
            if first <= root && root <= last {
                RepeatRange::new(first, last)
            } else if last < root {
                RepeatRange::new(root, first)
            } else {
                RepeatRange::new(root, last)
            }
        }
    }
}

/// Re-fit a state to a freshly generated step array of `max_steps` entries.
pub fn revalidate(state: &FoldState, max_steps: usize) -> FoldStateUpdate {
    let mut update = FoldStateUpdate {
        max_steps: Some(max_steps),
        ..Default::default()
    };

    let step_idx = clamp_step(state.step_idx, max_steps);
    if step_idx != state.step_idx {
        update.step_idx = Some(step_idx);
    }

    if let Some(active) = state.repeat {
        let last = max_steps as StepIdx - 1;
        if active.range.start() > last {
            update = update.clearing_loop();
        } else {
            let range = RepeatRange::new(active.range.start(), active.range.end().min(last));
            let root = active.root.min(last);
            let refit = RepeatLoop { root, range };
            if refit != active {
                update = update.with_loop(refit);
            }
        }
    }

    update
}
