use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Cursor position in the step array.
///
/// `-1` is "not started", `max_steps - 1` the last real step and
/// `max_steps` the "finished" sentinel.
pub type StepIdx = i64;

/// Inclusive loop bounds. Always sorted: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[StepIdx; 2]", into = "[StepIdx; 2]")]
pub struct RepeatRange {
    start: StepIdx,
    end: StepIdx,
}

impl RepeatRange {
    /// Build a range from two bounds in either order.
    pub fn new(a: StepIdx, b: StepIdx) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn start(&self) -> StepIdx {
        self.start
    }

    pub fn end(&self) -> StepIdx {
        self.end
    }

    pub fn contains(&self, idx: StepIdx) -> bool {
        self.start <= idx && idx <= self.end
    }
}

impl From<[StepIdx; 2]> for RepeatRange {
    fn from([a, b]: [StepIdx; 2]) -> Self {
        Self::new(a, b)
    }
}

impl From<RepeatRange> for [StepIdx; 2] {
    fn from(range: RepeatRange) -> Self {
        [range.start, range.end]
    }
}

/// An active loop: the anchor the user started from and the swept range.
/// The root may sit on either bound or inside the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatLoop {
    pub root: StepIdx,
    pub range: RepeatRange,
}

#[derive(Debug, thiserror::Error)]
pub enum FoldStateError {
    #[error("repeatRoot is {root} but repeatRange is null")]
    RootWithoutRange { root: StepIdx },

    #[error("repeatRange is set but repeatRoot is -1")]
    RangeWithoutRoot,
}

/// Navigation state of one folding session.
///
/// Owned by whoever hosts the session; the engine only computes
/// [`FoldStateUpdate`]s for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFoldState", into = "RawFoldState")]
pub struct FoldState {
    pub step_idx: StepIdx,
    pub max_steps: usize,
    pub using_defaults: bool,
    pub repeat: Option<RepeatLoop>,
}

impl FoldState {
    pub fn new(max_steps: usize, using_defaults: bool) -> Self {
        Self {
            step_idx: -1,
            max_steps,
            using_defaults,
            repeat: None,
        }
    }

    pub fn max_idx(&self) -> StepIdx {
        self.max_steps as StepIdx
    }

    pub fn is_looping(&self) -> bool {
        self.repeat.is_some()
    }

    /// `-1` when no loop is active.
    pub fn repeat_root(&self) -> StepIdx {
        self.repeat.map_or(-1, |r| r.root)
    }

    pub fn repeat_range(&self) -> Option<RepeatRange> {
        self.repeat.map(|r| r.range)
    }

    /// The step about to be taken, if any.
    pub fn next_step(&self) -> Option<usize> {
        usize::try_from(self.step_idx + 1)
            .ok()
            .filter(|&i| i < self.max_steps)
    }

    /// Merge a partial update.
    pub fn apply(&mut self, update: &FoldStateUpdate) {
        if let Some(step_idx) = update.step_idx {
            self.step_idx = step_idx;
        }
        if let Some(max_steps) = update.max_steps {
            self.max_steps = max_steps;
        }
        if let Some(using_defaults) = update.using_defaults {
            self.using_defaults = using_defaults;
        }
        match update.repeat {
            RepeatChange::Keep => {}
            RepeatChange::Clear => self.repeat = None,
            RepeatChange::Set(repeat) => self.repeat = Some(repeat),
        }
    }
}

impl Default for FoldState {
    fn default() -> Self {
        Self::new(0, false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFoldState {
    step_idx: StepIdx,
    max_steps: usize,
    #[serde(default)]
    using_defaults: bool,
    #[serde(default = "no_root")]
    repeat_root: StepIdx,
    #[serde(default)]
    repeat_range: Option<RepeatRange>,
}

fn no_root() -> StepIdx {
    -1
}

impl TryFrom<RawFoldState> for FoldState {
    type Error = FoldStateError;

    fn try_from(raw: RawFoldState) -> Result<Self, Self::Error> {
        let repeat = match (raw.repeat_root, raw.repeat_range) {
            (-1, None) => None,
            (-1, Some(_)) => return Err(FoldStateError::RangeWithoutRoot),
            (root, None) => return Err(FoldStateError::RootWithoutRange { root }),
            (root, Some(range)) => Some(RepeatLoop { root, range }),
        };
        Ok(Self {
            step_idx: raw.step_idx,
            max_steps: raw.max_steps,
            using_defaults: raw.using_defaults,
            repeat,
        })
    }
}

impl From<FoldState> for RawFoldState {
    fn from(state: FoldState) -> Self {
        Self {
            step_idx: state.step_idx,
            max_steps: state.max_steps,
            using_defaults: state.using_defaults,
            repeat_root: state.repeat_root(),
            repeat_range: state.repeat_range(),
        }
    }
}

// ── Updates ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatChange {
    #[default]
    Keep,
    Clear,
    Set(RepeatLoop),
}

/// A partial fold-state update for the state owner to merge.
///
/// Serializes to the partial-object shape the host merges, for example
/// `{"stepIdx": 4, "repeatRoot": -1, "repeatRange": null}`; untouched fields
/// are omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FoldStateUpdate {
    pub step_idx: Option<StepIdx>,
    pub max_steps: Option<usize>,
    pub using_defaults: Option<bool>,
    pub repeat: RepeatChange,
}

impl FoldStateUpdate {
    pub fn step(step_idx: StepIdx) -> Self {
        Self {
            step_idx: Some(step_idx),
            ..Default::default()
        }
    }

    pub fn clearing_loop(mut self) -> Self {
        self.repeat = RepeatChange::Clear;
        self
    }

    pub fn with_loop(mut self, repeat: RepeatLoop) -> Self {
        self.repeat = RepeatChange::Set(repeat);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.step_idx.is_none()
            && self.max_steps.is_none()
            && self.using_defaults.is_none()
            && self.repeat == RepeatChange::Keep
    }

    pub fn clears_loop(&self) -> bool {
        self.repeat == RepeatChange::Clear
    }
}

impl Serialize for FoldStateUpdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(step_idx) = self.step_idx {
            map.serialize_entry("stepIdx", &step_idx)?;
        }
        if let Some(max_steps) = self.max_steps {
            map.serialize_entry("maxSteps", &max_steps)?;
        }
        if let Some(using_defaults) = self.using_defaults {
            map.serialize_entry("usingDefaults", &using_defaults)?;
        }
        match self.repeat {
            RepeatChange::Keep => {}
            RepeatChange::Clear => {
                map.serialize_entry("repeatRoot", &-1)?;
                map.serialize_entry("repeatRange", &None::<RepeatRange>)?;
            }
            RepeatChange::Set(repeat) => {
                map.serialize_entry("repeatRoot", &repeat.root)?;
                map.serialize_entry("repeatRange", &Some(repeat.range))?;
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_range_sorts_on_construction() {
        let range = RepeatRange::new(7, 3);
        assert_eq!((range.start(), range.end()), (3, 7));
        assert!(range.contains(3) && range.contains(7) && !range.contains(8));
    }

    #[test]
    fn test_apply_merges_only_present_fields() {
        let mut state = FoldState::new(10, false);
        state.apply(&FoldStateUpdate::step(4));
        assert_eq!(state.step_idx, 4);
        assert_eq!(state.max_steps, 10);

        let repeat = RepeatLoop {
            root: 4,
            range: RepeatRange::new(4, 6),
        };
        state.apply(&FoldStateUpdate::default().with_loop(repeat));
        assert_eq!(state.step_idx, 4);
        assert_eq!(state.repeat_root(), 4);

        state.apply(&FoldStateUpdate::step(1).clearing_loop());
        assert_eq!(state.repeat_root(), -1);
        assert!(state.repeat_range().is_none());
    }

    #[test]
    fn test_state_json_shape() {
        let mut state = FoldState::new(5, true);
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({
                "stepIdx": -1,
                "maxSteps": 5,
                "usingDefaults": true,
                "repeatRoot": -1,
                "repeatRange": null
            })
        );

        state.repeat = Some(RepeatLoop {
            root: 3,
            range: RepeatRange::new(3, 1),
        });
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["repeatRange"], json!([1, 3]));
        let back: FoldState = serde_json::from_value(value).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_state_rejects_half_loop() {
        let root_only = json!({ "stepIdx": 0, "maxSteps": 3, "repeatRoot": 1, "repeatRange": null });
        assert!(serde_json::from_value::<FoldState>(root_only).is_err());

        let range_only = json!({ "stepIdx": 0, "maxSteps": 3, "repeatRoot": -1, "repeatRange": [0, 1] });
        assert!(serde_json::from_value::<FoldState>(range_only).is_err());
    }

    #[test]
    fn test_update_json_is_partial() {
        assert_eq!(
            serde_json::to_value(FoldStateUpdate::step(2)).unwrap(),
            json!({ "stepIdx": 2 })
        );
        assert_eq!(
            serde_json::to_value(FoldStateUpdate::step(2).clearing_loop()).unwrap(),
            json!({ "stepIdx": 2, "repeatRoot": -1, "repeatRange": null })
        );
    }

    #[test]
    fn test_next_step() {
        let mut state = FoldState::new(3, false);
        assert_eq!(state.next_step(), Some(0));
        state.step_idx = 2;
        assert_eq!(state.next_step(), None);
    }
}
