pub mod cursor;
pub mod highlight;
pub mod looper;
pub mod state;

pub use state::{FoldState, FoldStateUpdate, RepeatChange, RepeatLoop, RepeatRange, StepIdx};
