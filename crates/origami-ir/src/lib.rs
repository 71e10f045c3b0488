pub mod parse;
pub mod path;
pub mod tree;
pub mod types;

pub use path::StepPath;
pub use types::{Command, FoldDefinition, InstructionNode};
