pub mod cache;
pub mod compile;
pub mod flatten;
pub mod validate;

pub use cache::StepCache;
pub use compile::compile;
pub use flatten::{flatten, StepArray, StepEntry};
