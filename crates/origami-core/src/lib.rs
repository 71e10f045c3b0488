pub mod config;
pub mod driver;
pub mod navigator;
pub mod session;

pub use config::NavigatorConfig;
pub use driver::{LoopTick, LoopTimer, ManualLoopTimer, TokioLoopTimer};
pub use navigator::Navigator;
pub use session::{FoldSession, SessionError};
