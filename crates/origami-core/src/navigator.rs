use std::time::Duration;

use origami_compiler::StepArray;
use origami_ir::StepPath;
use origami_model::cursor::{self, LoopCommand, StepOrigin};
use origami_model::looper::{advance_loop, LoopDirection};
use origami_model::{FoldState, FoldStateUpdate, StepIdx};

use crate::config::NavigatorConfig;
use crate::driver::{DriverId, LoopTimer};

/// Stateful side of step navigation.
///
/// Owns the loop timer, the single live driver handle and the sweep
/// direction. Never holds the fold state: every call reads the caller's
/// state and returns the update to merge into it.
pub struct Navigator<T: LoopTimer> {
    timer: T,
    period: Duration,
    driver: Option<DriverId>,
    direction: LoopDirection,
}

impl<T: LoopTimer> Navigator<T> {
    pub fn new(timer: T, config: &NavigatorConfig) -> Self {
        Self {
            timer,
            period: config.loop_period(),
            driver: None,
            direction: LoopDirection::Forward,
        }
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn driver(&self) -> Option<DriverId> {
        self.driver
    }

    pub fn direction(&self) -> LoopDirection {
        self.direction
    }

    /// User-driven move. Cancels any active loop.
    pub fn change_step(&mut self, state: &FoldState, delta: StepIdx) -> FoldStateUpdate {
        self.stop_driver();
        cursor::change_step(state, delta, StepOrigin::User)
    }

    pub fn step_forward(&mut self, state: &FoldState) -> FoldStateUpdate {
        self.change_step(state, 1)
    }

    pub fn step_back(&mut self, state: &FoldState) -> FoldStateUpdate {
        self.change_step(state, -1)
    }

    pub fn jump_to_end(&mut self, state: &FoldState) -> FoldStateUpdate {
        self.stop_driver();
        cursor::jump_to_end(state)
    }

    pub fn jump_to_start(&mut self) -> FoldStateUpdate {
        self.stop_driver();
        cursor::jump_to_start()
    }

    /// Explicitly end the loop without moving the cursor.
    pub fn stop_loop(&mut self) -> FoldStateUpdate {
        self.stop_driver();
        FoldStateUpdate::default().clearing_loop()
    }

    /// A tree node was clicked; `extend` is the range modifier.
    pub fn select(
        &mut self,
        state: &FoldState,
        steps: &StepArray,
        path: &StepPath,
        extend: bool,
    ) -> Option<FoldStateUpdate> {
        let Some(outcome) = cursor::select(state, steps, path, extend) else {
            tracing::debug!(%path, "selected node has no steps");
            return None;
        };
        match outcome.loop_command {
            LoopCommand::Start => self.start_driver(),
            LoopCommand::Stop => self.stop_driver(),
            // The loop may predate this navigator, e.g. a restored state.
            LoopCommand::Keep if self.driver.is_none() => self.start_driver(),
            LoopCommand::Keep => {}
        }
        Some(outcome.update)
    }

    /// Handle one tick from `driver`.
    ///
    /// Ticks from a driver that is no longer live, or arriving after the
    /// loop was cleared from the state, are dropped.
    pub fn on_tick(&mut self, state: &FoldState, driver: DriverId) -> Option<FoldStateUpdate> {
        if self.driver != Some(driver) {
            tracing::debug!(driver = driver.raw(), "ignoring tick from stale loop driver");
            return None;
        }
        let Some(advance) = advance_loop(state, self.direction) else {
            tracing::debug!(driver = driver.raw(), "ignoring tick, no active loop");
            self.stop_driver();
            return None;
        };
        self.direction = advance.next_direction;
        Some(advance.update)
    }

    fn start_driver(&mut self) {
        self.stop_driver();
        self.direction = LoopDirection::Forward;
        self.driver = Some(self.timer.start(self.period));
    }

    fn stop_driver(&mut self) {
        if let Some(driver) = self.driver.take() {
            self.timer.stop(driver);
        }
    }
}

impl<T: LoopTimer> Drop for Navigator<T> {
    fn drop(&mut self) {
        self.stop_driver();
    }
}
