use std::sync::Arc;

use origami_compiler::validate::{validate_tree, ValidationError};
use origami_compiler::{StepArray, StepCache};
use origami_ir::parse::{parse_fold, ParseError};
use origami_ir::path::PathParseError;
use origami_ir::tree::description_at;
use origami_ir::{FoldDefinition, InstructionNode, StepPath};
use origami_model::cursor::revalidate;
use origami_model::highlight::{classify, NodeHighlight};
use origami_model::{FoldState, FoldStateUpdate, StepIdx};

use crate::config::NavigatorConfig;
use crate::driver::{LoopTick, LoopTimer};
use crate::navigator::Navigator;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Fold parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Invalid step path: {0}")]
    Path(#[from] PathParseError),
}

/// One folding session: a loaded fold, its fold state and a navigator.
///
/// This is the state owner. Navigator updates are merged here and handed
/// back to the caller so a UI can mirror them.
pub struct FoldSession<T: LoopTimer> {
    name: String,
    description: Option<String>,
    cache: StepCache,
    steps: StepArray,
    state: FoldState,
    navigator: Navigator<T>,
    warnings: Vec<ValidationError>,
}

impl<T: LoopTimer> FoldSession<T> {
    /// Parse a fold definition and open a session on it.
    pub fn load(json: &str, config: &NavigatorConfig, timer: T) -> Result<Self, SessionError> {
        let fold = parse_fold(json)?;
        Ok(Self::new(fold, config, timer))
    }

    pub fn new(fold: FoldDefinition, config: &NavigatorConfig, timer: T) -> Self {
        let warnings = validate_tree(&fold.instructions).err().unwrap_or_default();
        for warning in &warnings {
            tracing::warn!(fold = %fold.name, %warning, "fold validation");
        }

        let mut cache = StepCache::new(Arc::new(fold.instructions));
        let steps = cache.get(config.using_defaults).clone();
        let state = FoldState::new(steps.len(), config.using_defaults);
        tracing::info!(
            fold = %fold.name,
            steps = steps.len(),
            using_defaults = config.using_defaults,
            "fold session opened"
        );

        Self {
            name: fold.name,
            description: fold.description,
            cache,
            steps,
            state,
            navigator: Navigator::new(timer, config),
            warnings,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn tree(&self) -> &InstructionNode {
        self.cache.tree()
    }

    pub fn steps(&self) -> &StepArray {
        &self.steps
    }

    pub fn state(&self) -> &FoldState {
        &self.state
    }

    pub fn navigator(&self) -> &Navigator<T> {
        &self.navigator
    }

    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    pub fn step(&mut self, delta: StepIdx) -> FoldStateUpdate {
        let update = self.navigator.change_step(&self.state, delta);
        self.commit(update)
    }

    pub fn jump_to_end(&mut self) -> FoldStateUpdate {
        let update = self.navigator.jump_to_end(&self.state);
        self.commit(update)
    }

    pub fn jump_to_start(&mut self) -> FoldStateUpdate {
        let update = self.navigator.jump_to_start();
        self.commit(update)
    }

    pub fn stop_loop(&mut self) -> FoldStateUpdate {
        let update = self.navigator.stop_loop();
        self.commit(update)
    }

    /// Click on a tree node. `None` if the node maps to no step.
    pub fn select(&mut self, path: &StepPath, extend: bool) -> Option<FoldStateUpdate> {
        let update = self
            .navigator
            .select(&self.state, &self.steps, path, extend)?;
        Some(self.commit(update))
    }

    /// Click on a tree node addressed by its display path (`"0,2"`).
    pub fn select_str(
        &mut self,
        path: &str,
        extend: bool,
    ) -> Result<Option<FoldStateUpdate>, SessionError> {
        let path: StepPath = path.parse()?;
        Ok(self.select(&path, extend))
    }

    /// Feed a loop driver tick.
    pub fn tick(&mut self, tick: LoopTick) -> Option<FoldStateUpdate> {
        let update = self.navigator.on_tick(&self.state, tick.driver)?;
        Some(self.commit(update))
    }

    /// Toggle default collapsing. Regenerates the step array, re-fits the
    /// cursor to it and ends any loop, whose indices no longer apply.
    pub fn set_using_defaults(&mut self, using_defaults: bool) -> FoldStateUpdate {
        if using_defaults == self.state.using_defaults {
            return FoldStateUpdate::default();
        }

        let stop = if self.state.is_looping() {
            self.navigator.stop_loop()
        } else {
            FoldStateUpdate::default()
        };
        self.state.apply(&stop);

        self.steps = self.cache.get(using_defaults).clone();
        let mut update = revalidate(&self.state, self.steps.len());
        update.using_defaults = Some(using_defaults);
        update.repeat = stop.repeat;

        tracing::debug!(
            fold = %self.name,
            using_defaults,
            steps = self.steps.len(),
            "step array regenerated"
        );
        self.commit(update)
    }

    /// Description of the step about to be taken.
    pub fn current_description(&self) -> Option<&str> {
        let next = self.state.next_step()?;
        let entry = self.steps.get(next)?;
        description_at(self.cache.tree(), &entry.path)
    }

    pub fn description_for(&self, path: &StepPath) -> Option<&str> {
        description_at(self.cache.tree(), path)
    }

    pub fn highlights(&self) -> Vec<NodeHighlight> {
        classify(self.cache.tree(), &self.steps, self.state.step_idx)
    }

    fn commit(&mut self, update: FoldStateUpdate) -> FoldStateUpdate {
        self.state.apply(&update);
        update
    }
}
