use origami_ir::tree::depth_of;
use origami_ir::FoldDefinition;

use crate::flatten::{flatten_report, FlattenIssue, StepArray};
use crate::validate::{validate_tree, ValidationError};

#[derive(Debug, Clone)]
pub struct CompiledFold {
    pub steps: StepArray,
    pub depth: usize,
    pub warnings: Vec<ValidationError>,
    pub issues: Vec<FlattenIssue>,
}

/// Validate a fold and derive its step array for the given mode.
///
/// Authoring problems are carried as warnings, never as errors.
pub fn compile(fold: &FoldDefinition, using_defaults: bool) -> CompiledFold {
    // 1. Validate
    let warnings = validate_tree(&fold.instructions).err().unwrap_or_default();
    for warning in &warnings {
        tracing::warn!(fold = %fold.name, %warning, "fold validation");
    }

    // 2. Measure
    let depth = depth_of(Some(&fold.instructions));

    // 3. Flatten
    let report = flatten_report(&fold.instructions, using_defaults);

    tracing::debug!(
        fold = %fold.name,
        depth,
        steps = report.steps.len(),
        "compiled fold"
    );

    CompiledFold {
        steps: report.steps,
        depth,
        warnings,
        issues: report.issues,
    }
}
