//! Per-node render classification for the instruction tree.

use std::collections::HashSet;

use origami_compiler::StepArray;
use origami_ir::tree::depth_of;
use origami_ir::{InstructionNode, StepPath};
use serde::Serialize;

use crate::state::StepIdx;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HighlightKind {
    /// The next action to be taken (step `step_idx + 1`).
    Active,
    /// Part of the current step array.
    InUse,
    /// Collapsed away or purely structural.
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeHighlight {
    pub path: StepPath,
    pub kind: HighlightKind,
    /// The node is itself an entry of the step array.
    pub addressable: bool,
    /// The node sits inside a subtree collapsed into one step.
    pub below_collapsed: bool,
}

/// Classify every node of `tree`, in pre-order.
pub fn classify(tree: &InstructionNode, steps: &StepArray, step_idx: StepIdx) -> Vec<NodeHighlight> {
    let step_paths: HashSet<&StepPath> = steps.iter().map(|entry| &entry.path).collect();
    let active = steps.get_signed(step_idx + 1).map(|entry| &entry.path);

    let mut classifier = Classifier {
        step_paths,
        active,
        limit: depth_of(Some(tree)),
        out: Vec::new(),
    };
    classifier.walk(tree, StepPath::root(), 1, false);
    classifier.out
}

struct Classifier<'a> {
    step_paths: HashSet<&'a StepPath>,
    active: Option<&'a StepPath>,
    limit: usize,
    out: Vec<NodeHighlight>,
}

impl Classifier<'_> {
    fn walk(&mut self, node: &InstructionNode, path: StepPath, depth: usize, below_collapsed: bool) {
        if depth > self.limit {
            return;
        }

        let addressable = !below_collapsed && self.step_paths.contains(&path);
        let kind = if self.active == Some(&path) {
            HighlightKind::Active
        } else if addressable || (below_collapsed && node.is_leaf()) {
            HighlightKind::InUse
        } else {
            HighlightKind::Default
        };
        // An addressable branch can only be a collapsed default.
        let children_below = below_collapsed || (addressable && !node.is_leaf());

        self.out.push(NodeHighlight {
            path: path.clone(),
            kind,
            addressable,
            below_collapsed,
        });

        for (i, child) in node.children().iter().enumerate() {
            self.walk(child, path.child(i as u32), depth + 1, children_below);
        }
    }
}
