use std::sync::Arc;

use origami_ir::InstructionNode;

use crate::flatten::{flatten, StepArray};

/// Step arrays for one tree, computed lazily per collapsing mode.
///
/// Swapping in a different tree (by identity) drops both cached arrays.
#[derive(Debug, Clone)]
pub struct StepCache {
    tree: Arc<InstructionNode>,
    expanded: Option<StepArray>,
    collapsed: Option<StepArray>,
}

impl StepCache {
    pub fn new(tree: Arc<InstructionNode>) -> Self {
        Self {
            tree,
            expanded: None,
            collapsed: None,
        }
    }

    pub fn tree(&self) -> &Arc<InstructionNode> {
        &self.tree
    }

    /// Replace the tree. Returns true if the cache was invalidated.
    pub fn set_tree(&mut self, tree: Arc<InstructionNode>) -> bool {
        if Arc::ptr_eq(&self.tree, &tree) {
            return false;
        }
        self.tree = tree;
        self.invalidate();
        true
    }

    pub fn invalidate(&mut self) {
        self.expanded = None;
        self.collapsed = None;
    }

    pub fn is_cached(&self, using_defaults: bool) -> bool {
        if using_defaults {
            self.collapsed.is_some()
        } else {
            self.expanded.is_some()
        }
    }

    pub fn get(&mut self, using_defaults: bool) -> &StepArray {
        let tree = &self.tree;
        let slot = if using_defaults {
            &mut self.collapsed
        } else {
            &mut self.expanded
        };
        slot.get_or_insert_with(|| flatten(tree, using_defaults))
    }
}
