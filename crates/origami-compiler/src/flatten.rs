//! Step flattening: turns the instruction tree into the ordered step array.
//!
//! Depth-first, children in index order:
//! - Leaf -> one step with its commands.
//! - Collapsible branch while defaults are in use -> one step holding every
//!   command found underneath it.
//! - Any other branch -> the concatenation of its children's steps.
//!
//! Malformed nodes and nodes past the depth bound produce no steps. They are
//! reported as [`FlattenIssue`]s and logged, never returned as errors.

use origami_ir::tree::depth_of;
use origami_ir::{Command, InstructionNode, StepPath};
use serde::Serialize;

/// One addressable step: the node it came from and the commands it runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepEntry {
    pub path: StepPath,
    pub commands: Vec<Command>,
}

/// The flattened step sequence. Index 0 is the first real action.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct StepArray {
    entries: Vec<StepEntry>,
}

impl StepArray {
    pub fn new(entries: Vec<StepEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StepEntry> {
        self.entries.get(index)
    }

    /// Entry at a cursor-style signed index. `None` for `-1` and past the end.
    pub fn get_signed(&self, index: i64) -> Option<&StepEntry> {
        usize::try_from(index).ok().and_then(|i| self.entries.get(i))
    }

    pub fn entries(&self) -> &[StepEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StepEntry> {
        self.entries.iter()
    }

    pub fn total_commands(&self) -> usize {
        self.entries.iter().map(|e| e.commands.len()).sum()
    }
}

impl<'a> IntoIterator for &'a StepArray {
    type Item = &'a StepEntry;
    type IntoIter = std::slice::Iter<'a, StepEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FlattenIssue {
    #[error("malformed node at {path}: no children and no commands")]
    MalformedNode { path: StepPath },

    #[error("node at {path} is deeper than the tree depth {limit}")]
    DepthOverflow { path: StepPath, limit: usize },
}

/// Steps plus whatever was skipped on the way.
#[derive(Debug, Clone, Default)]
pub struct FlattenReport {
    pub steps: StepArray,
    pub issues: Vec<FlattenIssue>,
}

pub fn flatten(tree: &InstructionNode, using_defaults: bool) -> StepArray {
    flatten_report(tree, using_defaults).steps
}

/// Flatten with the depth bound taken from the tree itself.
pub fn flatten_report(tree: &InstructionNode, using_defaults: bool) -> FlattenReport {
    flatten_with_limit(tree, using_defaults, depth_of(Some(tree)))
}

/// Flatten, refusing to descend below `limit` levels (the root is level 1).
pub fn flatten_with_limit(
    tree: &InstructionNode,
    using_defaults: bool,
    limit: usize,
) -> FlattenReport {
    let mut flattener = Flattener {
        using_defaults,
        limit,
        entries: Vec::new(),
        issues: Vec::new(),
    };
    flattener.visit(tree, StepPath::root(), 1);

    for issue in &flattener.issues {
        tracing::warn!(%issue, "skipped node while flattening");
    }
    tracing::debug!(
        steps = flattener.entries.len(),
        using_defaults,
        "flattened instruction tree"
    );

    FlattenReport {
        steps: StepArray::new(flattener.entries),
        issues: flattener.issues,
    }
}

struct Flattener {
    using_defaults: bool,
    limit: usize,
    entries: Vec<StepEntry>,
    issues: Vec<FlattenIssue>,
}

impl Flattener {
    fn admit(&mut self, node: &InstructionNode, path: &StepPath, depth: usize) -> bool {
        if node.is_malformed() {
            self.issues
                .push(FlattenIssue::MalformedNode { path: path.clone() });
            return false;
        }
        if depth > self.limit {
            self.issues.push(FlattenIssue::DepthOverflow {
                path: path.clone(),
                limit: self.limit,
            });
            return false;
        }
        true
    }

    fn visit(&mut self, node: &InstructionNode, path: StepPath, depth: usize) {
        if !self.admit(node, &path, depth) {
            return;
        }

        match node {
            InstructionNode::Leaf { commands, .. } => {
                self.entries.push(StepEntry {
                    path,
                    commands: commands.clone(),
                });
            }
            InstructionNode::Branch {
                default_collapsible: true,
                ..
            } if self.using_defaults => {
                let mut commands = Vec::new();
                self.collect(node, &path, depth, &mut commands);
                if !commands.is_empty() {
                    self.entries.push(StepEntry { path, commands });
                }
            }
            InstructionNode::Branch { children, .. } => {
                for (i, child) in children.iter().enumerate() {
                    self.visit(child, path.child(i as u32), depth + 1);
                }
            }
        }
    }

    /// Gather every leaf's commands under `node`, in depth-first order.
    fn collect(
        &mut self,
        node: &InstructionNode,
        path: &StepPath,
        depth: usize,
        out: &mut Vec<Command>,
    ) {
        match node {
            InstructionNode::Leaf { commands, .. } => out.extend(commands.iter().cloned()),
            InstructionNode::Branch { children, .. } => {
                for (i, child) in children.iter().enumerate() {
                    let child_path = path.child(i as u32);
                    if self.admit(child, &child_path, depth + 1) {
                        self.collect(child, &child_path, depth + 1, out);
                    }
                }
            }
        }
    }
}
