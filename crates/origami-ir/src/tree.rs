use crate::path::StepPath;
use crate::types::InstructionNode;

/// Depth of an instruction tree.
///
/// 0 for a missing tree or a malformed node, 1 for a leaf.
pub fn depth_of(tree: Option<&InstructionNode>) -> usize {
    let Some(node) = tree else {
        return 0;
    };
    if node.is_malformed() {
        return 0;
    }
    match node {
        InstructionNode::Leaf { .. } => 1,
        InstructionNode::Branch { children, .. } => {
            1 + children
                .iter()
                .map(|child| depth_of(Some(child)))
                .max()
                .unwrap_or(0)
        }
    }
}

/// Follow child indices from `tree`. Returns `None` when a step of the
/// path has no matching child.
pub fn node_at<'a>(tree: &'a InstructionNode, indices: &[u32]) -> Option<&'a InstructionNode> {
    match indices.split_first() {
        None => Some(tree),
        Some((&first, rest)) => {
            let child = tree.children().get(first as usize)?;
            node_at(child, rest)
        }
    }
}

/// Look up the node a full step path points at (root component included).
pub fn node_at_path<'a>(tree: &'a InstructionNode, path: &StepPath) -> Option<&'a InstructionNode> {
    if path.indices().first() != Some(&0) {
        return None;
    }
    node_at(tree, path.without_root())
}

/// Description of the node at `path`, for the presentation layer.
pub fn description_at<'a>(tree: &'a InstructionNode, path: &StepPath) -> Option<&'a str> {
    node_at_path(tree, path).map(InstructionNode::description)
}

/// Number of leaf command groups in the tree.
pub fn count_leaves(tree: &InstructionNode) -> usize {
    match tree {
        InstructionNode::Leaf { commands, .. } => usize::from(!commands.is_empty()),
        InstructionNode::Branch { children, .. } => children.iter().map(count_leaves).sum(),
    }
}

/// Number of raw commands in the tree.
pub fn count_commands(tree: &InstructionNode) -> usize {
    match tree {
        InstructionNode::Leaf { commands, .. } => commands.len(),
        InstructionNode::Branch { children, .. } => children.iter().map(count_commands).sum(),
    }
}
