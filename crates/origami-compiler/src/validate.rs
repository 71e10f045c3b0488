use origami_ir::{InstructionNode, StepPath};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Malformed node at '{path}': no children and no commands")]
    MalformedNode { path: StepPath },

    #[error("Missing description at '{path}': the step has nothing to show")]
    EmptyDescription { path: StepPath },
}

/// Check an instruction tree for authoring mistakes.
///
/// None of these stop a fold from loading; flattening tolerates them.
pub fn validate_tree(tree: &InstructionNode) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_node(tree, StepPath::root(), &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_node(node: &InstructionNode, path: StepPath, errors: &mut Vec<ValidationError>) {
    if node.is_malformed() {
        errors.push(ValidationError::MalformedNode { path });
        return;
    }
    if node.description().trim().is_empty() {
        errors.push(ValidationError::EmptyDescription { path: path.clone() });
    }
    for (i, child) in node.children().iter().enumerate() {
        check_node(child, path.child(i as u32), errors);
    }
}
