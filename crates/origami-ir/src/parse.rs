use crate::types::{FoldDefinition, InstructionNode};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn parse_fold(json: &str) -> Result<FoldDefinition, ParseError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a bare instruction tree, without the surrounding fold metadata.
pub fn parse_instructions(json: &str) -> Result<InstructionNode, ParseError> {
    Ok(serde_json::from_str(json)?)
}
