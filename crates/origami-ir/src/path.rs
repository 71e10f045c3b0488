//! Step paths: the address of a node in the instruction tree.
//!
//! A path is the sequence of child indices from the root, with the root
//! itself at `[0]`. Child 2 of the root is `[0, 2]`. The comma-delimited
//! string form (`"0,2"`) only exists at the edges, for display and for
//! paths handed in from the outside.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const DELIMITER: char = ',';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathParseError {
    Empty,
    InvalidSegment { position: usize, segment: String },
}

impl fmt::Display for PathParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty step path"),
            Self::InvalidSegment { position, segment } => {
                write!(f, "invalid path segment {position}: '{segment}'")
            }
        }
    }
}

impl std::error::Error for PathParseError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StepPath(Vec<u32>);

impl StepPath {
    pub fn root() -> Self {
        Self(vec![0])
    }

    pub fn from_indices(indices: Vec<u32>) -> Self {
        Self(indices)
    }

    pub fn child(&self, index: u32) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }

    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    /// Child indices below the root, suitable for `tree::node_at`.
    pub fn without_root(&self) -> &[u32] {
        self.0.get(1..).unwrap_or(&[])
    }

    /// Number of components. The root has depth 1.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// True if `self` is `other` or one of its ancestors.
    ///
    /// Component-wise, so `0,1` is not an ancestor of `0,10`.
    pub fn is_ancestor_or_self(&self, other: &StepPath) -> bool {
        other.0.starts_with(&self.0)
    }

    /// True if either path is an ancestor of (or equal to) the other.
    pub fn is_related(&self, other: &StepPath) -> bool {
        self.is_ancestor_or_self(other) || other.is_ancestor_or_self(self)
    }
}

impl fmt::Display for StepPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{DELIMITER}")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

impl FromStr for StepPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(PathParseError::Empty);
        }
        s.split(DELIMITER)
            .enumerate()
            .map(|(position, segment)| {
                segment
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| PathParseError::InvalidSegment {
                        position,
                        segment: segment.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl TryFrom<String> for StepPath {
    type Error = PathParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<StepPath> for String {
    fn from(path: StepPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let path = StepPath::root().child(2).child(11);
        assert_eq!(path.to_string(), "0,2,11");
        assert_eq!("0,2,11".parse::<StepPath>().unwrap(), path);
    }

    #[test]
    fn test_parse_rejects_bad_segments() {
        assert_eq!("".parse::<StepPath>(), Err(PathParseError::Empty));
        assert!(matches!(
            "0,a".parse::<StepPath>(),
            Err(PathParseError::InvalidSegment { position: 1, .. })
        ));
        assert!("0,,1".parse::<StepPath>().is_err());
    }

    #[test]
    fn test_prefix_is_component_wise() {
        let a: StepPath = "0,1".parse().unwrap();
        let b: StepPath = "0,10".parse().unwrap();
        let c: StepPath = "0,1,4".parse().unwrap();
        assert!(!a.is_related(&b));
        assert!(a.is_related(&c));
        assert!(c.is_related(&a));
        assert!(a.is_related(&a));
        assert!(!c.is_ancestor_or_self(&a));
    }

    #[test]
    fn test_without_root() {
        assert!(StepPath::root().without_root().is_empty());
        assert_eq!(StepPath::root().child(3).without_root(), &[3]);
    }
}
