use serde::{Deserialize, Serialize};

/// A fold definition: one origami model and its instruction tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub instructions: InstructionNode,
}

// ── Commands ─────────────────────────────────────────────────────────

/// An opaque, array-like folding command. The engine never looks inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Command(pub Vec<serde_json::Value>);

impl Command {
    pub fn new(values: Vec<serde_json::Value>) -> Self {
        Self(values)
    }
}

// ── Instruction tree ─────────────────────────────────────────────────

/// A node in the instruction tree.
///
/// In the JSON form a node is `{"description", "isDefaultCollapsible",
/// "children"}` and is a leaf iff its first child is an array (a raw
/// command). That distinction is resolved here, once, at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub enum InstructionNode {
    Leaf {
        description: String,
        commands: Vec<Command>,
    },
    Branch {
        description: String,
        default_collapsible: bool,
        children: Vec<InstructionNode>,
    },
}

impl InstructionNode {
    pub fn leaf(description: impl Into<String>, commands: Vec<Command>) -> Self {
        Self::Leaf {
            description: description.into(),
            commands,
        }
    }

    pub fn branch(description: impl Into<String>, children: Vec<InstructionNode>) -> Self {
        Self::Branch {
            description: description.into(),
            default_collapsible: false,
            children,
        }
    }

    /// A branch that collapses into one step when defaults are in use.
    pub fn collapsible(description: impl Into<String>, children: Vec<InstructionNode>) -> Self {
        Self::Branch {
            description: description.into(),
            default_collapsible: true,
            children,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Leaf { description, .. } | Self::Branch { description, .. } => description,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    pub fn is_default_collapsible(&self) -> bool {
        matches!(
            self,
            Self::Branch {
                default_collapsible: true,
                ..
            }
        )
    }

    /// A node with neither sub-nodes nor commands.
    pub fn is_malformed(&self) -> bool {
        match self {
            Self::Leaf { commands, .. } => commands.is_empty(),
            Self::Branch { children, .. } => children.is_empty(),
        }
    }

    /// Sub-nodes of a branch. Empty for leaves.
    pub fn children(&self) -> &[InstructionNode] {
        match self {
            Self::Leaf { .. } => &[],
            Self::Branch { children, .. } => children,
        }
    }

    /// Commands of a leaf. Empty for branches.
    pub fn commands(&self) -> &[Command] {
        match self {
            Self::Leaf { commands, .. } => commands,
            Self::Branch { .. } => &[],
        }
    }
}

// ── JSON shape ───────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum NodeShapeError {
    #[error("node '{description}': child {index} is an object but earlier children are commands")]
    NodeAmongCommands { description: String, index: usize },

    #[error("node '{description}': child {index} is a command but earlier children are nodes")]
    CommandAmongNodes { description: String, index: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawNode {
    #[serde(default)]
    description: String,
    #[serde(default, rename = "isDefaultCollapsible")]
    default_collapsible: bool,
    #[serde(default)]
    children: Vec<RawChild>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawChild {
    Command(Command),
    Node(Box<RawNode>),
}

impl TryFrom<RawNode> for InstructionNode {
    type Error = NodeShapeError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let is_leaf = matches!(raw.children.first(), Some(RawChild::Command(_)));

        if is_leaf {
            let mut commands = Vec::with_capacity(raw.children.len());
            for (index, child) in raw.children.into_iter().enumerate() {
                match child {
                    RawChild::Command(command) => commands.push(command),
                    RawChild::Node(_) => {
                        return Err(NodeShapeError::NodeAmongCommands {
                            description: raw.description,
                            index,
                        })
                    }
                }
            }
            return Ok(Self::Leaf {
                description: raw.description,
                commands,
            });
        }

        let mut children = Vec::with_capacity(raw.children.len());
        for (index, child) in raw.children.into_iter().enumerate() {
            match child {
                RawChild::Node(node) => children.push(InstructionNode::try_from(*node)?),
                RawChild::Command(_) => {
                    return Err(NodeShapeError::CommandAmongNodes {
                        description: raw.description,
                        index,
                    })
                }
            }
        }
        Ok(Self::Branch {
            description: raw.description,
            default_collapsible: raw.default_collapsible,
            children,
        })
    }
}

impl From<InstructionNode> for RawNode {
    fn from(node: InstructionNode) -> Self {
        match node {
            InstructionNode::Leaf {
                description,
                commands,
            } => RawNode {
                description,
                default_collapsible: false,
                children: commands.into_iter().map(RawChild::Command).collect(),
            },
            InstructionNode::Branch {
                description,
                default_collapsible,
                children,
            } => RawNode {
                description,
                default_collapsible,
                children: children
                    .into_iter()
                    .map(|child| RawChild::Node(Box::new(child.into())))
                    .collect(),
            },
        }
    }
}
