use std::fmt::Display;

/// How the tokenizer treats a token once it has been matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Single,
    UnaryOperator,
    BinaryOperator,
    WrapperStart,
    WrapperEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    MultiComment,
    SingleComment,
    And,
    Or,
    Not,
    Group,
    GroupEnd,
    Block,
    BlockEnd,
    Return,
    Import,
    Assignment,
    Identifier,
    Bool,
    /// Never matched directly; a `GROUP` directly after an `IDENTIFIER` becomes one.
    Invocation,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::MultiComment => "MULTI_COMMENT",
            TokenKind::SingleComment => "SINGLE_COMMENT",
            TokenKind::And => "OP_AND",
            TokenKind::Or => "OP_OR",
            TokenKind::Not => "OP_NOT",
            TokenKind::Group => "GROUP",
            TokenKind::GroupEnd => "GROUP_END",
            TokenKind::Block => "BLOCK",
            TokenKind::BlockEnd => "BLOCK_END",
            TokenKind::Return => "BLOCK_RETURN",
            TokenKind::Import => "IMPORT",
            TokenKind::Assignment => "ASSIGNMENT",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Bool => "BOOL",
            TokenKind::Invocation => "INVOCATION",
        }
    }

    pub fn category(self) -> Category {
        match self {
            TokenKind::And | TokenKind::Or => Category::BinaryOperator,
            TokenKind::Not => Category::UnaryOperator,
            TokenKind::Group | TokenKind::Block | TokenKind::Invocation => Category::WrapperStart,
            TokenKind::GroupEnd | TokenKind::BlockEnd => Category::WrapperEnd,
            _ => Category::Single,
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-defined block, expanded at every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub name: String,
    /// Formal parameters with `name[N]` already expanded.
    pub params: Vec<String>,
    /// Number of values after the `return` in the body, 0 if there is none.
    pub outputs: usize,
    pub body: Vec<Node>,
}

impl Block {
    pub fn inputs(&self) -> usize {
        self.params.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Comment { text: String, multiline: bool },
    And { lhs: Box<Node>, rhs: Option<Box<Node>> },
    Or { lhs: Box<Node>, rhs: Option<Box<Node>> },
    Not { rhs: Option<Box<Node>> },
    Group(Vec<Node>),
    Invocation { name: String, args: Vec<Node> },
    Block(Block),
    Return,
    Import { path: String },
    Assignment { names: Vec<String> },
    Identifier(String),
    Bool(bool),
}

/// An element of the token tree.
///
/// `row` counts characters along a line and `col` counts lines, both starting at 1. Diagnostics print them as
/// `row:col`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub row: usize,
    pub col: usize,
}

impl Node {
    pub fn new(kind: NodeKind, row: usize, col: usize) -> Self {
        Self { kind, row, col }
    }

    pub fn token(&self) -> TokenKind {
        match &self.kind {
            NodeKind::Comment { multiline: true, .. } => TokenKind::MultiComment,
            NodeKind::Comment { multiline: false, .. } => TokenKind::SingleComment,
            NodeKind::And { .. } => TokenKind::And,
            NodeKind::Or { .. } => TokenKind::Or,
            NodeKind::Not { .. } => TokenKind::Not,
            NodeKind::Group(_) => TokenKind::Group,
            NodeKind::Invocation { .. } => TokenKind::Invocation,
            NodeKind::Block(_) => TokenKind::Block,
            NodeKind::Return => TokenKind::Return,
            NodeKind::Import { .. } => TokenKind::Import,
            NodeKind::Assignment { .. } => TokenKind::Assignment,
            NodeKind::Identifier(_) => TokenKind::Identifier,
            NodeKind::Bool(_) => TokenKind::Bool,
        }
    }

    /// Whether this node can be an operand: a literal, a name, or a parenthesized group.
    pub fn is_expression(&self) -> bool {
        matches!(self.kind, NodeKind::Bool(_) | NodeKind::Identifier(_) | NodeKind::Group(_))
    }

    /// Whether this node produces values when compiled, which is what assignments and returns consume.
    pub fn is_extended_expression(&self) -> bool {
        self.is_expression()
            || matches!(self.kind, NodeKind::Invocation { .. } | NodeKind::And { .. } | NodeKind::Or { .. } | NodeKind::Not { .. })
    }

    /// Whether this is an operator whose right hand side has not been bound yet.
    pub fn awaits_operand(&self) -> bool {
        matches!(self.kind, NodeKind::And { rhs: None, .. } | NodeKind::Or { rhs: None, .. } | NodeKind::Not { rhs: None })
    }

    pub(crate) fn bind_operand(&mut self, operand: Node) {
        match &mut self.kind {
            NodeKind::And { rhs, .. } | NodeKind::Or { rhs, .. } | NodeKind::Not { rhs } => *rhs = Some(Box::new(operand)),
            _ => {}
        }
    }

    /// Children of a wrapper node: group members, invocation arguments, or a block body.
    pub fn children(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Group(children) | NodeKind::Invocation { args: children, .. } => Some(children),
            NodeKind::Block(block) => Some(&block.body),
            _ => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match &mut self.kind {
            NodeKind::Group(children) | NodeKind::Invocation { args: children, .. } => Some(children),
            NodeKind::Block(block) => Some(&mut block.body),
            _ => None,
        }
    }
}
