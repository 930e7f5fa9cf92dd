use tracing::debug;

use crate::token::{Token, scan};
use crate::{Block, Category, ImportError, Node, NodeKind, Side, TokenKind, TokenizeError, ValidationError, stdlib};

const RESERVED_WORDS: [&str; 3] = ["let", "block", "return"];

/// Characters of remaining input quoted when no token matches.
const EXCERPT_LEN: usize = 30;

#[derive(Debug, Clone, Default)]
pub struct TokenizerOptions {
    /// Reject every import that is not a standard library collection with a server-specific error.
    pub server_mode: bool,
}

struct Frame {
    /// `None` for the root of the program.
    opener: Option<Node>,
    children: Vec<Node>,
}

struct Tokenizer<'a> {
    source: &'a str,
    offset: usize,
    row: usize,
    col: usize,
    options: &'a TokenizerOptions,
    frames: Vec<Frame>,
}

pub fn tokenize(source: &str) -> Result<Vec<Node>, TokenizeError> {
    tokenize_with(source, &TokenizerOptions::default())
}

pub fn tokenize_with(source: &str, options: &TokenizerOptions) -> Result<Vec<Node>, TokenizeError> {
    let tokenizer = Tokenizer {
        source,
        offset: 0,
        row: 1,
        col: 1,
        options,
        frames: vec![Frame { opener: None, children: Vec::new() }],
    };
    tokenizer.run()
}

fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

impl<'a> Tokenizer<'a> {
    fn run(mut self) -> Result<Vec<Node>, TokenizeError> {
        loop {
            self.skip_whitespace();
            let rest = &self.source[self.offset..];
            if rest.is_empty() {
                break;
            }
            let Some((token, len)) = scan(rest) else {
                let excerpt = rest.chars().take(EXCERPT_LEN).collect();
                return Err(TokenizeError::NoMatch { row: self.row, col: self.col, excerpt });
            };
            if cfg!(feature = "trace") {
                tracing::trace!(token = %token.kind(), row = self.row, col = self.col, "matched");
            }
            self.process(token)?;
            self.advance(len);
        }

        if self.frames.len() > 1 {
            return Err(TokenizeError::Unclosed { extra: self.frames.len() - 1 });
        }
        let nodes = self.frames.pop().map(|frame| frame.children).unwrap_or_default();
        for node in &nodes {
            if let Err(reason) = validate_operands(node) {
                return Err(TokenizeError::Validation { row: self.row, col: self.col, reason });
            }
        }
        debug!(nodes = nodes.len(), "tokenized");
        Ok(nodes)
    }

    fn skip_whitespace(&mut self) {
        for byte in self.source[self.offset..].bytes() {
            match byte {
                b' ' | b'\t' => self.row += 1,
                b'\n' => {
                    self.col += 1;
                    self.row = 1;
                }
                b'\r' => (),
                _ => break,
            }
            self.offset += 1;
        }
    }

    fn advance(&mut self, len: usize) {
        for byte in self.source[self.offset..self.offset + len].bytes() {
            self.row += 1;
            if byte == b'\n' {
                self.col += 1;
                self.row = 0;
            }
        }
        self.offset += len;
    }

    fn current(&mut self) -> &mut Vec<Node> {
        let index = self.frames.len() - 1;
        &mut self.frames[index].children
    }

    fn process(&mut self, token: Token) -> Result<(), TokenizeError> {
        let (row, col) = (self.row, self.col);
        let kind = token.kind();
        match kind.category() {
            Category::Single => {
                if let Some(leaf) = node_kind(token) {
                    self.current().push(Node::new(leaf, row, col));
                }
            }
            Category::UnaryOperator => self.current().push(Node::new(NodeKind::Not { rhs: None }, row, col)),
            Category::BinaryOperator => {
                let children = self.current();
                let lhs = match children.last() {
                    Some(node) if node.is_expression() => children.pop(),
                    _ => None,
                };
                let Some(lhs) = lhs else {
                    return Err(TokenizeError::MissingLeftOperand { token: kind, row, col });
                };
                let lhs = Box::new(lhs);
                let node = match kind {
                    TokenKind::And => NodeKind::And { lhs, rhs: None },
                    _ => NodeKind::Or { lhs, rhs: None },
                };
                children.push(Node::new(node, row, col));
            }
            Category::WrapperStart => {
                let opener = node_kind(token).map(|opener| Node::new(opener, row, col));
                self.frames.push(Frame { opener, children: Vec::new() });
            }
            Category::WrapperEnd => self.close(kind, row, col)?,
        }

        if let Err(reason) = validate_children(self.current()) {
            return Err(TokenizeError::Validation { row, col, reason });
        }

        match kind {
            TokenKind::Group => self.promote_invocation(),
            TokenKind::BlockEnd => count_block_outputs(self.current()),
            TokenKind::Import => self.splice_import(row, col)?,
            _ => (),
        }

        bind_trailing_operand(self.current());
        Ok(())
    }

    fn close(&mut self, kind: TokenKind, row: usize, col: usize) -> Result<(), TokenizeError> {
        if self.frames.len() < 2 {
            return Err(TokenizeError::UnopenedWrapper { row, col });
        }
        let Some(Frame { opener: Some(mut opener), children }) = self.frames.pop() else {
            return Err(TokenizeError::UnopenedWrapper { row, col });
        };
        let open = match opener.kind {
            NodeKind::Block(_) => TokenKind::Block,
            _ => TokenKind::Group,
        };
        let expected = match kind {
            TokenKind::BlockEnd => TokenKind::Block,
            _ => TokenKind::Group,
        };
        if open != expected {
            return Err(TokenizeError::MismatchedWrapper { row, col, found: kind, open });
        }
        if let Some(slot) = opener.children_mut() {
            *slot = children;
        }
        self.current().push(opener);
        Ok(())
    }

    /// `name(` opens an invocation rather than a group.
    fn promote_invocation(&mut self) {
        let [.., parent, frame] = self.frames.as_mut_slice() else { return };
        let Some(Node { kind: NodeKind::Identifier(_), .. }) = parent.children.last() else { return };
        let Some(Node { kind: NodeKind::Identifier(name), row, col }) = parent.children.pop() else { return };
        if let Some(opener) = &mut frame.opener {
            *opener = Node::new(NodeKind::Invocation { name, args: Vec::new() }, row, col);
        }
    }

    /// Replaces the `IMPORT` node just appended with the tokenized collection it names.
    fn splice_import(&mut self, row: usize, col: usize) -> Result<(), TokenizeError> {
        let Some(Node { kind: NodeKind::Import { path }, .. }) = self.current().pop() else { return Ok(()) };
        let nodes = self.import(&path, row, col)?;
        self.current().extend(nodes);
        Ok(())
    }

    fn import(&self, path: &str, row: usize, col: usize) -> Result<Vec<Node>, TokenizeError> {
        let error = |reason| TokenizeError::Import { row, col, path: path.to_owned(), reason };
        if !stdlib::is_library_name(path) {
            return Err(error(match self.options.server_mode {
                true => ImportError::ServerLocalPath,
                false => ImportError::LocalPath,
            }));
        }
        let Some(source) = stdlib::lookup(path) else {
            return Err(error(ImportError::UnknownCollection));
        };
        debug!(collection = path, "importing standard library");
        tokenize_with(source, self.options).map_err(|inner| error(ImportError::Library(Box::new(inner))))
    }
}

/// The payload of tokens that stand as nodes of their own; operators and closing brackets have none.
fn node_kind(token: Token) -> Option<NodeKind> {
    Some(match token {
        Token::Comment { text, multiline } => NodeKind::Comment { text, multiline },
        Token::Group => NodeKind::Group(Vec::new()),
        Token::Block { name, params } => NodeKind::Block(Block { name, params, outputs: 0, body: Vec::new() }),
        Token::Return => NodeKind::Return,
        Token::Import(path) => NodeKind::Import { path },
        Token::Assignment(names) => NodeKind::Assignment { names },
        Token::Identifier(name) => NodeKind::Identifier(name),
        Token::Bool(value) => NodeKind::Bool(value),
        Token::And | Token::Or | Token::Not | Token::GroupEnd | Token::BlockEnd => return None,
    })
}

/// Checks run after every token over the list it was appended to.
fn validate_children(children: &[Node]) -> Result<(), ValidationError> {
    let mut after_return = false;
    for node in children {
        match &node.kind {
            NodeKind::Identifier(name) if is_reserved(name) => {
                return Err(ValidationError::ReservedIdentifier(name.clone()));
            }
            NodeKind::Assignment { names } => {
                if let Some(name) = names.iter().find(|name| is_reserved(name)) {
                    return Err(ValidationError::ReservedAssignment(name.clone()));
                }
            }
            _ => (),
        }
        if after_return && !node.is_expression() {
            return Err(ValidationError::NonExpressionAfterReturn(node.token()));
        }
        if node.kind == NodeKind::Return {
            after_return = true;
        }
    }
    Ok(())
}

fn validate_operands(node: &Node) -> Result<(), ValidationError> {
    let check = |operand: Option<&Node>, side: Side| match operand {
        Some(operand) if operand.is_expression() => Ok(()),
        _ => Err(ValidationError::MissingOperand { token: node.token(), side }),
    };
    match &node.kind {
        NodeKind::And { lhs, rhs } | NodeKind::Or { lhs, rhs } => {
            check(Some(&**lhs), Side::Left)?;
            check(rhs.as_deref(), Side::Right)
        }
        NodeKind::Not { rhs } => check(rhs.as_deref(), Side::Right),
        _ => Ok(()),
    }
}

/// A block's output count is the number of nodes following its `return`.
fn count_block_outputs(children: &mut [Node]) {
    let Some(Node { kind: NodeKind::Block(block), .. }) = children.last_mut() else { return };
    block.outputs = match block.body.iter().position(|node| node.kind == NodeKind::Return) {
        Some(index) => block.body.len() - index - 1,
        None => 0,
    };
}

/// Moves a just-appended expression into the operator before it, if that operator is still waiting for one.
fn bind_trailing_operand(children: &mut Vec<Node>) {
    let [.., operator, operand] = children.as_slice() else { return };
    if !operand.is_expression() || !operator.awaits_operand() {
        return;
    }
    if let Some(operand) = children.pop() {
        if let Some(operator) = children.last_mut() {
            operator.bind_operand(operand);
        }
    }
}
