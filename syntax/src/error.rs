use std::fmt::Display;

use crate::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// A structural rule violated by the tokens accumulated so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    ReservedIdentifier(String),
    ReservedAssignment(String),
    NonExpressionAfterReturn(TokenKind),
    MissingOperand { token: TokenKind, side: Side },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::ReservedIdentifier(name) => write!(f, "identifier {name} is a reserved word"),
            ValidationError::ReservedAssignment(name) => {
                write!(f, "identifier {name} is a reserved word, and cannot be assigned to")
            }
            ValidationError::NonExpressionAfterReturn(token) => {
                write!(f, "non-expression token {token} found after return")
            }
            ValidationError::MissingOperand { token, side } => {
                write!(f, "{token} operator {side} hand side is not an expression")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// A path that is not a bare standard library name, while running as a server.
    ServerLocalPath,
    /// A path that is not a bare standard library name.
    LocalPath,
    UnknownCollection,
    Library(Box<TokenizeError>),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::ServerLocalPath => write!(f, "server cannot import local paths"),
            ImportError::LocalPath => write!(f, "import only allows including standard library collections"),
            ImportError::UnknownCollection => write!(f, "no such standard library collection"),
            ImportError::Library(error) => write!(f, "standard library collection failed to tokenize: {error}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    NoMatch { row: usize, col: usize, excerpt: String },
    MissingLeftOperand { token: TokenKind, row: usize, col: usize },
    UnopenedWrapper { row: usize, col: usize },
    MismatchedWrapper { row: usize, col: usize, found: TokenKind, open: TokenKind },
    Unclosed { extra: usize },
    Validation { row: usize, col: usize, reason: ValidationError },
    Import { row: usize, col: usize, path: String, reason: ImportError },
}

impl Display for TokenizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenizeError::NoMatch { row, col, excerpt } => write!(f, "no such token found at {row}:{col} - `{excerpt}`"),
            TokenizeError::MissingLeftOperand { token, row, col } => write!(
                f,
                "attempted to parse a binary operator ({token}), but there wasn't a valid expression before the \
                 operator at {row}:{col}"
            ),
            TokenizeError::UnopenedWrapper { row, col } => {
                write!(f, "attempted to close a wrapper that was never opened at {row}:{col}")
            }
            TokenizeError::MismatchedWrapper { row, col, found, open } => {
                write!(f, "attempted to close wrapper at {row}:{col} with a {found} token, and not a {open}_END token")
            }
            TokenizeError::Unclosed { extra } => write!(
                f,
                "stack is not empty ({extra} extra) at end of program (are there more opening brackets than closing ones?)"
            ),
            TokenizeError::Validation { row, col, reason } => write!(f, "validation failed at {row}:{col} - {reason}"),
            TokenizeError::Import { row, col, path, reason } => write!(f, "cannot import {path:?} at {row}:{col}: {reason}"),
        }
    }
}

impl std::error::Error for TokenizeError {}
