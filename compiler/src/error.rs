use std::fmt::Display;

use lovelace_syntax::{Side, TokenKind, TokenizeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// An operand produced zero or several values where exactly one is needed.
    Arity { token: TokenKind, side: Side, found: usize, row: usize, col: usize },
    MissingOperand { token: TokenKind, side: Side, row: usize, col: usize },
    BuiltinArity { name: String, expected: usize, found: usize, row: usize, col: usize },
    UnknownBlock { name: String, row: usize, col: usize },
    TooManyArguments { name: String, expected: usize, found: usize, row: usize, col: usize },
    DepthExceeded { name: String, limit: usize, row: usize, col: usize },
    NoEnclosingBlock { row: usize, col: usize },
    MissingReturnValues { name: String, expected: usize, found: usize, row: usize, col: usize },
    TooManyReturnValues { name: String, expected: usize, found: usize, row: usize, col: usize },
    AssignmentUnderflow { names: usize, values: usize, row: usize, col: usize },
    NotAnExpression { token: TokenKind, name: String, row: usize, col: usize },
    NoValue { row: usize, col: usize },
    UnexpectedToken { token: TokenKind, row: usize, col: usize },
}

impl Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Arity { token, side, found, row, col } => {
                let amount = if *found == 0 { "zero" } else { "multiple" };
                write!(f, "{side} hand side of {token} gate at {row}:{col} outputs {amount} values in a single value context")
            }
            CompileError::MissingOperand { token, side, row, col } => {
                write!(f, "{token} gate at {row}:{col} has no {side} hand side")
            }
            CompileError::BuiltinArity { name, expected, found, row, col } => write!(
                f,
                "the builtin {name} at {row}:{col} wasn't called with enough parameters \
                 (expected at least {expected}, was called with {found})"
            ),
            CompileError::UnknownBlock { name, row, col } => write!(
                f,
                "the invocation at {row}:{col} (trying to invoke {name}) doesn't invoke a block that can be found in \
                 the current or any parent scope"
            ),
            CompileError::TooManyArguments { name, expected, found, row, col } => write!(
                f,
                "the invocation at {row}:{col} (trying to invoke {name}) is invoking the block with too many \
                 parameters (expected {expected}, received {found})"
            ),
            CompileError::DepthExceeded { name, limit, row, col } => write!(
                f,
                "the invocation at {row}:{col} (trying to invoke {name}) has surpassed the max call depth of {limit}"
            ),
            CompileError::NoEnclosingBlock { row, col } => write!(f, "return at {row}:{col} is not inside a block"),
            CompileError::MissingReturnValues { name, expected, found, row, col } => {
                write!(f, "block {name} at {row}:{col} has too few return values, expected {expected}, got {found}")
            }
            CompileError::TooManyReturnValues { name, expected, found, row, col } => {
                write!(f, "block {name} at {row}:{col} has too many return values, expected {expected}, got {found}")
            }
            CompileError::AssignmentUnderflow { names, values, row, col } => write!(
                f,
                "assignment at {row}:{col} has more variables on the left hand side ({names}) than values on the \
                 right hand side to assign ({values})"
            ),
            CompileError::NotAnExpression { token, name, row, col } => {
                write!(f, "token at {row}:{col} assigned to variable `{name}` is not an expression (is {token})")
            }
            CompileError::NoValue { row, col } => write!(f, "expression at {row}:{col} outputs no values"),
            CompileError::UnexpectedToken { token, row, col } => write!(f, "unexpected {token} token at {row}:{col}"),
        }
    }
}

impl std::error::Error for CompileError {}

/// Failure of either stage of [`run_string`].
///
/// [`run_string`]: crate::run_string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Tokenize(TokenizeError),
    Compile(CompileError),
}

impl From<TokenizeError> for Error {
    fn from(error: TokenizeError) -> Self {
        Error::Tokenize(error)
    }
}

impl From<CompileError> for Error {
    fn from(error: CompileError) -> Self {
        Error::Compile(error)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Tokenize(error) => write!(f, "{error}"),
            Error::Compile(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Tokenize(error) => Some(error),
            Error::Compile(error) => Some(error),
        }
    }
}
