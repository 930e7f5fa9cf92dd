//! Tokenizer for the Lovelace hardware description language.
//!
//! The tokenizer does more than split text: it builds a tree of [`Node`]s with groups, blocks and invocations
//! already nested, binds operator operands, splices in standard library imports, and rejects several structural
//! mistakes before the compiler ever sees the program.

mod node;
mod error;
mod token;
mod tokenizer;
mod print;
pub mod stdlib;

pub use node::{Node, NodeKind, Block, TokenKind, Category};
pub use error::{TokenizeError, ValidationError, ImportError, Side};
pub use tokenizer::{tokenize, tokenize_with, TokenizerOptions};
pub use print::print_tree;
