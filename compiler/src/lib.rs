//! Compiles a Lovelace token tree into a [`Netlist`].
//!
//! Blocks are inlined at every invocation. Each invocation gets its own scope frame and [`CallingContext`], and
//! re-assigning a variable rewires every gate emitted so far, which is how feedback loops such as latches arise.
//!
//! [`Netlist`]: lovelace_netlist::Netlist
//! [`CallingContext`]: lovelace_netlist::CallingContext

mod error;
mod scope;
mod compiler;

pub use error::{CompileError, Error};
pub use compiler::{compile, compile_with, run_string, CompileOptions, Options};
