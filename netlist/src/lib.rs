//! This library provides the in-memory form of a compiled Lovelace program.
//!
//! A [`Netlist`] is an arena of [`Wire`]s and a list of [`Gate`]s that refer to wires by [`WireId`]. Wires are
//! shared by every gate that mentions them, so rewiring is a scan over ids rather than a pointer update. The
//! [`CallingContext`]s record which block invocation each gate was emitted by.

mod id;
mod wire;
mod gate;
mod context;
mod netlist;
mod print;

pub use id::{WireId, GateId, ContextId};
pub use wire::Wire;
pub use gate::{Gate, GateKind, Builtin, UnknownGateKind};
pub use context::CallingContext;
pub use netlist::{Netlist, WireArena};
