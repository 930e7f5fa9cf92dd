use std::fmt::{Debug, Display};

/// Identifies a [`Wire`] within one compiled netlist.
///
/// Wire identifiers are handed out in strictly increasing order by a single compile run, starting at 1.
///
/// [`Wire`]: crate::Wire
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WireId(pub u32);

/// Identifies a [`Gate`] within one compiled netlist. Allocated from a counter separate from [`WireId`].
///
/// [`Gate`]: crate::Gate
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GateId(pub u32);

/// Identifies the scope frame a gate was created in, and the [`CallingContext`] recorded for it.
///
/// [`CallingContext`]: crate::CallingContext
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ContextId(pub u32);

impl ContextId {
    /// The frame of the top-level program.
    pub const ROOT: ContextId = ContextId(0);

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

macro_rules! impl_id {
    ($ty:ident, $sigil:literal) => {
        impl From<u32> for $ty {
            fn from(value: u32) -> Self {
                $ty(value)
            }
        }

        impl From<$ty> for u32 {
            fn from(value: $ty) -> Self {
                value.0
            }
        }

        impl Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, concat!(stringify!($ty), "({})"), self.0)
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, concat!($sigil, "{}"), self.0)
            }
        }
    };
}

impl_id!(WireId, "%");
impl_id!(GateId, "#");
impl_id!(ContextId, "@");
