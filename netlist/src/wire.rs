use crate::{GateId, WireId};

/// A boolean signal shared by every gate that references its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wire {
    pub id: WireId,
    pub desc: Option<String>,
    /// Gate that first drove this wire. Informational only.
    pub start: Option<GateId>,
    /// Last gate that consumed this wire. Informational only.
    pub end: Option<GateId>,
    pub powered: bool,
}

impl Wire {
    pub fn new(id: WireId) -> Self {
        Self { id, desc: None, start: None, end: None, powered: false }
    }
}
