use crate::ContextId;

/// One block invocation's position in the dynamic call tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallingContext {
    pub id: ContextId,
    pub name: String,
    pub depth: usize,
    pub parent: ContextId,
    /// Filled in by [`Netlist::link_contexts`] once the whole call tree is known.
    ///
    /// [`Netlist::link_contexts`]: crate::Netlist::link_contexts
    pub children: Vec<ContextId>,
}

impl CallingContext {
    pub fn new(id: ContextId, name: impl Into<String>, depth: usize, parent: ContextId) -> Self {
        Self { id, name: name.into(), depth, parent, children: Vec::new() }
    }
}
