use indexmap::IndexMap;
use lovelace_netlist::{ContextId, WireId};
use lovelace_syntax::Block;

/// A block definition visible from a scope.
pub(crate) struct BlockDef<'n> {
    pub(crate) block: &'n Block,
    /// Distinguishes the labels of repeated invocations.
    pub(crate) invocations: usize,
}

/// One frame of the scope stack: the top level, or one block invocation.
pub(crate) struct Scope<'n> {
    pub(crate) id: ContextId,
    pub(crate) variables: IndexMap<String, WireId>,
    pub(crate) blocks: Vec<BlockDef<'n>>,
    /// The block being expanded in this frame, which `return` consults for its arity.
    pub(crate) enclosing: Option<&'n Block>,
}

impl<'n> Scope<'n> {
    pub(crate) fn root() -> Self {
        Self::new(ContextId::ROOT, IndexMap::new(), None)
    }

    pub(crate) fn new(id: ContextId, variables: IndexMap<String, WireId>, enclosing: Option<&'n Block>) -> Self {
        Self { id, variables, blocks: Vec::new(), enclosing }
    }
}

/// Innermost binding of `name`, searching from the top of the stack down.
pub(crate) fn lookup_variable(scopes: &[Scope<'_>], name: &str) -> Option<WireId> {
    scopes.iter().rev().find_map(|scope| scope.variables.get(name).copied())
}

/// Position of the innermost scope's first definition of block `name` as `(scope, block)` indices.
pub(crate) fn lookup_block(scopes: &[Scope<'_>], name: &str) -> Option<(usize, usize)> {
    scopes.iter().enumerate().rev().find_map(|(scope_index, scope)| {
        let block_index = scope.blocks.iter().position(|def| def.block.name == name)?;
        Some((scope_index, block_index))
    })
}
