use std::hash::{DefaultHasher, Hash, Hasher};

use indexmap::IndexMap;

use crate::{CallingContext, ContextId, Gate, GateId, Wire, WireId};

/// The wires of a netlist, addressed by id and kept in allocation order.
#[derive(Debug, Clone, Default)]
pub struct WireArena {
    wires: IndexMap<WireId, Wire>,
}

impl WireArena {
    pub fn insert(&mut self, wire: Wire) {
        self.wires.insert(wire.id, wire);
    }

    pub fn get(&self, id: WireId) -> Option<&Wire> {
        self.wires.get(&id)
    }

    pub fn get_mut(&mut self, id: WireId) -> Option<&mut Wire> {
        self.wires.get_mut(&id)
    }

    /// Wires that were never allocated read as unpowered.
    pub fn is_powered(&self, id: WireId) -> bool {
        self.wires.get(&id).is_some_and(|wire| wire.powered)
    }

    pub fn set_powered(&mut self, id: WireId, powered: bool) {
        if let Some(wire) = self.wires.get_mut(&id) {
            wire.powered = powered;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Wire> {
        self.wires.values()
    }

    pub fn len(&self) -> usize {
        self.wires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    /// Hash of every wire's `(id, powered)` pair; equal hashes across a simulation round mean a fixed point.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for wire in self.wires.values() {
            (wire.id, wire.powered).hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl FromIterator<Wire> for WireArena {
    fn from_iter<T: IntoIterator<Item = Wire>>(iter: T) -> Self {
        let mut arena = WireArena::default();
        for wire in iter {
            arena.insert(wire);
        }
        arena
    }
}

/// A compiled graph of gates connected by wires, together with the call tree that produced it.
#[derive(Debug, Clone, Default)]
pub struct Netlist {
    wires: WireArena,
    gates: Vec<Gate>,
    contexts: Vec<CallingContext>,
    outputs: Vec<WireId>,
}

impl Netlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a netlist from externally supplied gates and wires without touching their back-references.
    pub fn from_parts(gates: Vec<Gate>, wires: Vec<Wire>) -> Self {
        Self { wires: wires.into_iter().collect(), gates, contexts: Vec::new(), outputs: Vec::new() }
    }

    pub fn into_parts(self) -> (Vec<Gate>, Vec<Wire>) {
        (self.gates, self.wires.wires.into_values().collect())
    }

    pub fn add_wire(&mut self, wire: Wire) -> WireId {
        let id = wire.id;
        self.wires.insert(wire);
        id
    }

    pub fn add_gate(&mut self, gate: Gate) -> GateId {
        let id = gate.id;
        for &input in &gate.inputs {
            if let Some(wire) = self.wires.get_mut(input) {
                wire.end = Some(id);
            }
        }
        for &output in &gate.outputs {
            if let Some(wire) = self.wires.get_mut(output) {
                wire.start.get_or_insert(id);
            }
        }
        self.gates.push(gate);
        id
    }

    pub fn add_context(&mut self, context: CallingContext) {
        self.contexts.push(context);
    }

    pub fn set_outputs(&mut self, outputs: Vec<WireId>) {
        self.outputs = outputs;
    }

    pub fn wires(&self) -> &WireArena {
        &self.wires
    }

    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.get(id)
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn gates_mut(&mut self) -> &mut [Gate] {
        &mut self.gates
    }

    /// Borrows the gates and the wires independently, as simulation needs both at once.
    pub fn split_mut(&mut self) -> (&mut [Gate], &mut WireArena) {
        (&mut self.gates, &mut self.wires)
    }

    pub fn contexts(&self) -> &[CallingContext] {
        &self.contexts
    }

    pub fn context(&self, id: ContextId) -> Option<&CallingContext> {
        self.contexts.iter().find(|context| context.id == id)
    }

    pub fn outputs(&self) -> &[WireId] {
        &self.outputs
    }

    pub fn is_powered(&self, id: WireId) -> bool {
        self.wires.is_powered(id)
    }

    pub fn set_powered(&mut self, id: WireId, powered: bool) {
        self.wires.set_powered(id, powered)
    }

    /// Gates that list `wire` among their outputs, in emission order.
    pub fn drivers(&self, wire: WireId) -> impl Iterator<Item = &Gate> {
        self.gates.iter().filter(move |gate| gate.outputs.contains(&wire))
    }

    /// Replaces every reference to `from` in every gate's inputs and outputs with `to`.
    ///
    /// This is how re-binding a variable turns into feedback: gates emitted before the new binding existed are
    /// reconnected to it. Returns the number of references that were rewritten.
    pub fn replace_wire(&mut self, from: WireId, to: WireId) -> usize {
        let mut count = 0;
        for gate in &mut self.gates {
            gate.visit_mut(|wire| {
                if *wire == from {
                    *wire = to;
                    count += 1;
                }
            });
        }
        count
    }

    /// Fills in every context's children from the parent links of all other contexts.
    pub fn link_contexts(&mut self) {
        for context in &mut self.contexts {
            context.children.clear();
        }
        let links: Vec<(ContextId, ContextId)> =
            self.contexts.iter().filter(|context| !context.parent.is_root()).map(|c| (c.parent, c.id)).collect();
        for (parent, child) in links {
            if let Some(context) = self.contexts.iter_mut().find(|context| context.id == parent) {
                context.children.push(child);
            }
        }
    }
}
