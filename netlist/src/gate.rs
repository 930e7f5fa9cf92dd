use std::fmt::Display;
use std::str::FromStr;

use crate::{ContextId, GateId, WireId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    And,
    Or,
    Not,
    Source,
    Ground,
    BlockInput,
    BlockOutput,
    /// A stateful primitive; the concrete [`Builtin`] is named by the gate label.
    Builtin,
}

impl GateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Not => "NOT",
            GateKind::Source => "SOURCE",
            GateKind::Ground => "GROUND",
            GateKind::BlockInput => "BLOCK_INPUT",
            GateKind::BlockOutput => "BLOCK_OUTPUT",
            GateKind::Builtin => "BUILTIN_FUNCTION",
        }
    }
}

impl Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGateKind(pub String);

impl Display for UnknownGateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown gate type {:?}", self.0)
    }
}

impl std::error::Error for UnknownGateKind {}

impl FromStr for GateKind {
    type Err = UnknownGateKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "AND" => GateKind::And,
            "OR" => GateKind::Or,
            "NOT" => GateKind::Not,
            "SOURCE" => GateKind::Source,
            "GROUND" => GateKind::Ground,
            "BLOCK_INPUT" => GateKind::BlockInput,
            "BLOCK_OUTPUT" => GateKind::BlockOutput,
            "BUILTIN_FUNCTION" => GateKind::Builtin,
            _ => return Err(UnknownGateKind(s.to_owned())),
        })
    }
}

/// The fixed set of primitive components that cannot be expressed in the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Led,
    Wave,
    Momentary,
    Toggle,
    TFlipFlop,
}

impl Builtin {
    pub const ALL: [Builtin; 5] = [Builtin::Led, Builtin::Wave, Builtin::Momentary, Builtin::Toggle, Builtin::TFlipFlop];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Led => "led",
            Builtin::Wave => "wave",
            Builtin::Momentary => "momentary",
            Builtin::Toggle => "toggle",
            Builtin::TFlipFlop => "tflipflop",
        }
    }

    /// Fewest input wires an invocation must supply.
    pub fn min_inputs(self) -> usize {
        match self {
            Builtin::Led | Builtin::Wave => 1,
            Builtin::Momentary | Builtin::Toggle => 0,
            Builtin::TFlipFlop => 2,
        }
    }

    /// Number of output wires allocated for every invocation.
    pub fn outputs(self) -> usize {
        match self {
            Builtin::Led => 0,
            Builtin::Wave | Builtin::Momentary | Builtin::Toggle => 1,
            Builtin::TFlipFlop => 2,
        }
    }

    pub fn lookup(name: &str) -> Option<Builtin> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }
}

impl Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    pub id: GateId,
    pub kind: GateKind,
    pub label: String,
    pub inputs: Vec<WireId>,
    pub outputs: Vec<WireId>,
    pub context: ContextId,
    /// Persisted between simulation steps; only meaningful for builtins.
    pub state: String,
}

impl Gate {
    pub fn new(id: GateId, kind: GateKind, context: ContextId) -> Self {
        Self { id, kind, label: String::new(), inputs: Vec::new(), outputs: Vec::new(), context, state: String::new() }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_inputs(mut self, inputs: impl IntoIterator<Item = WireId>) -> Self {
        self.inputs.extend(inputs);
        self
    }

    pub fn with_outputs(mut self, outputs: impl IntoIterator<Item = WireId>) -> Self {
        self.outputs.extend(outputs);
        self
    }

    pub fn builtin(&self) -> Option<Builtin> {
        match self.kind {
            GateKind::Builtin => Builtin::lookup(&self.label),
            _ => None,
        }
    }

    pub fn visit_mut(&mut self, mut f: impl FnMut(&mut WireId)) {
        self.inputs.iter_mut().chain(self.outputs.iter_mut()).for_each(&mut f);
    }
}
