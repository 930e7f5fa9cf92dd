use std::fmt::Display;

use crate::{CallingContext, Gate, Netlist, Wire};

impl Display for CallingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = context {:?} depth {} parent {}", self.id, self.name, self.depth, self.parent)?;
        if !self.children.is_empty() {
            write!(f, " children")?;
            for child in &self.children {
                write!(f, " {child}")?;
            }
        }
        Ok(())
    }
}

impl Display for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.id, self.kind)?;
        if !self.label.is_empty() {
            write!(f, " {:?}", self.label)?;
        }
        for input in &self.inputs {
            write!(f, " {input}")?;
        }
        write!(f, " ->")?;
        for output in &self.outputs {
            write!(f, " {output}")?;
        }
        write!(f, " {}", self.context)?;
        if !self.state.is_empty() {
            write!(f, " state {:?}", self.state)?;
        }
        Ok(())
    }
}

impl Display for Wire {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = wire {}", self.id, if self.powered { 1 } else { 0 })?;
        if let Some(desc) = &self.desc {
            write!(f, " {desc:?}")?;
        }
        Ok(())
    }
}

impl Display for Netlist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for context in self.contexts() {
            writeln!(f, "{context}")?;
        }
        for wire in self.wires().iter() {
            writeln!(f, "{wire}")?;
        }
        for gate in self.gates() {
            writeln!(f, "{gate}")?;
        }
        write!(f, "outputs")?;
        for output in self.outputs() {
            write!(f, " {output}")?;
        }
        writeln!(f)
    }
}
