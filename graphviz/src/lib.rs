use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use std::io;

use lovelace_netlist::{ContextId, Gate, GateId, Netlist, WireId};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Edge {
    from_gate: GateId,
    wire: WireId,
    to_arg: usize,
}

struct Node<'a> {
    gate: &'a Gate,
    label: String,
    args: Vec<String>,
    inputs: BTreeSet<Edge>,
}

impl<'a> Node<'a> {
    fn new(gate: &'a Gate) -> Self {
        let mut label = format!("{} = {}", gate.id, gate.kind);
        if !gate.label.is_empty() {
            write!(&mut label, " {:?}", gate.label).unwrap();
        }
        if !gate.state.is_empty() {
            write!(&mut label, " state {:?}", gate.state).unwrap();
        }
        Self { gate, label, args: Vec::new(), inputs: BTreeSet::new() }
    }

    fn wire(mut self, netlist: &Netlist, wire: WireId) -> Self {
        let to_arg = self.args.len();
        for driver in netlist.drivers(wire) {
            self.inputs.insert(Edge { from_gate: driver.id, wire, to_arg });
        }
        self.args.push(wire.to_string());
        self
    }
}

struct Context<'a> {
    netlist: &'a Netlist,
    fanout: BTreeMap<GateId, BTreeSet<GateId>>,
    nodes: BTreeMap<ContextId, Vec<Node<'a>>>,
    children: BTreeMap<ContextId, Vec<ContextId>>,
}

impl<'a> Context<'a> {
    fn add_node(&mut self, node: Node<'a>) {
        for input in &node.inputs {
            self.fanout.entry(input.from_gate).or_default().insert(node.gate.id);
        }

        let context = match self.netlist.context(node.gate.context) {
            Some(_) => node.gate.context,
            None => ContextId::ROOT,
        };
        self.nodes.entry(context).or_default().push(node);
    }

    fn high_fanout(&self, gate: GateId) -> Option<usize> {
        let fanout = self.fanout.get(&gate).map(BTreeSet::len).unwrap_or(0);
        if fanout >= 10 { Some(fanout) } else { None }
    }

    fn print(&self, writer: &mut impl io::Write) -> io::Result<()> {
        writeln!(writer, "digraph {{")?;
        writeln!(writer, "  rankdir=LR;")?;
        writeln!(writer, "  node [fontname=\"monospace\"];")?;
        self.print_context(writer, ContextId::ROOT, 1)?;
        for node in self.nodes.values().flatten() {
            self.print_edges(writer, node)?;
        }
        writeln!(writer, "}}")
    }

    fn print_context(&self, writer: &mut impl io::Write, context: ContextId, level: usize) -> io::Result<()> {
        let indent = "  ".repeat(level);
        for node in self.nodes.get(&context).into_iter().flatten() {
            self.print_node(writer, node, &indent)?;
        }
        for &child in self.children.get(&context).into_iter().flatten() {
            let Some(info) = self.netlist.context(child) else { continue };
            writeln!(writer, "{indent}subgraph cluster_{} {{", child.0)?;
            writeln!(writer, "{indent}  label=\"{} {}\";", escape(&info.name), child)?;
            self.print_context(writer, child, level + 1)?;
            writeln!(writer, "{indent}}}")?;
        }
        Ok(())
    }

    fn print_node(&self, writer: &mut impl io::Write, node: &Node<'_>, indent: &str) -> io::Result<()> {
        let mut label = format!("<out> {}", escape(&node.label));
        for (i, arg) in node.args.iter().enumerate() {
            write!(&mut label, " | <arg{i}> {}", escape(arg)).unwrap();
        }
        let index = node.gate.id.0;
        writeln!(writer, "{indent}node_{index} [shape=record label=\"{label}\"];")?;

        if let Some(fanout) = self.high_fanout(node.gate.id) {
            writeln!(writer, "{indent}stub_{index} [label=\"{fanout} uses\"];")?;
        }
        Ok(())
    }

    fn print_edges(&self, writer: &mut impl io::Write, node: &Node<'_>) -> io::Result<()> {
        let index = node.gate.id.0;
        let force = node.inputs.len() == 1;
        for input in &node.inputs {
            if !force && self.high_fanout(input.from_gate).is_some() {
                continue;
            }

            let input_index = input.from_gate.0;
            let port = input.to_arg;
            let color = if self.netlist.is_powered(input.wire) { " [color=red]" } else { "" };
            writeln!(writer, "  node_{input_index}:out -> node_{index}:arg{port}{color};")?;
        }

        if self.high_fanout(node.gate.id).is_some() {
            writeln!(writer, "  node_{index}:out -> stub_{index};")?;
        }
        Ok(())
    }
}

/// Escapes text for use inside a quoted record label, where braces, bars and angle brackets are special.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '"' | '\\' | '{' | '}' | '|' | '<' | '>') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Writes the netlist as a Graphviz digraph, one record per gate, with each calling context as a nested cluster.
pub fn describe(writer: &mut impl io::Write, netlist: &Netlist) -> io::Result<()> {
    let mut children: BTreeMap<ContextId, Vec<ContextId>> = BTreeMap::new();
    for context in netlist.contexts() {
        let parent = match netlist.context(context.parent) {
            Some(_) if context.parent != context.id => context.parent,
            _ => ContextId::ROOT,
        };
        children.entry(parent).or_default().push(context.id);
    }

    let mut ctx = Context { netlist, fanout: BTreeMap::new(), nodes: BTreeMap::new(), children };

    for gate in netlist.gates() {
        let mut node = Node::new(gate);
        for &wire in &gate.inputs {
            node = node.wire(netlist, wire);
        }
        ctx.add_node(node);
    }

    ctx.print(writer)
}
