use std::slice;

use indexmap::IndexMap;
use lovelace_netlist::{Builtin, CallingContext, ContextId, Gate, GateId, GateKind, Netlist, Wire, WireId};
use lovelace_syntax::{Block, Node, NodeKind, Side, TokenizerOptions, tokenize_with};
use tracing::{debug, trace};

use crate::scope::{BlockDef, Scope, lookup_block, lookup_variable};
use crate::{CompileError, Error};

/// Assignment target that binds nothing.
const DISCARD: &str = "_";

#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Deepest allowed scope stack, counting the top level; 0 disables the limit.
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}

/// Options for both stages of [`run_string`].
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub tokenizer: TokenizerOptions,
    pub compile: CompileOptions,
}

/// The result of compiling a prefix of a node list.
struct Compiled {
    consumed: usize,
    outputs: Vec<WireId>,
}

impl Compiled {
    fn new(consumed: usize, outputs: Vec<WireId>) -> Self {
        Self { consumed, outputs }
    }
}

/// State of one compile run. Id counters start fresh for every run.
struct Compiler<'n> {
    options: CompileOptions,
    netlist: Netlist,
    scopes: Vec<Scope<'n>>,
    last_wire: u32,
    last_gate: u32,
    last_frame: u32,
}

pub fn compile(nodes: &[Node]) -> Result<Netlist, CompileError> {
    compile_with(nodes, &CompileOptions::default())
}

pub fn compile_with(nodes: &[Node], options: &CompileOptions) -> Result<Netlist, CompileError> {
    let _span = tracing::debug_span!("compile").entered();
    let mut compiler = Compiler {
        options: options.clone(),
        netlist: Netlist::new(),
        scopes: vec![Scope::root()],
        last_wire: 0,
        last_gate: 0,
        last_frame: 0,
    };

    let mut rest = nodes;
    let mut outputs = Vec::new();
    while let Some(node) = rest.first() {
        let compiled = compiler.compile_step(rest)?;
        if !matches!(node.kind, NodeKind::Comment { .. }) {
            outputs = compiled.outputs;
        }
        rest = rest.get(compiled.consumed..).unwrap_or_default();
    }

    let mut netlist = compiler.netlist;
    netlist.set_outputs(outputs);
    netlist.link_contexts();
    debug!(
        gates = netlist.gates().len(),
        wires = netlist.wires().len(),
        contexts = netlist.contexts().len(),
        "compiled"
    );
    Ok(netlist)
}

/// Tokenizes and compiles `source` in one go.
pub fn run_string(source: &str, options: &Options) -> Result<Netlist, Error> {
    let nodes = tokenize_with(source, &options.tokenizer)?;
    Ok(compile_with(&nodes, &options.compile)?)
}

impl<'n> Compiler<'n> {
    fn scope(&mut self) -> &mut Scope<'n> {
        let index = self.scopes.len() - 1;
        &mut self.scopes[index]
    }

    fn context(&self) -> ContextId {
        self.scopes.last().map_or(ContextId::ROOT, |scope| scope.id)
    }

    fn add_wire(&mut self, desc: Option<String>) -> WireId {
        self.last_wire += 1;
        let mut wire = Wire::new(WireId(self.last_wire));
        wire.desc = desc;
        self.netlist.add_wire(wire)
    }

    fn add_gate(
        &mut self,
        kind: GateKind,
        label: String,
        inputs: Vec<WireId>,
        outputs: Vec<WireId>,
        context: ContextId,
    ) -> GateId {
        self.last_gate += 1;
        let gate = Gate::new(GateId(self.last_gate), kind, context).with_label(label).with_inputs(inputs).with_outputs(outputs);
        if cfg!(feature = "trace") {
            trace!(gate = %gate, "emit");
        }
        self.netlist.add_gate(gate)
    }

    /// Compiles the node at the front of `nodes`, along with any siblings it consumes.
    fn compile_step(&mut self, nodes: &'n [Node]) -> Result<Compiled, CompileError> {
        let Some(node) = nodes.first() else {
            return Ok(Compiled::new(0, Vec::new()));
        };
        let (row, col) = (node.row, node.col);
        match &node.kind {
            NodeKind::Comment { .. } => Ok(Compiled::new(1, Vec::new())),
            NodeKind::And { lhs, rhs } | NodeKind::Or { lhs, rhs } => {
                let kind = match node.kind {
                    NodeKind::And { .. } => GateKind::And,
                    _ => GateKind::Or,
                };
                let a = self.operand(node, Some(&**lhs), Side::Left)?;
                let b = self.operand(node, rhs.as_deref(), Side::Right)?;
                let output = self.add_wire(None);
                let context = self.context();
                self.add_gate(kind, String::new(), vec![a, b], vec![output], context);
                Ok(Compiled::new(1, vec![output]))
            }
            NodeKind::Not { rhs } => {
                let a = self.operand(node, rhs.as_deref(), Side::Right)?;
                let output = self.add_wire(None);
                let context = self.context();
                self.add_gate(GateKind::Not, String::new(), vec![a], vec![output], context);
                Ok(Compiled::new(1, vec![output]))
            }
            NodeKind::Assignment { names } => self.assignment(node, names, nodes),
            NodeKind::Invocation { name, args } => Ok(Compiled::new(1, self.invocation(node, name, args)?)),
            NodeKind::Return => self.block_return(node, nodes),
            NodeKind::Identifier(name) => {
                let wire = match lookup_variable(&self.scopes, name) {
                    Some(wire) => wire,
                    None => {
                        let wire = self.add_wire(Some(format!("for implicitly declared variable {name}")));
                        self.scope().variables.insert(name.clone(), wire);
                        wire
                    }
                };
                Ok(Compiled::new(1, vec![wire]))
            }
            NodeKind::Group(children) => {
                let mut outputs = Vec::new();
                for child in children {
                    outputs.extend(self.compile_step(slice::from_ref(child))?.outputs);
                }
                Ok(Compiled::new(1, outputs))
            }
            NodeKind::Block(block) => {
                self.scope().blocks.push(BlockDef { block, invocations: 0 });
                Ok(Compiled::new(1, Vec::new()))
            }
            NodeKind::Bool(value) => {
                let kind = if *value { GateKind::Source } else { GateKind::Ground };
                let output = self.add_wire(None);
                let context = self.context();
                self.add_gate(kind, String::new(), Vec::new(), vec![output], context);
                Ok(Compiled::new(1, vec![output]))
            }
            NodeKind::Import { .. } => Err(CompileError::UnexpectedToken { token: node.token(), row, col }),
        }
    }

    /// Compiles one operand of an operator, which must produce exactly one wire.
    fn operand(&mut self, operator: &Node, operand: Option<&'n Node>, side: Side) -> Result<WireId, CompileError> {
        let (token, row, col) = (operator.token(), operator.row, operator.col);
        let Some(operand) = operand else {
            return Err(CompileError::MissingOperand { token, side, row, col });
        };
        let outputs = self.compile_step(slice::from_ref(operand))?.outputs;
        match outputs[..] {
            [wire] => Ok(wire),
            _ => Err(CompileError::Arity { token, side, found: outputs.len(), row, col }),
        }
    }

    /// `let a b = x y`: consumes sibling expressions until every name has a value, then binds them.
    fn assignment(&mut self, node: &Node, names: &[String], nodes: &'n [Node]) -> Result<Compiled, CompileError> {
        let mut values = Vec::new();
        let mut consumed = 1;
        while values.len() < names.len() {
            let Some(value) = nodes.get(consumed) else {
                return Err(CompileError::AssignmentUnderflow {
                    names: names.len(),
                    values: values.len(),
                    row: node.row,
                    col: node.col,
                });
            };
            if !value.is_extended_expression() {
                return Err(CompileError::NotAnExpression {
                    token: value.token(),
                    name: names[values.len()].clone(),
                    row: value.row,
                    col: value.col,
                });
            }
            let compiled = self.compile_step(slice::from_ref(value))?;
            if compiled.outputs.is_empty() {
                return Err(CompileError::NoValue { row: value.row, col: value.col });
            }
            values.extend(compiled.outputs);
            consumed += 1;
        }

        for (name, &wire) in names.iter().zip(&values) {
            if name == DISCARD {
                continue;
            }
            if let Some(old) = self.scope().variables.insert(name.clone(), wire) {
                if old != wire {
                    let rewritten = self.netlist.replace_wire(old, wire);
                    for bound in self.scopes.iter_mut().flat_map(|scope| scope.variables.values_mut()) {
                        if *bound == old {
                            *bound = wire;
                        }
                    }
                    debug!(name = %name, %old, new = %wire, rewritten, "rebound variable");
                }
            }
        }
        Ok(Compiled::new(consumed, Vec::new()))
    }

    /// `return x y`: consumes as many sibling values as the enclosing block declares.
    fn block_return(&mut self, node: &Node, nodes: &'n [Node]) -> Result<Compiled, CompileError> {
        let (row, col) = (node.row, node.col);
        let Some(block) = self.scopes.last().and_then(|scope| scope.enclosing) else {
            return Err(CompileError::NoEnclosingBlock { row, col });
        };
        let expected = block.outputs;
        let mut outputs = Vec::new();
        let mut consumed = 1;
        while outputs.len() < expected {
            let Some(value) = nodes.get(consumed) else {
                let (name, found) = (block.name.clone(), outputs.len());
                return Err(CompileError::MissingReturnValues { name, expected, found, row, col });
            };
            let compiled = self.compile_step(slice::from_ref(value))?;
            if compiled.outputs.is_empty() {
                return Err(CompileError::NoValue { row: value.row, col: value.col });
            }
            outputs.extend(compiled.outputs);
            consumed += 1;
        }
        if consumed < nodes.len() {
            let (name, found) = (block.name.clone(), outputs.len() + nodes.len() - consumed);
            return Err(CompileError::TooManyReturnValues { name, expected, found, row, col });
        }
        Ok(Compiled::new(consumed, outputs))
    }

    /// Compiles each argument, returning their outputs tagged with the argument index.
    fn arguments(&mut self, args: &'n [Node]) -> Result<Vec<(usize, WireId)>, CompileError> {
        let mut wires = Vec::new();
        for (index, arg) in args.iter().enumerate() {
            let compiled = self.compile_step(slice::from_ref(arg))?;
            wires.extend(compiled.outputs.into_iter().map(|wire| (index, wire)));
        }
        Ok(wires)
    }

    fn invocation(&mut self, node: &Node, name: &str, args: &'n [Node]) -> Result<Vec<WireId>, CompileError> {
        let (row, col) = (node.row, node.col);
        if let Some(builtin) = Builtin::lookup(name) {
            return self.builtin(node, builtin, args);
        }

        let Some((scope_index, block_index)) = lookup_block(&self.scopes, name) else {
            return Err(CompileError::UnknownBlock { name: name.to_owned(), row, col });
        };
        let def = &mut self.scopes[scope_index].blocks[block_index];
        def.invocations += 1;
        let (block, count) = (def.block, def.invocations);

        let arguments = self.arguments(args)?;
        if arguments.len() > block.params.len() {
            let (expected, found) = (block.params.len(), arguments.len());
            return Err(CompileError::TooManyArguments { name: block.name.clone(), expected, found, row, col });
        }

        self.last_frame += 1;
        let frame = ContextId(self.last_frame);
        let mut variables = IndexMap::new();
        for ((index, wire), param) in arguments.into_iter().zip(&block.params) {
            let bound = self.add_wire(None);
            let label = format!("Input {index} into block {} invocation {count}", block.name);
            self.add_gate(GateKind::BlockInput, label, vec![wire], vec![bound], frame);
            variables.insert(param.clone(), bound);
        }

        self.scopes.push(Scope::new(frame, variables, Some(block)));
        let result = self.expand(node, block, count);
        self.scopes.pop();
        result
    }

    /// Compiles a block body inside the frame that was just pushed for it.
    fn expand(&mut self, node: &Node, block: &'n Block, count: usize) -> Result<Vec<WireId>, CompileError> {
        let limit = self.options.max_depth;
        if limit > 0 && self.scopes.len() > limit {
            return Err(CompileError::DepthExceeded { name: block.name.clone(), limit, row: node.row, col: node.col });
        }
        let depth = self.scopes.len() - 1;
        let frame = self.context();
        let parent = self.scopes[self.scopes.len() - 2].id;
        debug!(block = %block.name, invocation = count, %frame, depth, "expanding block");
        self.netlist.add_context(CallingContext::new(frame, block.name.clone(), depth, parent));

        let mut outputs = Vec::new();
        let mut body = block.body.as_slice();
        while let Some(head) = body.first() {
            let compiled = self.compile_step(body)?;
            body = body.get(compiled.consumed..).unwrap_or_default();
            if head.kind != NodeKind::Return {
                continue;
            }
            for (index, wire) in compiled.outputs.into_iter().enumerate() {
                let output = self.add_wire(None);
                let label = format!("Output {index} from block {} invocation {count}", block.name);
                self.add_gate(GateKind::BlockOutput, label, vec![wire], vec![output], frame);
                outputs.push(output);
            }
        }
        Ok(outputs)
    }

    fn builtin(&mut self, node: &Node, builtin: Builtin, args: &'n [Node]) -> Result<Vec<WireId>, CompileError> {
        let inputs: Vec<WireId> = self.arguments(args)?.into_iter().map(|(_, wire)| wire).collect();
        if inputs.len() < builtin.min_inputs() {
            return Err(CompileError::BuiltinArity {
                name: builtin.name().to_owned(),
                expected: builtin.min_inputs(),
                found: inputs.len(),
                row: node.row,
                col: node.col,
            });
        }
        let outputs: Vec<WireId> = (0..builtin.outputs()).map(|_| self.add_wire(None)).collect();
        let context = self.context();
        self.add_gate(GateKind::Builtin, builtin.name().to_owned(), inputs, outputs.clone(), context);
        Ok(outputs)
    }
}
