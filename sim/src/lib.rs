//! Propagates signal state through a [`Netlist`] until it stops changing.
//!
//! Every round evaluates each gate once, in reverse emission order, so that a flip-flop whose clock is driven by
//! another flip-flop sees that edge in the following round rather than in the same one. Simulation stops when a
//! round leaves every wire unchanged, or after `5 * (wires + gates)` rounds for circuits that oscillate.

use lovelace_netlist::{Builtin, Gate, GateKind, Netlist, Wire, WireArena};
use tracing::{debug, trace};

const ROUNDS_PER_ELEMENT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Simulation {
    pub rounds: usize,
    /// False when the round limit was hit before the wires settled.
    pub converged: bool,
}

pub fn simulate(netlist: &mut Netlist) -> Simulation {
    let (gates, wires) = netlist.split_mut();
    run(gates, wires)
}

/// Simulates gates and wires supplied from outside a compile, returning them updated.
pub fn simulate_gates(gates: Vec<Gate>, wires: Vec<Wire>) -> (Vec<Gate>, Vec<Wire>, Simulation) {
    let mut netlist = Netlist::from_parts(gates, wires);
    let simulation = simulate(&mut netlist);
    let (gates, wires) = netlist.into_parts();
    (gates, wires, simulation)
}

fn run(gates: &mut [Gate], wires: &mut WireArena) -> Simulation {
    let limit = (ROUNDS_PER_ELEMENT * (wires.len() + gates.len())).max(1);
    let mut hash = wires.content_hash();
    let mut rounds = 0;
    let mut converged = false;
    while rounds < limit {
        for gate in gates.iter_mut().rev() {
            evaluate(gate, wires);
        }
        rounds += 1;
        let next = wires.content_hash();
        if cfg!(feature = "trace") {
            trace!(round = rounds, changed = next != hash, "round");
        }
        if next == hash {
            converged = true;
            break;
        }
        hash = next;
    }
    debug!(rounds, converged, limit, "simulated");
    Simulation { rounds, converged }
}

fn input(gate: &Gate, wires: &WireArena, index: usize) -> bool {
    gate.inputs.get(index).is_some_and(|&wire| wires.is_powered(wire))
}

fn drive(gate: &Gate, wires: &mut WireArena, index: usize, powered: bool) {
    if let Some(&wire) = gate.outputs.get(index) {
        wires.set_powered(wire, powered);
    }
}

fn evaluate(gate: &mut Gate, wires: &mut WireArena) {
    match gate.kind {
        GateKind::And | GateKind::Or | GateKind::Not | GateKind::BlockInput | GateKind::BlockOutput
            if gate.inputs.is_empty() => {}
        GateKind::And => {
            let value = gate.inputs.iter().all(|&wire| wires.is_powered(wire));
            drive(gate, wires, 0, value);
        }
        GateKind::Or => {
            let value = gate.inputs.iter().any(|&wire| wires.is_powered(wire));
            drive(gate, wires, 0, value);
        }
        GateKind::Not => {
            let value = !input(gate, wires, 0);
            drive(gate, wires, 0, value);
        }
        GateKind::Source => drive(gate, wires, 0, true),
        GateKind::Ground => drive(gate, wires, 0, false),
        GateKind::BlockInput | GateKind::BlockOutput => {
            let value = input(gate, wires, 0);
            drive(gate, wires, 0, value);
        }
        GateKind::Builtin => match gate.builtin() {
            Some(Builtin::Toggle | Builtin::Momentary) => {
                let on = gate.state == "on";
                for index in 0..gate.outputs.len() {
                    drive(gate, wires, index, on);
                }
            }
            Some(Builtin::Led) => {
                let on = input(gate, wires, 0);
                gate.state = String::from(if on { "on" } else { "off" });
            }
            Some(Builtin::TFlipFlop) => tflipflop(gate, wires),
            Some(Builtin::Wave) | None => (),
        },
    }
}

/// Inputs are `(clock, toggle, [set], [reset])`; state is `<clock was high><bit>`.
fn tflipflop(gate: &mut Gate, wires: &mut WireArena) {
    let clock = input(gate, wires, 0);
    let toggle = input(gate, wires, 1);
    let set = input(gate, wires, 2);
    let reset = input(gate, wires, 3);

    let mut state = gate.state.chars();
    let was_high = state.next() == Some('1');
    let mut bit = state.next() == Some('1');
    if set {
        bit = true;
    } else if reset {
        bit = false;
    } else if clock && !was_high && toggle {
        bit = !bit;
    }

    gate.state = format!("{}{}", clock as u8, bit as u8);
    drive(gate, wires, 0, bit);
    drive(gate, wires, 1, !bit);
}
