use lovelace_netlist::{Builtin, CallingContext, ContextId, Gate, GateId, GateKind, Netlist, Wire, WireId};

fn and_of_two() -> Netlist {
    let mut netlist = Netlist::new();
    for id in 1..=3 {
        netlist.add_wire(Wire::new(WireId(id)));
    }
    netlist.add_gate(Gate::new(GateId(1), GateKind::Source, ContextId::ROOT).with_outputs([WireId(1)]));
    netlist.add_gate(Gate::new(GateId(2), GateKind::Ground, ContextId::ROOT).with_outputs([WireId(2)]));
    netlist.add_gate(
        Gate::new(GateId(3), GateKind::And, ContextId::ROOT)
            .with_inputs([WireId(1), WireId(2)])
            .with_outputs([WireId(3)]),
    );
    netlist
}

#[test]
fn test_back_references() {
    let netlist = and_of_two();
    let wire = netlist.wire(WireId(1)).unwrap();
    assert_eq!(wire.start, Some(GateId(1)));
    assert_eq!(wire.end, Some(GateId(3)));
    let wire = netlist.wire(WireId(3)).unwrap();
    assert_eq!(wire.start, Some(GateId(3)));
    assert_eq!(wire.end, None);
}

#[test]
fn test_replace_wire() {
    let mut netlist = and_of_two();
    netlist.add_wire(Wire::new(WireId(4)));
    assert_eq!(netlist.replace_wire(WireId(1), WireId(4)), 2);
    assert_eq!(netlist.gates()[0].outputs, vec![WireId(4)]);
    assert_eq!(netlist.gates()[2].inputs, vec![WireId(4), WireId(2)]);
    assert_eq!(netlist.replace_wire(WireId(1), WireId(4)), 0);
}

#[test]
fn test_unknown_wire_is_unpowered() {
    let mut netlist = and_of_two();
    netlist.set_powered(WireId(99), true);
    assert!(!netlist.is_powered(WireId(99)));
    netlist.set_powered(WireId(2), true);
    assert!(netlist.is_powered(WireId(2)));
}

#[test]
fn test_content_hash() {
    let mut netlist = and_of_two();
    let before = netlist.wires().content_hash();
    assert_eq!(before, and_of_two().wires().content_hash());
    netlist.set_powered(WireId(3), true);
    assert_ne!(before, netlist.wires().content_hash());
}

#[test]
fn test_link_contexts() {
    let mut netlist = Netlist::new();
    netlist.add_context(CallingContext::new(ContextId(1), "outer", 1, ContextId::ROOT));
    netlist.add_context(CallingContext::new(ContextId(2), "inner", 2, ContextId(1)));
    netlist.add_context(CallingContext::new(ContextId(3), "inner", 2, ContextId(1)));
    netlist.link_contexts();
    assert_eq!(netlist.context(ContextId(1)).unwrap().children, vec![ContextId(2), ContextId(3)]);
    assert!(netlist.context(ContextId(2)).unwrap().children.is_empty());

    netlist.link_contexts();
    assert_eq!(netlist.context(ContextId(1)).unwrap().children.len(), 2);
}

#[test]
fn test_builtin_table() {
    assert_eq!(Builtin::lookup("tflipflop"), Some(Builtin::TFlipFlop));
    assert_eq!(Builtin::TFlipFlop.min_inputs(), 2);
    assert_eq!(Builtin::TFlipFlop.outputs(), 2);
    assert_eq!(Builtin::Led.outputs(), 0);
    assert_eq!(Builtin::lookup("flipflop"), None);

    let gate = Gate::new(GateId(1), GateKind::Builtin, ContextId::ROOT).with_label("toggle");
    assert_eq!(gate.builtin(), Some(Builtin::Toggle));
    let gate = Gate::new(GateId(1), GateKind::BlockInput, ContextId::ROOT).with_label("toggle");
    assert_eq!(gate.builtin(), None);
}

#[test]
fn test_gate_kind_tags() {
    assert_eq!(GateKind::Builtin.to_string(), "BUILTIN_FUNCTION");
    assert_eq!("BLOCK_OUTPUT".parse::<GateKind>(), Ok(GateKind::BlockOutput));
    assert!("XOR".parse::<GateKind>().is_err());
}

#[test]
fn test_display() {
    let netlist = and_of_two();
    let text = netlist.to_string();
    assert!(text.contains("#3 = AND %1 %2 -> %3 @0\n"));
    assert!(text.ends_with("outputs\n"));
}
