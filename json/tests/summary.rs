use std::io;

use lovelace_compiler::compile;
use lovelace_json::{Error, export, import};
use lovelace_netlist::{ContextId, GateKind, Netlist, Wire, WireId};
use lovelace_syntax::tokenize;

fn compile_str(source: &str) -> Netlist {
    compile(&tokenize(source).unwrap()).unwrap()
}

fn roundtrip(netlist: &Netlist) -> Netlist {
    let mut buffer = Vec::<u8>::new();
    export(&mut buffer, netlist).unwrap();
    import(&mut io::Cursor::new(&buffer)).unwrap()
}

fn wires(netlist: &Netlist) -> Vec<Wire> {
    netlist.wires().iter().cloned().collect()
}

#[test]
fn test_roundtrip() {
    let netlist = compile_str(concat!(
        "import adder\n",
        "let s c = halfadder(1 q)\n",
        "led(s)\n",
        "(s c)\n",
    ));
    let netlist2 = roundtrip(&netlist);
    assert_eq!(netlist.gates(), netlist2.gates());
    assert_eq!(wires(&netlist), wires(&netlist2));
    assert_eq!(netlist.contexts(), netlist2.contexts());
    assert_eq!(netlist.outputs(), netlist2.outputs());
}

#[test]
fn test_summary_shape() {
    let netlist = compile_str("1 and 0");
    let mut buffer = Vec::<u8>::new();
    export(&mut buffer, &netlist).unwrap();
    let summary = jzon::parse(std::str::from_utf8(&buffer).unwrap()).unwrap();

    assert_eq!(summary["Gates"].len(), 3);
    let and = &summary["Gates"][2];
    assert_eq!(and["Type"].as_str(), Some("AND"));
    assert_eq!(and["Inputs"][0].as_u32(), Some(1));
    assert_eq!(and["Inputs"][1].as_u32(), Some(2));
    assert_eq!(and["Outputs"][0].as_u32(), Some(3));
    assert_eq!(and["CallingContext"].as_u32(), Some(0));
    assert_eq!(summary["Wires"][2]["End"], jzon::JsonValue::Null);
    assert_eq!(summary["Wires"][0]["End"].as_u32(), Some(3));
    assert_eq!(summary["Wires"][0]["Powered"].as_bool(), Some(false));
    assert_eq!(summary["Contexts"].len(), 0);
    assert_eq!(summary["Outputs"][0].as_u32(), Some(3));
}

#[test]
fn test_simulation_request() {
    let request = r#"{
        "Gates": [
            {"Id": 1, "Type": "SOURCE", "Outputs": [{"Id": 1}]},
            {"Id": 2, "Type": "BUILTIN_FUNCTION", "Label": "led", "Inputs": [{"Id": 1, "Powered": false}]}
        ],
        "Wires": [
            {"Id": 1, "Powered": false}
        ]
    }"#;
    let mut netlist = import(&mut request.as_bytes()).unwrap();
    assert!(netlist.contexts().is_empty());
    assert!(netlist.outputs().is_empty());
    assert_eq!(netlist.gates()[0].outputs, [WireId(1)]);
    assert_eq!(netlist.gates()[1].context, ContextId::ROOT);
    assert_eq!(netlist.gates()[1].kind, GateKind::Builtin);

    assert!(lovelace_sim::simulate(&mut netlist).converged);
    assert!(netlist.is_powered(WireId(1)));
    assert_eq!(netlist.gates()[1].state, "on");
}

#[test]
fn test_errors() {
    let error = import(&mut "{\"Gates\": [".as_bytes()).unwrap_err();
    assert!(matches!(error, Error::Json(_)));

    let error = import(&mut "{\"Wires\": []}".as_bytes()).unwrap_err();
    assert!(matches!(error, Error::Schema(_)));
    assert_eq!(error.to_string(), "schema error: summary is missing \"Gates\"");

    let error = import(&mut r#"{"Gates": [{"Id": 4, "Type": "XOR"}], "Wires": []}"#.as_bytes()).unwrap_err();
    assert!(matches!(error, Error::Schema(_)));

    let error = import(&mut r#"{"Gates": [{"Id": 4, "Type": "NOT", "Inputs": ["a"]}], "Wires": []}"#.as_bytes())
        .unwrap_err();
    assert_eq!(error.to_string(), "schema error: gate #4 has a malformed wire reference");
}
