use lovelace_compiler::compile;
use lovelace_graphviz::describe;
use lovelace_netlist::Netlist;
use lovelace_syntax::tokenize;

fn compile_str(source: &str) -> Netlist {
    compile(&tokenize(source).unwrap()).unwrap()
}

fn render(netlist: &Netlist) -> String {
    let mut buffer = Vec::<u8>::new();
    describe(&mut buffer, netlist).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[test]
fn test_flat() {
    let mut netlist = compile_str("1 and 0");
    lovelace_sim::simulate(&mut netlist);
    let dot = render(&netlist);
    assert!(dot.starts_with("digraph {\n"));
    assert!(dot.ends_with("}\n"));
    assert!(dot.contains("  node_1 [shape=record label=\"<out> #1 = SOURCE\"];\n"));
    assert!(dot.contains("  node_3 [shape=record label=\"<out> #3 = AND | <arg0> %1 | <arg1> %2\"];\n"));
    assert!(dot.contains("  node_1:out -> node_3:arg0 [color=red];\n"));
    assert!(dot.contains("  node_2:out -> node_3:arg1;\n"));
    assert!(!dot.contains("subgraph"));
}

#[test]
fn test_clusters() {
    let netlist = compile_str(concat!(
        "block inner(a) {\n",
        "    return (not a)\n",
        "}\n",
        "block outer(a) {\n",
        "    return (inner(a))\n",
        "}\n",
        "outer(1)\n",
    ));
    let dot = render(&netlist);
    let outer = dot.find("  subgraph cluster_1 {\n").unwrap();
    let inner = dot.find("    subgraph cluster_2 {\n").unwrap();
    assert!(outer < inner);
    assert!(dot.contains("    label=\"outer @1\";\n"));
    assert!(dot.contains("      label=\"inner @2\";\n"));
    assert!(dot.contains("\"<out> #2 = BLOCK_INPUT \\\"Input 0 into block outer invocation 1\\\" | <arg0> %1\""));
}

#[test]
fn test_high_fanout() {
    let source: String = std::iter::once("let x = 1\n").chain(std::iter::repeat_n("(x and x)\n", 10)).collect();
    let dot = render(&compile_str(&source));
    assert!(dot.contains("  stub_1 [label=\"10 uses\"];\n"));
    assert!(dot.contains("  node_1:out -> stub_1;\n"));
    assert!(!dot.contains("node_1:out -> node_2"));
}
