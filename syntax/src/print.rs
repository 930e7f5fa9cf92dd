use std::io;

use crate::{Node, NodeKind};

/// Writes an indented dump of a node tree, one node per line.
pub fn print_tree(writer: &mut impl io::Write, nodes: &[Node]) -> io::Result<()> {
    for node in nodes {
        print_node(writer, node, 0, "")?;
    }
    Ok(())
}

fn print_node(writer: &mut impl io::Write, node: &Node, indent: usize, prefix: &str) -> io::Result<()> {
    write!(writer, "{:width$}{prefix}{} {}:{}", "", node.token(), node.row, node.col, width = indent * 2)?;
    match &node.kind {
        NodeKind::Comment { text, .. } => write!(writer, " {text:?}")?,
        NodeKind::Invocation { name, .. } => write!(writer, " {name}")?,
        NodeKind::Block(block) => {
            write!(writer, " {}({}) -> {}", block.name, block.params.join(" "), block.outputs)?;
        }
        NodeKind::Import { path } => write!(writer, " {path}")?,
        NodeKind::Assignment { names } => write!(writer, " {}", names.join(" "))?,
        NodeKind::Identifier(name) => write!(writer, " {name}")?,
        NodeKind::Bool(value) => write!(writer, " {}", *value as u8)?,
        _ => (),
    }
    writeln!(writer)?;

    match &node.kind {
        NodeKind::And { lhs, rhs } | NodeKind::Or { lhs, rhs } => {
            print_node(writer, lhs, indent + 1, "LHS:")?;
            match rhs {
                Some(rhs) => print_node(writer, rhs, indent + 1, "RHS:")?,
                None => writeln!(writer, "{:width$}RHS:<none>", "", width = (indent + 1) * 2)?,
            }
        }
        NodeKind::Not { rhs } => match rhs {
            Some(rhs) => print_node(writer, rhs, indent + 1, "RHS:")?,
            None => writeln!(writer, "{:width$}RHS:<none>", "", width = (indent + 1) * 2)?,
        },
        _ => {
            for child in node.children().unwrap_or_default() {
                print_node(writer, child, indent + 1, "")?;
            }
        }
    }
    Ok(())
}
