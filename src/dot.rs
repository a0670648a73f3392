//! Graphviz export of the gate network.

use std::io::{self, Write};

use crate::circuit::{Circuit, WireRole};

/// DOT quoted id.
fn quoted(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

fn shape(role: WireRole) -> &'static str {
    match role {
        WireRole::Source => "circle",
        WireRole::Sink => "doublecircle",
        WireRole::Internal => "octagon",
    }
}

/// Writes the circuit as a left-to-right digraph: an edge from every input
/// wire to its gate and from the gate to each output wire. Gates are boxes,
/// wires are shaped by [`WireRole`].
pub fn write_dot<W: Write>(circuit: &Circuit, out: &mut W) -> io::Result<()> {
    writeln!(out, "digraph top {{")?;
    writeln!(out, "rankdir=\"LR\"")?;
    for (_, gate) in circuit.gates() {
        for wire_id in gate.inputs() {
            let wire = circuit.wire(*wire_id).map_err(io::Error::other)?;
            writeln!(out, "{} -> {};", quoted(wire.name()), quoted(gate.name()))?;
        }
        for wire_id in gate.outputs() {
            let wire = circuit.wire(*wire_id).map_err(io::Error::other)?;
            writeln!(out, "{} -> {};", quoted(gate.name()), quoted(wire.name()))?;
        }
        writeln!(out, "{} [shape=box];", quoted(gate.name()))?;
    }
    for (wire_id, wire) in circuit.wires() {
        let role = circuit.wire_role(wire_id).map_err(io::Error::other)?;
        writeln!(out, "{} [shape={}];", quoted(wire.name()), shape(role))?;
    }
    writeln!(out, "}}")
}
