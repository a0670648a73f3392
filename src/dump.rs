//! Plain-text wire and gate tables.

use std::io::{self, Write};

use crate::circuit::Circuit;

pub fn write_wire_table<W: Write>(circuit: &Circuit, out: &mut W) -> io::Result<()> {
    writeln!(out, "Wire table:")?;
    for (wire_id, wire) in circuit.wires() {
        writeln!(
            out,
            "id: {} name: {} state: {}",
            wire_id.0,
            wire.name(),
            wire.state()
        )?;
        if !wire.fanout().is_empty() {
            write!(out, "  connected to:")?;
            for gate_id in wire.fanout() {
                let gate = circuit.gate(*gate_id).map_err(io::Error::other)?;
                write!(out, " {}", gate.name())?;
            }
            writeln!(out)?;
        }
    }
    writeln!(out)
}

pub fn write_gate_table<W: Write>(circuit: &Circuit, out: &mut W) -> io::Result<()> {
    writeln!(out, "Gate table:")?;
    for (gate_id, gate) in circuit.gates() {
        writeln!(out, "id: {} name: {}", gate_id.0, gate.name())?;
        for (label, wires) in [("inputs", gate.inputs()), ("outputs", gate.outputs())] {
            if wires.is_empty() {
                continue;
            }
            write!(out, "  {label}:")?;
            for wire_id in wires {
                let wire = circuit.wire(*wire_id).map_err(io::Error::other)?;
                write!(out, " {}", wire.name())?;
            }
            writeln!(out)?;
        }
    }
    writeln!(out)
}
