use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::SimError;
use crate::gates::{GateKind, TransferFunction};
use crate::signal::Signal;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GateId(pub u32);

impl WireId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl GateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Wire {
    name: String,
    state: Signal,
    drivers: Vec<GateId>, // gates whose output is this wire
    fanout: Vec<GateId>,  // gates reading this wire
}

impl Wire {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> Signal {
        self.state
    }

    pub fn drivers(&self) -> &[GateId] {
        &self.drivers
    }

    pub fn fanout(&self) -> &[GateId] {
        &self.fanout
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Gate {
    name: String,
    state: Signal, // output of the last evaluation
    kind: GateKind,
    inputs: Vec<WireId>,
    outputs: Vec<WireId>,
}

impl Gate {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> Signal {
        self.state
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }

    pub fn inputs(&self) -> &[WireId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[WireId] {
        &self.outputs
    }
}

/// How a wire sits in the netlist, as far as export tools care.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WireRole {
    /// Nothing drives it: a primary input.
    Source,
    /// Driven but read by no gate: a primary output.
    Sink,
    Internal,
}

/// Wire and gate arenas of one simulation session.
///
/// Ids are dense indices and are never reused. Topology is only edited
/// through [`Circuit::add_wire`] and [`Circuit::add_gate`]; once the circuit
/// is handed to a [`Simulator`](crate::Simulator) only the signal states
/// change.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Circuit {
    wires: Vec<Wire>,
    gates: Vec<Gate>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_wire(&mut self, name: Option<&str>) -> WireId {
        let wire_id = WireId(self.wires.len() as u32);
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("_t{}", wire_id.0),
        };
        trace!(wire = %wire_id, %name, "wire added");
        self.wires.push(Wire {
            name,
            state: Signal::Undefined,
            drivers: Vec::new(),
            fanout: Vec::new(),
        });
        wire_id
    }

    pub fn add_gate(
        &mut self,
        name: Option<&str>,
        kind: GateKind,
        inputs: &[WireId],
        outputs: &[WireId],
    ) -> Result<GateId, SimError> {
        for wire_id in inputs.iter().chain(outputs) {
            self.wire(*wire_id)?;
        }
        let gate_id = GateId(self.gates.len() as u32);
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("{}{}", kind.tag(), gate_id.0),
        };
        trace!(gate = %gate_id, %name, ?inputs, ?outputs, "gate added");
        self.gates.push(Gate {
            name,
            state: Signal::Undefined,
            kind,
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
        });
        self.attach(gate_id);
        Ok(gate_id)
    }

    /// Registers a gate in the fanout of its inputs and the drivers of its
    /// outputs. Safe to repeat: every link is recorded at most once.
    fn attach(&mut self, gate_id: GateId) {
        let gate = &self.gates[gate_id.index()];
        for wire_id in &gate.inputs {
            let fanout = &mut self.wires[wire_id.index()].fanout;
            if !fanout.contains(&gate_id) {
                fanout.push(gate_id);
            }
        }
        for wire_id in &gate.outputs {
            let drivers = &mut self.wires[wire_id.index()].drivers;
            if !drivers.contains(&gate_id) {
                drivers.push(gate_id);
            }
        }
    }

    pub fn wire(&self, wire_id: WireId) -> Result<&Wire, SimError> {
        self.wires
            .get(wire_id.index())
            .ok_or(SimError::UnknownWire(wire_id))
    }

    pub fn gate(&self, gate_id: GateId) -> Result<&Gate, SimError> {
        self.gates
            .get(gate_id.index())
            .ok_or(SimError::UnknownGate(gate_id))
    }

    pub fn wires(&self) -> impl Iterator<Item = (WireId, &Wire)> + '_ {
        self.wires
            .iter()
            .enumerate()
            .map(|(index, wire)| (WireId(index as u32), wire))
    }

    pub fn gates(&self) -> impl Iterator<Item = (GateId, &Gate)> + '_ {
        self.gates
            .iter()
            .enumerate()
            .map(|(index, gate)| (GateId(index as u32), gate))
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// First wire carrying `name`. Names are for display and need not be
    /// unique.
    pub fn wire_named(&self, name: &str) -> Option<WireId> {
        self.wires
            .iter()
            .position(|wire| wire.name == name)
            .map(|index| WireId(index as u32))
    }

    pub fn fanout_gates(&self, wire_id: WireId) -> Result<&[GateId], SimError> {
        Ok(self.wire(wire_id)?.fanout())
    }

    pub fn drivers(&self, wire_id: WireId) -> Result<&[GateId], SimError> {
        Ok(self.wire(wire_id)?.drivers())
    }

    pub fn wire_state(&self, wire_id: WireId) -> Result<Signal, SimError> {
        Ok(self.wire(wire_id)?.state)
    }

    pub fn gate_state(&self, gate_id: GateId) -> Result<Signal, SimError> {
        Ok(self.gate(gate_id)?.state)
    }

    pub fn gate_inputs(&self, gate_id: GateId) -> Result<&[WireId], SimError> {
        Ok(self.gate(gate_id)?.inputs())
    }

    pub fn gate_outputs(&self, gate_id: GateId) -> Result<&[WireId], SimError> {
        Ok(self.gate(gate_id)?.outputs())
    }

    pub fn wire_role(&self, wire_id: WireId) -> Result<WireRole, SimError> {
        let wire = self.wire(wire_id)?;
        Ok(if wire.drivers.is_empty() {
            WireRole::Source
        } else if wire.fanout.is_empty() {
            WireRole::Sink
        } else {
            WireRole::Internal
        })
    }

    /// Overwrites a wire's committed state, returning the previous one.
    pub(crate) fn replace_wire_state(
        &mut self,
        wire_id: WireId,
        state: Signal,
    ) -> Result<Signal, SimError> {
        let wire = self
            .wires
            .get_mut(wire_id.index())
            .ok_or(SimError::UnknownWire(wire_id))?;
        Ok(std::mem::replace(&mut wire.state, state))
    }

    /// Evaluates a gate against the committed wire states without touching
    /// anything. `scratch` is reused to avoid an allocation per gate.
    pub(crate) fn evaluate_gate(
        &self,
        gate_id: GateId,
        scratch: &mut Vec<Signal>,
    ) -> Result<Signal, SimError> {
        let gate = self.gate(gate_id)?;
        scratch.clear();
        for wire_id in &gate.inputs {
            scratch.push(self.wire_state(*wire_id)?);
        }
        gate.kind
            .evaluate(scratch)
            .map_err(|source| SimError::Gate {
                gate: gate_id,
                name: gate.name.clone(),
                source,
            })
    }

    pub(crate) fn set_gate_state(
        &mut self,
        gate_id: GateId,
        state: Signal,
    ) -> Result<(), SimError> {
        let gate = self
            .gates
            .get_mut(gate_id.index())
            .ok_or(SimError::UnknownGate(gate_id))?;
        gate.state = state;
        Ok(())
    }
}
