use crate::circuit::{Circuit, GateId, WireId};
use crate::error::SimError;
use crate::gates::GateKind;

/// Build-phase helper that creates an anonymous output wire for every gate
/// it adds, so circuits can be written as nested expressions.
pub struct CircuitBuilder<'a> {
    circuit: &'a mut Circuit,
}

macro_rules! gate_fn_gen {
    ( $gate_lowercase:ident, $gate_uppercase:ident ) => {
        pub fn $gate_lowercase(&mut self, inputs: &[WireId]) -> Result<WireId, SimError> {
            self.gate_gen(GateKind::$gate_uppercase, inputs)
        }
    };
}

impl<'a> CircuitBuilder<'a> {
    pub fn new(circuit: &'a mut Circuit) -> Self {
        CircuitBuilder { circuit }
    }

    pub fn circuit(&self) -> &Circuit {
        self.circuit
    }

    pub fn wire(&mut self, name: &str) -> WireId {
        self.circuit.add_wire(Some(name))
    }

    pub fn temp(&mut self) -> WireId {
        self.circuit.add_wire(None)
    }

    /// Adds an unnamed gate driving an existing wire.
    pub fn gate_into(
        &mut self,
        kind: GateKind,
        inputs: &[WireId],
        output: WireId,
    ) -> Result<GateId, SimError> {
        self.circuit.add_gate(None, kind, inputs, &[output])
    }

    fn gate_gen(&mut self, kind: GateKind, inputs: &[WireId]) -> Result<WireId, SimError> {
        for input in inputs {
            self.circuit.wire(*input)?;
        }
        let output = self.temp();
        self.gate_into(kind, inputs, output)?;
        Ok(output)
    }

    gate_fn_gen!(and, And);
    gate_fn_gen!(or, Or);
    gate_fn_gen!(nand, Nand);
    gate_fn_gen!(nor, Nor);
    gate_fn_gen!(xor, Xor);
    gate_fn_gen!(xnor, Xnor);

    pub fn not(&mut self, input: WireId) -> Result<WireId, SimError> {
        self.gate_gen(GateKind::Not, &[input])
    }

    pub fn buffer(&mut self, input: WireId) -> Result<WireId, SimError> {
        self.gate_gen(GateKind::Buffer, &[input])
    }

    /// `len` inverters in series. Returns the wire after each stage.
    pub fn inverter_chain(&mut self, input: WireId, len: usize) -> Result<Vec<WireId>, SimError> {
        let mut stages = Vec::with_capacity(len);
        let mut wire = input;
        for _ in 0..len {
            wire = self.not(wire)?;
            stages.push(wire);
        }
        Ok(stages)
    }
}
