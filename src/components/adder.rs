use crate::{circuit_builder::CircuitBuilder, error::SimError, gates::GateKind, Circuit, WireId};

use super::bus::Bus;

/// `c = a XOR b` out of inverters, ANDs and an OR (three levels deep).
pub fn create_xor(circuit: &mut Circuit, a: WireId, b: WireId, c: WireId) -> Result<(), SimError> {
    let mut builder = CircuitBuilder::new(circuit);
    let a_not = builder.not(a)?;
    let b_not = builder.not(b)?;
    let only_b = builder.and(&[b, a_not])?;
    let only_a = builder.and(&[a, b_not])?;
    builder.gate_into(GateKind::Or, &[only_b, only_a], c)?;
    Ok(())
}

pub fn create_half_adder(
    circuit: &mut Circuit,
    a: WireId,
    b: WireId,
    sum: WireId,
    carry: WireId,
) -> Result<(), SimError> {
    create_xor(circuit, a, b, sum)?;
    circuit.add_gate(None, GateKind::And, &[a, b], &[carry])?;
    Ok(())
}

pub fn create_full_adder(
    circuit: &mut Circuit,
    a: WireId,
    b: WireId,
    cin: WireId,
    sum: WireId,
    cout: WireId,
) -> Result<(), SimError> {
    let a_xor_b = circuit.add_wire(None);
    create_xor(circuit, a, b, a_xor_b)?;
    create_xor(circuit, cin, a_xor_b, sum)?;
    let mut builder = CircuitBuilder::new(circuit);
    let a_and_b = builder.and(&[a, b])?;
    let carry_through = builder.and(&[cin, a_xor_b])?;
    builder.gate_into(GateKind::Or, &[a_and_b, carry_through], cout)?;
    Ok(())
}

pub struct RippleCarryAdder<const BITS: usize> {
    pub input_a: Bus<BITS>,
    pub input_b: Bus<BITS>,
    pub cin: WireId,
    pub sum: Bus<BITS>,
    pub cout: WireId,
}

impl<const BITS: usize> RippleCarryAdder<BITS> {
    pub fn new(circuit: &mut Circuit) -> Result<RippleCarryAdder<BITS>, SimError> {
        assert!(BITS > 0);

        let input_a = Bus::new(circuit, "a");
        let input_b = Bus::new(circuit, "b");
        let sum = Bus::new(circuit, "s");
        let cin = circuit.add_wire(Some("cin"));
        let cout = circuit.add_wire(Some("cout"));

        let mut carry = cin;
        for i in 0..BITS {
            let carry_out = if i + 1 == BITS {
                cout
            } else {
                circuit.add_wire(None)
            };
            create_full_adder(
                circuit,
                input_a.bit(i),
                input_b.bit(i),
                carry,
                sum.bit(i),
                carry_out,
            )?;
            carry = carry_out;
        }

        Ok(Self {
            input_a,
            input_b,
            cin,
            sum,
            cout,
        })
    }
}
