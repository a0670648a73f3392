use crate::{circuit_builder::CircuitBuilder, error::SimError, gates::GateKind, Circuit, WireId};

use super::bus::Bus;

/// 2:1 multiplexer, `y = select ? d1 : d0`.
///
/// Three gate levels deep from `select` (inverter, AND, OR) and two from the
/// data inputs.
pub fn create_mux2(
    circuit: &mut Circuit,
    select: WireId,
    d0: WireId,
    d1: WireId,
    y: WireId,
) -> Result<(), SimError> {
    let mut builder = CircuitBuilder::new(circuit);
    let select_not = builder.not(select)?;
    let pick_d0 = builder.and(&[d0, select_not])?;
    let pick_d1 = builder.and(&[d1, select])?;
    builder.gate_into(GateKind::Or, &[pick_d0, pick_d1], y)?;
    Ok(())
}

/// One [`create_mux2`] per bit, all sharing `select`.
pub fn create_bus_mux2<const BITS: usize>(
    circuit: &mut Circuit,
    select: WireId,
    d0: &Bus<BITS>,
    d1: &Bus<BITS>,
    y: &Bus<BITS>,
) -> Result<(), SimError> {
    for bit in 0..BITS {
        create_mux2(circuit, select, d0.bit(bit), d1.bit(bit), y.bit(bit))?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{trace::NoTrace, Signal, Simulator};

    #[test]
    fn mux_truth_table() {
        let mut circuit = Circuit::new();
        let a = circuit.add_wire(Some("A"));
        let d0 = circuit.add_wire(Some("D0"));
        let d1 = circuit.add_wire(Some("D1"));
        let y = circuit.add_wire(Some("Y"));
        create_mux2(&mut circuit, a, d0, d1, y).unwrap();
        assert_eq!(circuit.gate_count(), 4);

        let mut sim = Simulator::new(circuit);
        for select in [false, true] {
            for v0 in [false, true] {
                for v1 in [false, true] {
                    sim.step(&mut NoTrace, |stim, _| {
                        stim.set(a, select.into())?;
                        stim.set(d0, v0.into())?;
                        stim.set(d1, v1.into())?;
                        Ok(())
                    })
                    .unwrap();
                    sim.settle(20, &mut NoTrace).unwrap();
                    let expected = if select { v1 } else { v0 };
                    assert_eq!(
                        sim.wire_state(y).unwrap(),
                        Signal::from_bool(expected),
                        "select={select} d0={v0} d1={v1}"
                    );
                }
            }
        }
    }

    #[test]
    fn bus_mux_selects_whole_words() {
        let mut circuit = Circuit::new();
        let select = circuit.add_wire(Some("sel"));
        let d0 = Bus::<4>::new(&mut circuit, "d0_");
        let d1 = Bus::<4>::new(&mut circuit, "d1_");
        let y = Bus::<4>::new(&mut circuit, "y");
        create_bus_mux2(&mut circuit, select, &d0, &d1, &y).unwrap();

        let mut sim = Simulator::new(circuit);
        for (sel, expected) in [(false, 0b1010u8), (true, 0b0110u8)] {
            sim.step(&mut NoTrace, |stim, _| {
                stim.set(select, sel.into())?;
                d0.set(stim, 0b1010u8)?;
                d1.set(stim, 0b0110u8)?;
                Ok(())
            })
            .unwrap();
            sim.settle(20, &mut NoTrace).unwrap();
            assert_eq!(y.read::<u8>(sim.circuit()).unwrap(), Some(expected));
        }
    }
}
