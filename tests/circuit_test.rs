#[cfg(test)]
mod test {
    use gatesim::{
        circuit_builder::CircuitBuilder,
        components::mux::create_mux2,
        trace::{NoTrace, Waveform},
        vcd::VcdWriter,
        Circuit, GateKind, Signal, Simulator, Tick, WireId,
    };

    fn run(
        circuit: Circuit,
        ticks: u64,
        stimuli: &[(Tick, WireId, Signal)],
    ) -> (Simulator, Waveform) {
        let mut sim = Simulator::new(circuit);
        let mut waveform = Waveform::new();
        sim.simulate(ticks, &mut waveform, |stim, tick| {
            for (at, wire_id, value) in stimuli {
                if *at == tick {
                    stim.set(*wire_id, *value)?;
                }
            }
            Ok(())
        })
        .unwrap();
        (sim, waveform)
    }

    #[test]
    fn not_gate_settles_after_one_tick() {
        let mut circuit = Circuit::new();
        let d = circuit.add_wire(Some("D"));
        let e = circuit.add_wire(Some("E"));
        circuit.add_gate(None, GateKind::Not, &[d], &[e]).unwrap();

        let (_, waveform) = run(circuit, 10, &[(0, d, Signal::True)]);
        assert_eq!(waveform.changes_at(0), &[(d, Signal::True)]);
        assert_eq!(waveform.changes_at(1), &[(e, Signal::False)]);
        for tick in 2..10 {
            assert!(waveform.changes_at(tick).is_empty(), "tick {tick}");
        }
    }

    #[test]
    fn and_gate_waits_for_both_inputs() {
        let mut circuit = Circuit::new();
        let a = circuit.add_wire(Some("A"));
        let b = circuit.add_wire(Some("B"));
        let c = circuit.add_wire(Some("C"));
        circuit.add_gate(None, GateKind::And, &[a, b], &[c]).unwrap();

        let (sim, waveform) = run(
            circuit,
            10,
            &[(0, a, Signal::True), (1, b, Signal::True)],
        );
        assert_eq!(waveform.changes_at(0), &[(a, Signal::True)]);
        assert_eq!(waveform.changes_at(1), &[(b, Signal::True)]);
        assert_eq!(waveform.history(c), vec![(2, Signal::True)]);
        assert_eq!(waveform.value_at(c, 1), Signal::Undefined);
        assert_eq!(sim.wire_state(c).unwrap(), Signal::True);
    }

    #[test]
    fn one_gate_level_per_tick() {
        for depth in 1..=6 {
            let mut circuit = Circuit::new();
            let mut builder = CircuitBuilder::new(&mut circuit);
            let input = builder.wire("in");
            let stages = builder.inverter_chain(input, depth).unwrap();
            let last = *stages.last().unwrap();

            let (_, waveform) = run(circuit, depth as u64 + 3, &[(0, input, Signal::True)]);
            for (stage, wire_id) in stages.iter().enumerate() {
                let history = waveform.history(*wire_id);
                assert_eq!(history.len(), 1, "stage {stage} of {depth}");
                assert_eq!(history[0].0, stage as u64 + 1, "stage {stage} of {depth}");
            }
            let expected = if depth % 2 == 0 {
                Signal::True
            } else {
                Signal::False
            };
            assert_eq!(waveform.history(last), vec![(depth as u64, expected)]);
        }
    }

    #[test]
    fn gates_read_the_state_from_before_the_tick() {
        // The inverter (gate 0) is evaluated before the AND in the same tick;
        // the AND must still see the inverter's old output.
        let mut circuit = Circuit::new();
        let a = circuit.add_wire(Some("A"));
        let b = circuit.add_wire(Some("B"));
        let c = circuit.add_wire(Some("C"));
        circuit.add_gate(None, GateKind::Not, &[a], &[b]).unwrap();
        circuit.add_gate(None, GateKind::And, &[a, b], &[c]).unwrap();

        let (_, waveform) = run(circuit, 5, &[(0, a, Signal::True)]);
        assert_eq!(waveform.history(b), vec![(1, Signal::False)]);
        assert_eq!(waveform.history(c), vec![(2, Signal::False)]);
    }

    #[test]
    fn last_driver_wins() {
        let mut circuit = Circuit::new();
        let a = circuit.add_wire(Some("A"));
        let b = circuit.add_wire(Some("B"));
        let w = circuit.add_wire(Some("W"));
        circuit.add_gate(None, GateKind::Buffer, &[a], &[w]).unwrap();
        circuit.add_gate(None, GateKind::Buffer, &[b], &[w]).unwrap();
        assert_eq!(circuit.drivers(w).unwrap().len(), 2);

        let (sim, waveform) = run(
            circuit,
            3,
            &[(0, a, Signal::True), (0, b, Signal::False)],
        );
        assert_eq!(waveform.changes_at(1), &[(w, Signal::False)]);
        assert_eq!(sim.wire_state(w).unwrap(), Signal::False);
    }

    #[test]
    fn drivers_cancelling_out_leave_the_wire_unchanged() {
        let mut circuit = Circuit::new();
        let a = circuit.add_wire(Some("A"));
        let b = circuit.add_wire(Some("B"));
        let w = circuit.add_wire(Some("W"));
        let z = circuit.add_wire(Some("Z"));
        circuit.add_gate(None, GateKind::Buffer, &[a], &[w]).unwrap();
        circuit.add_gate(None, GateKind::Buffer, &[b], &[w]).unwrap();
        circuit.add_gate(None, GateKind::Not, &[w], &[z]).unwrap();

        let (sim, waveform) = run(
            circuit,
            10,
            &[
                (0, a, Signal::False),
                (0, b, Signal::True),
                (3, a, Signal::True),
                (4, a, Signal::False),
                // Both drivers flip, the later one puts W back to False.
                (6, a, Signal::True),
                (6, b, Signal::False),
            ],
        );
        assert_eq!(
            waveform.history(w),
            vec![(1, Signal::True), (5, Signal::False)]
        );
        assert!(waveform.changes_at(7).is_empty());
        assert_eq!(
            waveform.history(z),
            vec![(2, Signal::False), (6, Signal::True)]
        );
        assert_eq!(sim.wire_state(w).unwrap(), Signal::False);
    }

    fn mux() -> (Circuit, [WireId; 4]) {
        let mut circuit = Circuit::new();
        let a = circuit.add_wire(Some("A"));
        let d0 = circuit.add_wire(Some("D0"));
        let d1 = circuit.add_wire(Some("D1"));
        let y = circuit.add_wire(Some("Y"));
        create_mux2(&mut circuit, a, d0, d1, y).unwrap();
        (circuit, [a, d0, d1, y])
    }

    #[test]
    fn mux_follows_select() {
        let (circuit, [a, d0, d1, y]) = mux();
        let (_, waveform) = run(
            circuit,
            10,
            &[
                (0, a, Signal::False),
                (0, d0, Signal::False),
                (0, d1, Signal::False),
                (3, d0, Signal::True),
                (6, a, Signal::True),
            ],
        );
        // D0 reaches Y two levels later, the select three levels later.
        assert_eq!(
            waveform.history(y),
            vec![(2, Signal::False), (5, Signal::True), (9, Signal::False)]
        );
    }

    #[test]
    fn ticks_continue_across_runs() {
        let (circuit, [a, d0, d1, y]) = mux();
        let mut sim = Simulator::new(circuit);
        let mut waveform = Waveform::new();
        sim.simulate(4, &mut waveform, |stim, tick| {
            if tick == 0 {
                stim.set(a, Signal::True)?;
                stim.set(d0, Signal::False)?;
                stim.set(d1, Signal::True)?;
            }
            Ok(())
        })
        .unwrap();
        assert_eq!(sim.tick(), 4);
        sim.simulate(4, &mut waveform, |stim, tick| {
            if tick == 4 {
                stim.set(d1, Signal::False)?;
            }
            Ok(())
        })
        .unwrap();
        assert_eq!(waveform.history(d1), vec![(0, Signal::True), (4, Signal::False)]);
        assert_eq!(waveform.history(y), vec![(2, Signal::True), (6, Signal::False)]);
    }

    #[test]
    fn vcd_of_mux_run() {
        let (circuit, [a, d0, d1, _]) = mux();
        let vcd = VcdWriter::new(Vec::new(), &circuit).unwrap();
        let mut sim = Simulator::new(circuit);
        let mut recorders = (vcd, NoTrace);
        sim.simulate(10, &mut recorders, |stim, tick| {
            if tick == 0 {
                stim.set(a, Signal::False)?;
                stim.set(d0, Signal::False)?;
                stim.set(d1, Signal::False)?;
            }
            Ok(())
        })
        .unwrap();
        let (vcd, _) = recorders;
        let text = String::from_utf8(vcd.into_inner()).unwrap();
        let body: Vec<_> = text
            .lines()
            .skip_while(|line| *line != "$enddefinitions $end")
            .collect();
        let stamps: Vec<_> = body.iter().filter(|line| line.starts_with('#')).collect();
        assert_eq!(stamps.len(), 10);
        // A, D0 and D1 are the first three wires.
        let tick0: Vec<_> = body
            .iter()
            .skip_while(|line| **line != "#0")
            .skip(1)
            .take_while(|line| !line.starts_with('#'))
            .collect();
        assert_eq!(tick0, vec![&"0!", &"0\"", &"0#"]);
        assert!(text.contains("$var wire 1 $ Y $end"));
    }
}
