use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, debug_span, trace};

use crate::circuit::{Circuit, GateId, WireId};
use crate::error::SimError;
use crate::signal::Signal;
use crate::trace::TraceRecorder;

pub type Tick = u64;
pub type Ticks = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunResult {
    Finished { after_ticks: Ticks },
    ReachedMaxTicks { max_ticks: Ticks },
}

/// Commits `value` to `wire_id`. Only an actual change of value marks the
/// wire as changed.
fn set_signal(
    circuit: &mut Circuit,
    changed: &mut BTreeSet<WireId>,
    tick: Tick,
    wire_id: WireId,
    value: Signal,
) -> Result<bool, SimError> {
    let previous = circuit.replace_wire_state(wire_id, value)?;
    if previous == value {
        return Ok(false);
    }
    changed.insert(wire_id);
    debug!(
        tick,
        wire = circuit.wire(wire_id)?.name(),
        from = %previous,
        to = %value,
        "signal changed"
    );
    Ok(true)
}

fn no_stimulus(_: &mut Stimulus<'_>, _: Tick) -> Result<(), SimError> {
    Ok(())
}

/// Handle given to the stimulus callback at the start of every tick.
pub struct Stimulus<'a> {
    circuit: &'a mut Circuit,
    changed: &'a mut BTreeSet<WireId>,
    tick: Tick,
}

impl Stimulus<'_> {
    /// Drives a wire from outside the circuit. Returns whether the committed
    /// value changed; setting the value a wire already holds is a no-op.
    pub fn set(&mut self, wire_id: WireId, value: Signal) -> Result<bool, SimError> {
        set_signal(self.circuit, self.changed, self.tick, wire_id, value)
    }
}

/// Tick-driven propagation over a frozen [`Circuit`].
///
/// Every tick the stimulus callback runs first, the resulting set of
/// changed wires is reported to the trace recorder, and then every gate
/// reading one of those wires is evaluated once. Gate outputs are committed
/// only after the whole pending set has been evaluated, so a signal advances
/// exactly one gate level per tick.
#[derive(Debug)]
pub struct Simulator {
    circuit: Circuit,
    tick: Tick,
    changed: BTreeSet<WireId>,
    pending: BTreeSet<GateId>,
    writes: BTreeMap<WireId, Signal>,
    emitted: Vec<(WireId, Signal)>,
    scratch: Vec<Signal>,
}

impl Simulator {
    pub fn new(circuit: Circuit) -> Self {
        Self {
            circuit,
            tick: 0,
            changed: BTreeSet::new(),
            pending: BTreeSet::new(),
            writes: BTreeMap::new(),
            emitted: Vec::new(),
            scratch: Vec::new(),
        }
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    pub fn wire_state(&self, wire_id: WireId) -> Result<Signal, SimError> {
        self.circuit.wire_state(wire_id)
    }

    /// Wires changed since the last evaluation phase, i.e. what the next
    /// tick will report and propagate.
    pub fn changed_wires(&self) -> impl Iterator<Item = WireId> + '_ {
        self.changed.iter().copied()
    }

    pub fn work_left(&self) -> bool {
        !self.changed.is_empty()
    }

    /// Runs `ticks_max` ticks, calling `stimulus` at the start of each one.
    /// Tick ids continue from previous runs.
    pub fn simulate<R, F>(
        &mut self,
        ticks_max: Ticks,
        recorder: &mut R,
        mut stimulus: F,
    ) -> Result<(), SimError>
    where
        R: TraceRecorder + ?Sized,
        F: FnMut(&mut Stimulus<'_>, Tick) -> Result<(), SimError>,
    {
        let span = debug_span!("simulate", start = self.tick, ticks_max);
        let _enter = span.enter();
        for _ in 0..ticks_max {
            self.advance(recorder, &mut stimulus)?;
        }
        Ok(())
    }

    pub fn step<R, F>(&mut self, recorder: &mut R, mut stimulus: F) -> Result<(), SimError>
    where
        R: TraceRecorder + ?Sized,
        F: FnMut(&mut Stimulus<'_>, Tick) -> Result<(), SimError>,
    {
        self.advance(recorder, &mut stimulus)
    }

    /// Ticks without stimulus until nothing is left to propagate.
    pub fn settle<R>(&mut self, max_ticks: Ticks, recorder: &mut R) -> Result<RunResult, SimError>
    where
        R: TraceRecorder + ?Sized,
    {
        for ticks in 0..max_ticks {
            if !self.work_left() {
                return Ok(RunResult::Finished { after_ticks: ticks });
            }
            self.advance(recorder, &mut no_stimulus)?;
        }
        Ok(if self.work_left() {
            RunResult::ReachedMaxTicks { max_ticks }
        } else {
            RunResult::Finished {
                after_ticks: max_ticks,
            }
        })
    }

    fn advance<R, F>(&mut self, recorder: &mut R, stimulus: &mut F) -> Result<(), SimError>
    where
        R: TraceRecorder + ?Sized,
        F: FnMut(&mut Stimulus<'_>, Tick) -> Result<(), SimError>,
    {
        let tick = self.tick;

        let mut ctx = Stimulus {
            circuit: &mut self.circuit,
            changed: &mut self.changed,
            tick,
        };
        stimulus(&mut ctx, tick)?;

        // Report stimulus changes together with last tick's gate outputs.
        self.emitted.clear();
        for wire_id in &self.changed {
            self.emitted
                .push((*wire_id, self.circuit.wire_state(*wire_id)?));
        }
        recorder.record(tick, &self.emitted, &self.circuit)?;

        self.pending.clear();
        for wire_id in &self.changed {
            for gate_id in self.circuit.fanout_gates(*wire_id)? {
                trace!(tick, gate = %gate_id, wire = %wire_id, "gate touched");
                self.pending.insert(*gate_id);
            }
        }
        self.changed.clear();

        // Evaluate against the committed states; writes are buffered so no
        // gate sees a sibling's output from this tick. With several drivers
        // on one wire the highest gate id wins.
        self.writes.clear();
        for gate_id in &self.pending {
            let next = self.circuit.evaluate_gate(*gate_id, &mut self.scratch)?;
            let gate = self.circuit.gate(*gate_id)?;
            if gate.state() != next {
                debug!(tick, gate = gate.name(), to = %next, "gate changed");
                for wire_id in gate.outputs() {
                    self.writes.insert(*wire_id, next);
                }
            }
            self.circuit.set_gate_state(*gate_id, next)?;
        }
        for (wire_id, value) in &self.writes {
            set_signal(&mut self.circuit, &mut self.changed, tick, *wire_id, *value)?;
        }

        self.tick += 1;
        Ok(())
    }
}
