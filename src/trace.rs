//! Consumers of the per-tick changed-wire stream.

use std::collections::BTreeMap;
use std::io;

use tracing::info;

use crate::circuit::{Circuit, WireId};
use crate::circuit_sim::Tick;
use crate::signal::Signal;

/// Receives the changed-wire set once per tick, before any gate of that
/// tick is evaluated. `changes` is ordered by wire id and carries the
/// committed value of each wire.
pub trait TraceRecorder {
    fn record(
        &mut self,
        tick: Tick,
        changes: &[(WireId, Signal)],
        circuit: &Circuit,
    ) -> io::Result<()>;
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl TraceRecorder for NoTrace {
    fn record(&mut self, _: Tick, _: &[(WireId, Signal)], _: &Circuit) -> io::Result<()> {
        Ok(())
    }
}

impl<R: TraceRecorder + ?Sized> TraceRecorder for &mut R {
    fn record(
        &mut self,
        tick: Tick,
        changes: &[(WireId, Signal)],
        circuit: &Circuit,
    ) -> io::Result<()> {
        (**self).record(tick, changes, circuit)
    }
}

impl<A: TraceRecorder, B: TraceRecorder> TraceRecorder for (A, B) {
    fn record(
        &mut self,
        tick: Tick,
        changes: &[(WireId, Signal)],
        circuit: &Circuit,
    ) -> io::Result<()> {
        self.0.record(tick, changes, circuit)?;
        self.1.record(tick, changes, circuit)
    }
}

/// In-memory waveform. Ticks without changes are not stored.
#[derive(Debug, Default, Clone)]
pub struct Waveform {
    ticks: BTreeMap<Tick, Vec<(WireId, Signal)>>,
}

impl Waveform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Changes reported at `tick`, empty if nothing changed.
    pub fn changes_at(&self, tick: Tick) -> &[(WireId, Signal)] {
        self.ticks.get(&tick).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tick, &[(WireId, Signal)])> + '_ {
        self.ticks
            .iter()
            .map(|(tick, changes)| (*tick, changes.as_slice()))
    }

    /// Every `(tick, value)` at which `wire_id` was reported.
    pub fn history(&self, wire_id: WireId) -> Vec<(Tick, Signal)> {
        self.ticks
            .iter()
            .filter_map(|(tick, changes)| {
                changes
                    .iter()
                    .find(|(changed, _)| *changed == wire_id)
                    .map(|(_, value)| (*tick, *value))
            })
            .collect()
    }

    /// Value of `wire_id` as of the latest report at or before `tick`.
    pub fn value_at(&self, wire_id: WireId, tick: Tick) -> Signal {
        self.history(wire_id)
            .into_iter()
            .take_while(|(at, _)| *at <= tick)
            .last()
            .map(|(_, value)| value)
            .unwrap_or(Signal::Undefined)
    }
}

impl TraceRecorder for Waveform {
    fn record(
        &mut self,
        tick: Tick,
        changes: &[(WireId, Signal)],
        _: &Circuit,
    ) -> io::Result<()> {
        if !changes.is_empty() {
            self.ticks.insert(tick, changes.to_vec());
        }
        Ok(())
    }
}

/// Logs every reported change as an `info` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTrace;

impl TraceRecorder for LogTrace {
    fn record(
        &mut self,
        tick: Tick,
        changes: &[(WireId, Signal)],
        circuit: &Circuit,
    ) -> io::Result<()> {
        for (wire_id, value) in changes {
            let name = circuit.wire(*wire_id).map(|wire| wire.name()).unwrap_or("?");
            info!(tick, wire = name, %value, "signal");
        }
        Ok(())
    }
}
