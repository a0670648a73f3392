//! TOML stimulus scripts.
//!
//! ```toml
//! ticks = 10
//!
//! [[step]]
//! tick = 0
//! wire = "A"
//! value = "false"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::circuit::{Circuit, WireId};
use crate::circuit_sim::{Stimulus, Tick, Ticks};
use crate::error::SimError;
use crate::signal::Signal;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Deserialization error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Stimulus refers to unknown wire '{0}'")]
    UnknownWire(String),
}

fn default_ticks() -> Ticks {
    10
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StimulusScript {
    #[serde(default = "default_ticks")]
    pub ticks: Ticks,
    #[serde(default, rename = "step")]
    pub steps: Vec<StimulusStep>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StimulusStep {
    pub tick: Tick,
    pub wire: String,
    pub value: Signal,
}

impl Default for StimulusScript {
    /// Drives a 2:1 mux with select `A` and data inputs `D0`/`D1`: all low
    /// at tick 0, `D0` high at tick 3, `A` high at tick 6.
    fn default() -> Self {
        let step = |tick, wire: &str, value| StimulusStep {
            tick,
            wire: wire.to_string(),
            value,
        };
        Self {
            ticks: default_ticks(),
            steps: vec![
                step(0, "A", Signal::False),
                step(0, "D0", Signal::False),
                step(0, "D1", Signal::False),
                step(3, "D0", Signal::True),
                step(6, "A", Signal::True),
            ],
        }
    }
}

impl StimulusScript {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Resolves wire names against `circuit`.
    pub fn resolve(&self, circuit: &Circuit) -> Result<Schedule, ConfigError> {
        let mut steps: BTreeMap<Tick, Vec<(WireId, Signal)>> = BTreeMap::new();
        for step in &self.steps {
            let wire_id = circuit
                .wire_named(&step.wire)
                .ok_or_else(|| ConfigError::UnknownWire(step.wire.clone()))?;
            steps.entry(step.tick).or_default().push((wire_id, step.value));
        }
        Ok(Schedule {
            ticks: self.ticks,
            steps,
        })
    }
}

/// A stimulus script bound to concrete wires.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    pub ticks: Ticks,
    steps: BTreeMap<Tick, Vec<(WireId, Signal)>>,
}

impl Schedule {
    /// Applies the steps for `tick`, in script order.
    pub fn drive(&self, stimulus: &mut Stimulus<'_>, tick: Tick) -> Result<(), SimError> {
        if let Some(steps) = self.steps.get(&tick) {
            for (wire_id, value) in steps {
                stimulus.set(*wire_id, *value)?;
            }
        }
        Ok(())
    }

    pub fn last_tick(&self) -> Option<Tick> {
        self.steps.keys().next_back().copied()
    }
}
