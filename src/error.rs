//! Error types for circuit construction and simulation.

use thiserror::Error;

use crate::circuit::{GateId, WireId};

/// Contract violations of a transfer function.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    /// AND/OR style fold invoked with no inputs.
    #[error("transfer function invoked with no inputs")]
    EmptyInput,

    /// Single-input function invoked with the wrong number of inputs.
    #[error("expected {expected} input(s), got {found}")]
    Arity { expected: usize, found: usize },
}

/// Errors that abort circuit construction or a simulation run.
///
/// None of these are transient: they point at a faulty circuit description.
#[derive(Debug, Error)]
pub enum SimError {
    /// Reference to a wire id that was never created.
    #[error("unknown wire {0}")]
    UnknownWire(WireId),

    /// Reference to a gate id that was never created.
    #[error("unknown gate {0}")]
    UnknownGate(GateId),

    /// A gate's transfer function rejected its inputs.
    #[error("gate {gate} ({name}) failed to evaluate: {source}")]
    Gate {
        gate: GateId,
        name: String,
        #[source]
        source: EvalError,
    },

    /// The trace recorder could not write its output.
    #[error("trace output failed: {0}")]
    Trace(#[from] std::io::Error),
}
