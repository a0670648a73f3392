//! Discrete-time simulation of combinational gate networks.
//!
//! Wires carry one of four levels ([`Signal`]); gates recompute their output
//! whenever an input changes, one gate level per tick.
//!
//! ```
//! use gatesim::{trace::Waveform, Circuit, GateKind, Signal, Simulator};
//!
//! let mut circuit = Circuit::new();
//! let d = circuit.add_wire(Some("D"));
//! let e = circuit.add_wire(Some("E"));
//! circuit.add_gate(None, GateKind::Not, &[d], &[e]).unwrap();
//!
//! let mut sim = Simulator::new(circuit);
//! let mut waveform = Waveform::new();
//! sim.simulate(3, &mut waveform, |stim, tick| {
//!     if tick == 0 {
//!         stim.set(d, Signal::True)?;
//!     }
//!     Ok(())
//! })
//! .unwrap();
//! assert_eq!(waveform.changes_at(1), &[(e, Signal::False)]);
//! ```

pub mod circuit;
pub mod circuit_builder;
pub mod circuit_sim;
pub mod components;
pub mod config;
pub mod dot;
pub mod dump;
pub mod error;
pub mod gates;
pub mod signal;
pub mod trace;
pub mod vcd;

pub use circuit::{Circuit, Gate, GateId, Wire, WireId, WireRole};
pub use circuit_sim::{RunResult, Simulator, Stimulus, Tick, Ticks};
pub use error::{EvalError, SimError};
pub use gates::{GateKind, TransferFunction};
pub use signal::{combine_and, combine_or, negate, Signal};
