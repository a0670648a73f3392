//! Circuits composed from primitive gates.

pub mod adder;
pub mod bus;
pub mod mux;
