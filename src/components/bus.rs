use std::ops::BitAnd;

use num_traits::{CheckedShl, Unsigned};

use crate::{circuit_sim::Stimulus, error::SimError, Circuit, WireId};

/// A group of wires read and driven as an unsigned integer, bit 0 first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bus<const BITS: usize>([WireId; BITS]);

impl<const BITS: usize> Bus<BITS> {
    /// Adds `BITS` wires named `<prefix><bit>`.
    pub fn new(circuit: &mut Circuit, prefix: &str) -> Self {
        Bus(std::array::from_fn(|bit| {
            circuit.add_wire(Some(format!("{prefix}{bit}").as_str()))
        }))
    }

    pub fn bit(&self, bit: usize) -> WireId {
        self.0[bit]
    }

    /// `None` while any bit is undefined or invalid, or when a bit past the
    /// width of `T` is high.
    pub fn read<T>(&self, circuit: &Circuit) -> Result<Option<T>, SimError>
    where
        T: Unsigned + CheckedShl,
    {
        let mut sum = T::zero();
        for (bit, wire_id) in self.0.iter().cloned().enumerate() {
            match circuit.wire_state(wire_id)?.to_bool() {
                Some(true) => match T::one().checked_shl(bit as u32) {
                    Some(mask) => sum = sum + mask,
                    None => return Ok(None),
                },
                Some(false) => (),
                None => return Ok(None),
            }
        }
        Ok(Some(sum))
    }

    /// Bits past the width of `T` are driven low.
    pub fn set<T>(&self, stimulus: &mut Stimulus<'_>, val: T) -> Result<(), SimError>
    where
        T: Unsigned + Copy + BitAnd<T, Output = T> + CheckedShl,
    {
        for (bit, wire_id) in self.0.iter().cloned().enumerate() {
            let bit_val = T::one()
                .checked_shl(bit as u32)
                .is_some_and(|mask| !(val & mask).is_zero());
            stimulus.set(wire_id, bit_val.into())?;
        }
        Ok(())
    }
}
