use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Four-valued logic level carried by a wire.
///
/// The discriminants are the 2-bit codes the combination rules work on:
/// bitwise AND of two codes is their conservative AND, bitwise OR is their
/// conservative OR. `False` dominates AND, `True` dominates OR.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    False = 0b00,
    Invalid = 0b01,
    #[default]
    Undefined = 0b10,
    True = 0b11,
}

impl Signal {
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Only the low two bits are significant.
    pub const fn from_code(code: u8) -> Self {
        match code & 0b11 {
            0b00 => Signal::False,
            0b01 => Signal::Invalid,
            0b10 => Signal::Undefined,
            _ => Signal::True,
        }
    }

    pub const fn from_bool(val: bool) -> Self {
        if val {
            Signal::True
        } else {
            Signal::False
        }
    }

    pub const fn to_bool(self) -> Option<bool> {
        match self {
            Signal::False => Some(false),
            Signal::True => Some(true),
            Signal::Invalid | Signal::Undefined => None,
        }
    }

    pub const fn is_defined(self) -> bool {
        matches!(self, Signal::False | Signal::True)
    }

    /// Value character used in value change dumps.
    pub const fn vcd_char(self) -> char {
        match self {
            Signal::False => '0',
            Signal::Invalid => 'i',
            Signal::Undefined => 'x',
            Signal::True => '1',
        }
    }
}

impl BitAnd for Signal {
    type Output = Signal;

    fn bitand(self, rhs: Self) -> Self::Output {
        Signal::from_code(self.code() & rhs.code())
    }
}

impl BitOr for Signal {
    type Output = Signal;

    fn bitor(self, rhs: Self) -> Self::Output {
        Signal::from_code(self.code() | rhs.code())
    }
}

/// Swaps `True` and `False`. This is not a complement of the code:
/// `Invalid` and `Undefined` are left alone.
impl Not for Signal {
    type Output = Signal;

    fn not(self) -> Self::Output {
        negate(self)
    }
}

impl From<bool> for Signal {
    fn from(val: bool) -> Self {
        Signal::from_bool(val)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::False => "F",
            Signal::Invalid => "I",
            Signal::Undefined => "X",
            Signal::True => "T",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised signal value '{0}'")]
pub struct ParseSignalError(pub String);

impl FromStr for Signal {
    type Err = ParseSignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "f" | "false" => Ok(Signal::False),
            "i" | "invalid" => Ok(Signal::Invalid),
            "x" | "undefined" => Ok(Signal::Undefined),
            "1" | "t" | "true" => Ok(Signal::True),
            _ => Err(ParseSignalError(s.to_string())),
        }
    }
}

pub fn combine_and(values: &[Signal]) -> Result<Signal, EvalError> {
    let (first, rest) = values.split_first().ok_or(EvalError::EmptyInput)?;
    Ok(rest.iter().fold(*first, |acc, val| acc & *val))
}

pub fn combine_or(values: &[Signal]) -> Result<Signal, EvalError> {
    let (first, rest) = values.split_first().ok_or(EvalError::EmptyInput)?;
    Ok(rest.iter().fold(*first, |acc, val| acc | *val))
}

pub fn negate(value: Signal) -> Signal {
    match value {
        Signal::False => Signal::True,
        Signal::True => Signal::False,
        other => other,
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    const ALL: [Signal; 4] = [
        Signal::False,
        Signal::Invalid,
        Signal::Undefined,
        Signal::True,
    ];

    fn any_signal() -> impl Strategy<Value = Signal> {
        (0u8..4).prop_map(Signal::from_code)
    }

    #[test]
    fn codes_round_trip() {
        for signal in ALL {
            assert_eq!(Signal::from_code(signal.code()), signal);
        }
        assert_eq!(Signal::False.code(), 0b00);
        assert_eq!(Signal::Invalid.code(), 0b01);
        assert_eq!(Signal::Undefined.code(), 0b10);
        assert_eq!(Signal::True.code(), 0b11);
    }

    #[test]
    fn and_or_tables() {
        assert_eq!(Signal::True & Signal::True, Signal::True);
        assert_eq!(Signal::True & Signal::Undefined, Signal::Undefined);
        assert_eq!(Signal::True & Signal::Invalid, Signal::Invalid);
        assert_eq!(Signal::Undefined & Signal::Invalid, Signal::False);
        assert_eq!(Signal::False | Signal::Undefined, Signal::Undefined);
        assert_eq!(Signal::False | Signal::False, Signal::False);
        assert_eq!(Signal::Invalid | Signal::Undefined, Signal::True);
    }

    #[test]
    fn empty_folds_fail() {
        assert_eq!(combine_and(&[]), Err(EvalError::EmptyInput));
        assert_eq!(combine_or(&[]), Err(EvalError::EmptyInput));
    }

    #[test]
    fn single_value_folds_are_identity() {
        for signal in ALL {
            assert_eq!(combine_and(&[signal]), Ok(signal));
            assert_eq!(combine_or(&[signal]), Ok(signal));
        }
    }

    #[test]
    fn negate_only_swaps_defined_values() {
        assert_eq!(negate(Signal::True), Signal::False);
        assert_eq!(negate(Signal::False), Signal::True);
        assert_eq!(negate(Signal::Undefined), Signal::Undefined);
        assert_eq!(negate(Signal::Invalid), Signal::Invalid);
        assert_eq!(!Signal::True, Signal::False);
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("1".parse::<Signal>(), Ok(Signal::True));
        assert_eq!("x".parse::<Signal>(), Ok(Signal::Undefined));
        assert_eq!("Invalid".parse::<Signal>(), Ok(Signal::Invalid));
        assert_eq!("false".parse::<Signal>(), Ok(Signal::False));
        assert!("z".parse::<Signal>().is_err());
        let shown: String = ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(shown, "FIXT");
        let vcd: String = ALL.iter().map(|s| s.vcd_char()).collect();
        assert_eq!(vcd, "0ix1");
    }

    proptest! {
        #[test]
        fn false_dominates_and(
            mut values in proptest::collection::vec(any_signal(), 0..8),
            pos in 0usize..8,
        ) {
            let pos = pos.min(values.len());
            values.insert(pos, Signal::False);
            prop_assert_eq!(combine_and(&values), Ok(Signal::False));
        }

        #[test]
        fn true_dominates_or(
            mut values in proptest::collection::vec(any_signal(), 0..8),
            pos in 0usize..8,
        ) {
            let pos = pos.min(values.len());
            values.insert(pos, Signal::True);
            prop_assert_eq!(combine_or(&values), Ok(Signal::True));
        }

        #[test]
        fn folds_ignore_order(values in proptest::collection::vec(any_signal(), 1..8)) {
            let mut reversed = values.clone();
            reversed.reverse();
            prop_assert_eq!(combine_and(&values), combine_and(&reversed));
            prop_assert_eq!(combine_or(&values), combine_or(&reversed));
        }

        #[test]
        fn double_negation_is_identity(signal in any_signal()) {
            prop_assert_eq!(negate(negate(signal)), signal);
        }
    }
}
