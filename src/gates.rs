use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::signal::{combine_and, combine_or, negate, Signal};

/// Combinational rule mapping a gate's input levels to its output level.
///
/// Implementations must be pure and total over non-empty inputs. The
/// scheduler only ever talks to gates through this trait.
pub trait TransferFunction {
    /// Short lowercase tag, used to name unnamed gates.
    fn tag(&self) -> &'static str;

    fn evaluate(&self, inputs: &[Signal]) -> Result<Signal, EvalError>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateKind {
    And,
    Or,
    Not,
    Buffer,
    Nand,
    Nor,
    Xor,
    Xnor,
}

fn single(inputs: &[Signal]) -> Result<Signal, EvalError> {
    match inputs {
        [input] => Ok(*input),
        _ => Err(EvalError::Arity {
            expected: 1,
            found: inputs.len(),
        }),
    }
}

fn xor2(a: Signal, b: Signal) -> Signal {
    (a & !b) | (!a & b)
}

fn combine_xor(inputs: &[Signal]) -> Result<Signal, EvalError> {
    let (first, rest) = inputs.split_first().ok_or(EvalError::EmptyInput)?;
    Ok(rest.iter().fold(*first, |acc, val| xor2(acc, *val)))
}

impl TransferFunction for GateKind {
    fn tag(&self) -> &'static str {
        match self {
            GateKind::And => "and",
            GateKind::Or => "or",
            GateKind::Not => "not",
            GateKind::Buffer => "buf",
            GateKind::Nand => "nand",
            GateKind::Nor => "nor",
            GateKind::Xor => "xor",
            GateKind::Xnor => "xnor",
        }
    }

    fn evaluate(&self, inputs: &[Signal]) -> Result<Signal, EvalError> {
        match self {
            GateKind::And => combine_and(inputs),
            GateKind::Or => combine_or(inputs),
            GateKind::Not => single(inputs).map(negate),
            GateKind::Buffer => single(inputs),
            GateKind::Nand => combine_and(inputs).map(negate),
            GateKind::Nor => combine_or(inputs).map(negate),
            GateKind::Xor => combine_xor(inputs),
            GateKind::Xnor => combine_xor(inputs).map(negate),
        }
    }
}
