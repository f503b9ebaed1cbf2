//! Pure combinational gate semantics

use crate::circuit::GateKind;

/// Truth function of a combinational gate over an ordered list of inputs
///
/// Xor is odd parity and Xnor even parity, for any arity. Any kind that is
/// not a combinational gate yields false; this silent default is part of the
/// contract, not an accident.
pub fn eval_gate(kind: GateKind, inputs: &[bool]) -> bool {
    match kind {
        GateKind::And => inputs.iter().all(|v| *v),
        GateKind::Or => inputs.iter().any(|v| *v),
        GateKind::Not => !inputs.first().copied().unwrap_or(false),
        GateKind::Nand => !inputs.iter().all(|v| *v),
        GateKind::Nor => !inputs.iter().any(|v| *v),
        GateKind::Xor => inputs.iter().filter(|v| **v).count() % 2 == 1,
        GateKind::Xnor => inputs.iter().filter(|v| **v).count() % 2 == 0,
        _ => false,
    }
}
