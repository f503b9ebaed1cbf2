//! Sequential state transition for registers

use crate::circuit::GateKind;

/// Next bit of a register, from its current bit and its input snapshots
///
/// Inputs are ordered by handle index: D_FF (D, CLK), T_FF (T, CLK),
/// JK_FF (J, K, CLK), SR_LATCH (S, R). Edge-triggered kinds transition only
/// on a rising clock edge: clock true in `now` and false in `prev`. The SR
/// latch is level-triggered; both S and R high forces false, the documented
/// invalid-state policy. Missing inputs read as false; a non-register kind
/// holds its value.
pub fn register_next(kind: GateKind, current: bool, now: &[bool], prev: &[bool]) -> bool {
    match kind {
        GateKind::DFlipFlop => {
            if rising(now, prev, 1) {
                at(now, 0)
            } else {
                current
            }
        }
        GateKind::TFlipFlop => {
            if rising(now, prev, 1) {
                current ^ at(now, 0)
            } else {
                current
            }
        }
        GateKind::JkFlipFlop => {
            if rising(now, prev, 2) {
                match (at(now, 0), at(now, 1)) {
                    (true, true) => !current,
                    (true, false) => true,
                    (false, true) => false,
                    (false, false) => current,
                }
            } else {
                current
            }
        }
        GateKind::SrLatch => match (at(now, 0), at(now, 1)) {
            (true, true) => false,
            (true, false) => true,
            (false, true) => false,
            (false, false) => current,
        },
        _ => current,
    }
}

fn at(values: &[bool], index: usize) -> bool {
    values.get(index).copied().unwrap_or(false)
}

fn rising(now: &[bool], prev: &[bool], clock: usize) -> bool {
    at(now, clock) && !at(prev, clock)
}
