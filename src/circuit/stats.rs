//! Compute per-kind node counts
//!
//! ```
//! # use breadboard::Circuit;
//! # let circuit = Circuit::new();
//! use breadboard::circuit::stats::stats;
//! let stats = stats(&circuit);
//! assert_eq!(stats.nb_registers, 0);
//! println!("{}", stats);
//! ```

use std::fmt;

use crate::circuit::graph::Circuit;
use crate::circuit::node::GateKind;

/// Number of terminals, gates, registers and ICs in a circuit
#[derive(Debug, Clone, Default)]
pub struct CircuitStats {
    /// Number of primary inputs
    pub nb_inputs: usize,
    /// Number of primary outputs
    pub nb_outputs: usize,
    /// Number of clock sources
    pub nb_clocks: usize,
    /// Number of And gates
    pub nb_and: usize,
    /// Number of Or gates
    pub nb_or: usize,
    /// Number of Not gates
    pub nb_not: usize,
    /// Number of Nand gates
    pub nb_nand: usize,
    /// Number of Nor gates
    pub nb_nor: usize,
    /// Number of Xor gates
    pub nb_xor: usize,
    /// Number of Xnor gates
    pub nb_xnor: usize,
    /// Number of registers of any kind
    pub nb_registers: usize,
    /// Number of IC instances
    pub nb_ics: usize,
}

impl CircuitStats {
    /// Total number of combinational gates
    pub fn nb_gates(&self) -> usize {
        self.nb_and
            + self.nb_or
            + self.nb_not
            + self.nb_nand
            + self.nb_nor
            + self.nb_xor
            + self.nb_xnor
    }
}

impl fmt::Display for CircuitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stats:")?;
        writeln!(f, "  Inputs: {}", self.nb_inputs)?;
        writeln!(f, "  Outputs: {}", self.nb_outputs)?;
        if self.nb_clocks != 0 {
            writeln!(f, "  Clocks: {}", self.nb_clocks)?;
        }
        writeln!(f, "  Gates: {}", self.nb_gates())?;
        let gates = [
            ("And", self.nb_and),
            ("Or", self.nb_or),
            ("Not", self.nb_not),
            ("Nand", self.nb_nand),
            ("Nor", self.nb_nor),
            ("Xor", self.nb_xor),
            ("Xnor", self.nb_xnor),
        ];
        for (name, nb) in gates {
            if nb != 0 {
                writeln!(f, "      {}: {}", name, nb)?;
            }
        }
        if self.nb_registers != 0 {
            writeln!(f, "  Registers: {}", self.nb_registers)?;
        }
        if self.nb_ics != 0 {
            writeln!(f, "  ICs: {}", self.nb_ics)?;
        }
        fmt::Result::Ok(())
    }
}

/// Compute the statistics of the circuit
pub fn stats(circuit: &Circuit) -> CircuitStats {
    use GateKind::*;
    let mut ret = CircuitStats::default();
    for node in circuit.nodes() {
        match node.kind {
            Input => ret.nb_inputs += 1,
            Output => ret.nb_outputs += 1,
            Clock => ret.nb_clocks += 1,
            And => ret.nb_and += 1,
            Or => ret.nb_or += 1,
            Not => ret.nb_not += 1,
            Nand => ret.nb_nand += 1,
            Nor => ret.nb_nor += 1,
            Xor => ret.nb_xor += 1,
            Xnor => ret.nb_xnor += 1,
            DFlipFlop | JkFlipFlop | TFlipFlop | SrLatch => ret.nb_registers += 1,
            Ic(_) => ret.nb_ics += 1,
        }
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Circuit;

    #[test]
    fn test_counts() {
        let mut c = Circuit::new();
        c.add_input("A");
        c.add_input("B");
        c.add_gate(GateKind::And);
        c.add_gate(GateKind::Xor);
        c.add_gate(GateKind::DFlipFlop);
        c.add_output_node("F");
        c.add_clock();

        let s = stats(&c);
        assert_eq!(s.nb_inputs, 2);
        assert_eq!(s.nb_outputs, 1);
        assert_eq!(s.nb_clocks, 1);
        assert_eq!(s.nb_and, 1);
        assert_eq!(s.nb_xor, 1);
        assert_eq!(s.nb_registers, 1);
        assert_eq!(s.nb_gates(), 2);
    }
}
