//! Nodes, edges and handle names

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::ic::IcId;

/// Identifier of a node within a circuit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Identifier of an edge within a circuit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Kind of a node: combinational gate, terminal, register or IC instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// N-input conjunction
    And,
    /// N-input disjunction
    Or,
    /// Single-input negation
    Not,
    /// Negated conjunction
    Nand,
    /// Negated disjunction
    Nor,
    /// Odd parity
    Xor,
    /// Even parity
    Xnor,
    /// Primary input terminal
    Input,
    /// Primary output terminal
    Output,
    /// Circuit-wide clock source
    Clock,
    /// D flip-flop, inputs (D, CLK)
    DFlipFlop,
    /// JK flip-flop, inputs (J, K, CLK)
    JkFlipFlop,
    /// Toggle flip-flop, inputs (T, CLK)
    TFlipFlop,
    /// Level-triggered SR latch, inputs (S, R)
    SrLatch,
    /// Black-box instance of an IC definition
    Ic(IcId),
}

impl GateKind {
    /// Return whether the node holds a bit of state across ticks
    pub fn is_register(self) -> bool {
        matches!(
            self,
            GateKind::DFlipFlop | GateKind::JkFlipFlop | GateKind::TFlipFlop | GateKind::SrLatch
        )
    }

    /// Return whether the node computes a pure combinational function
    pub fn is_combinational(self) -> bool {
        matches!(
            self,
            GateKind::And
                | GateKind::Or
                | GateKind::Not
                | GateKind::Nand
                | GateKind::Nor
                | GateKind::Xor
                | GateKind::Xnor
        )
    }

    /// Return whether the node's value is seeded by the caller each evaluation
    pub fn is_source(self) -> bool {
        matches!(self, GateKind::Input | GateKind::Clock)
    }

    /// Declared input arity; IC instances derive theirs from the definition instead
    pub fn default_arity(self) -> usize {
        use GateKind::*;
        match self {
            Not | Output => 1,
            Input | Clock | Ic(_) => 0,
            DFlipFlop | TFlipFlop | SrLatch => 2,
            JkFlipFlop => 3,
            And | Or | Nand | Nor | Xor | Xnor => 2,
        }
    }

    /// Index of the clock input handle for edge-triggered registers
    pub fn clock_input(self) -> Option<usize> {
        match self {
            GateKind::DFlipFlop | GateKind::TFlipFlop => Some(1),
            GateKind::JkFlipFlop => Some(2),
            _ => None,
        }
    }

    /// Conventional name of an input handle, for registers
    pub fn input_role(self, index: usize) -> Option<&'static str> {
        let roles: &[&str] = match self {
            GateKind::DFlipFlop => &["D", "CLK"],
            GateKind::TFlipFlop => &["T", "CLK"],
            GateKind::JkFlipFlop => &["J", "K", "CLK"],
            GateKind::SrLatch => &["S", "R"],
            _ => return None,
        };
        roles.get(index).copied()
    }

    pub(crate) fn label_prefix(self) -> &'static str {
        use GateKind::*;
        match self {
            And => "and",
            Or => "or",
            Not => "not",
            Nand => "nand",
            Nor => "nor",
            Xor => "xor",
            Xnor => "xnor",
            Input => "in",
            Output => "out",
            Clock => "clk",
            DFlipFlop => "dff",
            JkFlipFlop => "jkff",
            TFlipFlop => "tff",
            SrLatch => "sr",
            Ic(_) => "ic",
        }
    }
}

/// A node of the circuit graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Identity within the circuit
    pub id: NodeId,
    /// Behaviour of the node
    pub kind: GateKind,
    /// Display label; also used to order truth table columns
    pub label: String,
    /// Declared number of input handles
    pub num_inputs: usize,
}

/// A directed connection from an output handle to an input handle
///
/// Several edges may target the same input handle; this is reported as a
/// multiple-drivers diagnostic, not rejected by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Identity within the circuit
    pub id: EdgeId,
    /// Driving node
    pub source: NodeId,
    /// Output handle on the driving node
    pub source_handle: String,
    /// Driven node
    pub target: NodeId,
    /// Input handle on the driven node
    pub target_handle: String,
}

/// Generic output handle exposed by gates and terminals
pub const OUTPUT_HANDLE: &str = "output";
/// Register output handle
pub const Q_HANDLE: &str = "Q";
/// Complement register output handle
pub const Q_BAR_HANDLE: &str = "Q_bar";

/// Name of the input handle at the given index
pub fn input_handle(index: usize) -> String {
    format!("input-{}", index)
}

/// External input handle of an IC instance for one of its input pins
pub fn ic_input_handle(pin: NodeId) -> String {
    format!("ic-in-{}", pin.0)
}

/// External output handle of an IC instance for one of its output pins
pub fn ic_output_handle(pin: NodeId) -> String {
    format!("ic-out-{}", pin.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classes() {
        assert!(GateKind::DFlipFlop.is_register());
        assert!(GateKind::SrLatch.is_register());
        assert!(!GateKind::And.is_register());
        assert!(GateKind::Xnor.is_combinational());
        assert!(!GateKind::Clock.is_combinational());
        assert!(GateKind::Input.is_source());
        assert!(!GateKind::Output.is_source());
    }

    #[test]
    fn test_arities() {
        assert_eq!(GateKind::And.default_arity(), 2);
        assert_eq!(GateKind::Not.default_arity(), 1);
        assert_eq!(GateKind::JkFlipFlop.default_arity(), 3);
        assert_eq!(GateKind::SrLatch.default_arity(), 2);
        assert_eq!(GateKind::Input.default_arity(), 0);
    }

    #[test]
    fn test_clock_inputs() {
        assert_eq!(GateKind::DFlipFlop.clock_input(), Some(1));
        assert_eq!(GateKind::JkFlipFlop.clock_input(), Some(2));
        assert_eq!(GateKind::SrLatch.clock_input(), None);
        assert_eq!(GateKind::And.clock_input(), None);
    }

    #[test]
    fn test_handles() {
        assert_eq!(input_handle(0), "input-0");
        assert_eq!(ic_input_handle(NodeId(3)), "ic-in-3");
        assert_eq!(ic_output_handle(NodeId(7)), "ic-out-7");
    }
}
