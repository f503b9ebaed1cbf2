//! Boolean expression extraction by backward graph trace
//!
//! Expressions are structural: they follow driver chains independently of any
//! generated truth table. Registers and IC instances appear as opaque tokens
//! named after their label, since their value is not a combinational function
//! of the inputs.

use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;

use crate::circuit::{input_handle, Circuit, GateKind, Node, NodeId};
use crate::eval::driver_index;

/// Placeholder emitted when the trace meets a combinational cycle
pub const CYCLE_PLACEHOLDER: &str = "…";

/// Expression string for every OUTPUT node, ordered by label
pub fn output_expressions(circuit: &Circuit) -> Vec<(String, String)> {
    let tracer = Tracer::new(circuit);
    crate::analysis::table::labeled_nodes(circuit, GateKind::Output)
        .into_iter()
        .map(|n| {
            let mut visited = FxHashSet::default();
            (n.label.clone(), tracer.trace_input(n.id, 0, &mut visited).text)
        })
        .collect()
}

/// Expression string for one OUTPUT node, or None if it is not an output
pub fn expression_for(circuit: &Circuit, output: NodeId) -> Option<String> {
    let node = circuit.node(output)?;
    if node.kind != GateKind::Output {
        return None;
    }
    let tracer = Tracer::new(circuit);
    let mut visited = FxHashSet::default();
    Some(tracer.trace_input(output, 0, &mut visited).text)
}

struct Tracer<'a> {
    circuit: &'a Circuit,
    drivers: FxHashMap<(NodeId, String), (NodeId, String)>,
}

/// A rendered sub-expression; atoms never need parentheses
struct Expr {
    text: String,
    atomic: bool,
}

impl Expr {
    fn atom(text: impl Into<String>) -> Expr {
        Expr {
            text: text.into(),
            atomic: true,
        }
    }

    fn composite(text: String) -> Expr {
        Expr {
            text,
            atomic: false,
        }
    }

    /// Text, parenthesized unless the expression is a single term
    fn grouped(&self) -> String {
        if self.atomic {
            self.text.clone()
        } else {
            format!("({})", self.text)
        }
    }
}

impl<'a> Tracer<'a> {
    fn new(circuit: &'a Circuit) -> Tracer<'a> {
        Tracer {
            circuit,
            drivers: driver_index(circuit),
        }
    }

    /// Trace whatever drives an input handle; an undriven handle reads 0
    fn trace_input(&self, node: NodeId, index: usize, visited: &mut FxHashSet<NodeId>) -> Expr {
        match self.drivers.get(&(node, input_handle(index))) {
            Some((source, _)) => self.trace(*source, visited),
            None => Expr::atom("0"),
        }
    }

    fn trace(&self, id: NodeId, visited: &mut FxHashSet<NodeId>) -> Expr {
        let Some(node) = self.circuit.node(id) else {
            return Expr::atom("0");
        };
        if !visited.insert(id) {
            return Expr::atom(CYCLE_PLACEHOLDER);
        }
        let expr = self.trace_node(node, visited);
        visited.remove(&id);
        expr
    }

    fn trace_node(&self, node: &Node, visited: &mut FxHashSet<NodeId>) -> Expr {
        match node.kind {
            GateKind::Input => Expr::atom(&node.label),
            GateKind::Clock => Expr::atom("CLK"),
            GateKind::DFlipFlop
            | GateKind::JkFlipFlop
            | GateKind::TFlipFlop
            | GateKind::SrLatch => Expr::atom(&node.label),
            GateKind::Ic(_) => Expr::atom(&node.label),
            GateKind::Output => self.trace_input(node.id, 0, visited),
            GateKind::Not => {
                let operand = self.trace_input(node.id, 0, visited);
                Expr::atom(format!("{}'", operand.grouped()))
            }
            GateKind::And => self.infix(node, "·", visited),
            GateKind::Or => self.infix(node, " + ", visited),
            GateKind::Xor => self.infix(node, "⊕", visited),
            GateKind::Xnor => self.infix(node, "⊙", visited),
            GateKind::Nand => Expr::atom(format!("({})'", self.operands(node, "·", visited))),
            GateKind::Nor => Expr::atom(format!("({})'", self.operands(node, " + ", visited))),
        }
    }

    fn infix(&self, node: &Node, op: &str, visited: &mut FxHashSet<NodeId>) -> Expr {
        Expr::composite(self.operands(node, op, visited))
    }

    fn operands(&self, node: &Node, op: &str, visited: &mut FxHashSet<NodeId>) -> String {
        (0..node.num_inputs)
            .map(|i| self.trace_input(node.id, i, visited).grouped())
            .join(op)
    }
}
