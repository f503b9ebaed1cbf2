//! Packaging sub-graphs into reusable IC definitions

use core::fmt;

use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::circuit::{Circuit, Edge, GateKind, NodeId};

/// Identifier of an IC definition in a library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IcId(pub u32);

impl fmt::Display for IcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ic{}", self.0)
    }
}

/// An input or output pin, bound to the terminal node it replaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcPin {
    /// Id of the INPUT/OUTPUT node inside the captured circuit
    pub node: NodeId,
    /// Display label of that node
    pub label: String,
}

/// A named, reusable packaged sub-graph with designated pins
///
/// Immutable after creation, except for removal from the library.
#[derive(Debug, Clone)]
pub struct IcDefinition {
    id: IcId,
    name: String,
    circuit: Circuit,
    inputs: Vec<IcPin>,
    outputs: Vec<IcPin>,
    color: String,
}

impl IcDefinition {
    /// Identity in the library
    pub fn id(&self) -> IcId {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display color
    pub fn color(&self) -> &str {
        &self.color
    }

    /// The captured sub-graph
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Input pins, in selection order
    pub fn inputs(&self) -> &[IcPin] {
        &self.inputs
    }

    /// Output pins, in selection order
    pub fn outputs(&self) -> &[IcPin] {
        &self.outputs
    }

    /// Number of input pins, which is the arity of instances
    pub fn nb_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Number of output pins
    pub fn nb_outputs(&self) -> usize {
        self.outputs.len()
    }
}

/// Reasons a selection cannot be packaged into a definition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IcError {
    /// The selection contained no nodes
    #[error("cannot package an empty selection")]
    EmptySelection,
    /// A selected node id is not present in the circuit
    #[error("selected node {0} does not exist in the circuit")]
    UnknownNode(NodeId),
    /// No INPUT node to become an input pin
    #[error("an IC needs at least one input node")]
    NoInputPins,
    /// No OUTPUT node to become an output pin
    #[error("an IC needs at least one output node")]
    NoOutputPins,
    /// The clock is a circuit-wide concept and cannot live inside an IC
    #[error("clock nodes cannot be packaged inside an IC")]
    ContainsClock,
    /// The definition would reference itself, directly or transitively
    #[error("definition '{0}' would reference itself")]
    SelfReference(String),
}

/// Ordered, id-addressable collection of IC definitions
#[derive(Debug, Clone, Default)]
pub struct IcLibrary {
    defs: Vec<IcDefinition>,
    next_id: u32,
}

impl IcLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Return whether the library holds no definition
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Definitions in creation order
    pub fn iter(&self) -> impl Iterator<Item = &IcDefinition> {
        self.defs.iter()
    }

    /// Look up a definition by id
    pub fn get(&self, id: IcId) -> Option<&IcDefinition> {
        self.defs.iter().find(|d| d.id == id)
    }

    /// Delete a definition; instances pointing at it degrade to constant false
    pub fn remove(&mut self, id: IcId) -> bool {
        let before = self.defs.len();
        self.defs.retain(|d| d.id != id);
        self.defs.len() != before
    }

    /// Validate a selection and package it into a new definition
    ///
    /// Captures the selected nodes and the edges whose both endpoints are
    /// selected. Pins are ordered by the order of `selection`. Definitions
    /// that would reference themselves, directly or through other
    /// definitions, are rejected rather than left to recurse forever at
    /// evaluation time.
    pub fn package(
        &mut self,
        name: &str,
        color: &str,
        circuit: &Circuit,
        selection: &[NodeId],
    ) -> Result<IcId, IcError> {
        if selection.is_empty() {
            return Err(IcError::EmptySelection);
        }
        let mut nodes = Vec::with_capacity(selection.len());
        for id in selection {
            let Some(node) = circuit.node(*id) else {
                return Err(IcError::UnknownNode(*id));
            };
            if node.kind == GateKind::Clock {
                return Err(IcError::ContainsClock);
            }
            nodes.push(node.clone());
        }
        let pins = |kind: GateKind| -> Vec<IcPin> {
            nodes
                .iter()
                .filter(|n| n.kind == kind)
                .map(|n| IcPin {
                    node: n.id,
                    label: n.label.clone(),
                })
                .collect()
        };
        let inputs = pins(GateKind::Input);
        let outputs = pins(GateKind::Output);
        if inputs.is_empty() {
            return Err(IcError::NoInputPins);
        }
        if outputs.is_empty() {
            return Err(IcError::NoOutputPins);
        }

        let selected: FxHashSet<NodeId> = selection.iter().copied().collect();
        let edges: Vec<Edge> = circuit
            .edges()
            .iter()
            .filter(|e| selected.contains(&e.source) && selected.contains(&e.target))
            .cloned()
            .collect();

        let def = IcDefinition {
            id: IcId(self.next_id),
            name: name.to_string(),
            circuit: Circuit::from_parts(nodes, edges),
            inputs,
            outputs,
            color: color.to_string(),
        };
        self.check_acyclic(&def)?;
        self.next_id += 1;
        let id = def.id;
        self.defs.push(def);
        Ok(id)
    }

    /// Walk the definition's IC references transitively, rejecting self-reference
    fn check_acyclic(&self, def: &IcDefinition) -> Result<(), IcError> {
        let mut to_visit = referenced_ids(def.circuit());
        let mut seen = FxHashSet::default();
        while let Some(id) = to_visit.pop() {
            if id == def.id {
                return Err(IcError::SelfReference(def.name.clone()));
            }
            if !seen.insert(id) {
                continue;
            }
            if let Some(next) = self.get(id) {
                to_visit.extend(referenced_ids(next.circuit()));
            }
        }
        Ok(())
    }
}

fn referenced_ids(circuit: &Circuit) -> Vec<IcId> {
    circuit
        .nodes()
        .iter()
        .filter_map(|n| match n.kind {
            GateKind::Ic(id) => Some(id),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_adder() -> (Circuit, Vec<NodeId>) {
        let mut c = Circuit::new();
        let a = c.add_input("A");
        let b = c.add_input("B");
        let x = c.add_gate(GateKind::Xor);
        let g = c.add_gate(GateKind::And);
        let s = c.add_output_node("S");
        let cy = c.add_output_node("C");
        c.connect(a, x, 0);
        c.connect(b, x, 1);
        c.connect(a, g, 0);
        c.connect(b, g, 1);
        c.connect(x, s, 0);
        c.connect(g, cy, 0);
        let selection = vec![a, b, x, g, s, cy];
        (c, selection)
    }

    #[test]
    fn test_package() {
        let (c, selection) = half_adder();
        let mut lib = IcLibrary::new();
        let id = lib.package("half_adder", "#336699", &c, &selection).unwrap();
        let def = lib.get(id).unwrap();
        assert_eq!(def.name(), "half_adder");
        assert_eq!(def.nb_inputs(), 2);
        assert_eq!(def.nb_outputs(), 2);
        // Pins keep the selection order
        assert_eq!(def.inputs()[0].label, "A");
        assert_eq!(def.inputs()[1].label, "B");
        assert_eq!(def.outputs()[0].label, "S");
        assert_eq!(def.outputs()[1].label, "C");
        assert_eq!(def.circuit().nb_nodes(), 6);
        assert_eq!(def.circuit().nb_edges(), 6);
    }

    #[test]
    fn test_partial_selection_drops_external_edges() {
        let (c, selection) = half_adder();
        // Leave out the And gate: its edges must not be captured
        let partial: Vec<NodeId> = selection
            .iter()
            .copied()
            .filter(|id| *id != selection[3])
            .collect();
        let mut lib = IcLibrary::new();
        let id = lib.package("partial", "#000000", &c, &partial).unwrap();
        let def = lib.get(id).unwrap();
        assert_eq!(def.circuit().nb_nodes(), 5);
        assert_eq!(def.circuit().nb_edges(), 3);
    }

    #[test]
    fn test_validation() {
        let (c, selection) = half_adder();
        let mut lib = IcLibrary::new();
        assert_eq!(
            lib.package("x", "#fff", &c, &[]),
            Err(IcError::EmptySelection)
        );
        assert_eq!(
            lib.package("x", "#fff", &c, &[NodeId(99)]),
            Err(IcError::UnknownNode(NodeId(99)))
        );
        // Gates only: no pins
        assert_eq!(
            lib.package("x", "#fff", &c, &selection[2..4]),
            Err(IcError::NoInputPins)
        );
        // Inputs only: no output pin
        assert_eq!(
            lib.package("x", "#fff", &c, &selection[0..2]),
            Err(IcError::NoOutputPins)
        );

        let mut with_clock = c.clone();
        let clk = with_clock.add_clock();
        let mut all = selection.clone();
        all.push(clk);
        assert_eq!(
            lib.package("x", "#fff", &with_clock, &all),
            Err(IcError::ContainsClock)
        );
    }

    #[test]
    fn test_self_reference_rejected() {
        // A selection containing an instance of the id about to be assigned
        let mut c = Circuit::new();
        let a = c.add_input("A");
        let ic = c.add_node(GateKind::Ic(IcId(0)), 1);
        let o = c.add_output_node("F");
        let mut lib = IcLibrary::new();
        assert_eq!(
            lib.package("loop", "#fff", &c, &[a, ic, o]),
            Err(IcError::SelfReference("loop".to_string()))
        );
    }

    #[test]
    fn test_transitive_self_reference_rejected() {
        // def 0 references the id that the next packaging would receive
        let mut c0 = Circuit::new();
        let a0 = c0.add_input("A");
        let fwd = c0.add_node(GateKind::Ic(IcId(1)), 1);
        let o0 = c0.add_output_node("F");
        let mut lib = IcLibrary::new();
        let first = lib.package("fwd", "#fff", &c0, &[a0, fwd, o0]).unwrap();

        let mut c1 = Circuit::new();
        let a1 = c1.add_input("A");
        let back = c1.add_node(GateKind::Ic(first), 1);
        let o1 = c1.add_output_node("F");
        assert_eq!(
            lib.package("back", "#fff", &c1, &[a1, back, o1]),
            Err(IcError::SelfReference("back".to_string()))
        );
    }

    #[test]
    fn test_remove() {
        let (c, selection) = half_adder();
        let mut lib = IcLibrary::new();
        let id = lib.package("half_adder", "#fff", &c, &selection).unwrap();
        assert!(lib.remove(id));
        assert!(!lib.remove(id));
        assert!(lib.get(id).is_none());
        assert!(lib.is_empty());
    }
}
