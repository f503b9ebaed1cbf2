//! Circuit graph snapshot and builder

use core::fmt;

use crate::circuit::node::{
    input_handle, Edge, EdgeId, GateKind, Node, NodeId, OUTPUT_HANDLE, Q_HANDLE,
};
use crate::ic::IcDefinition;

/// A snapshot of the circuit graph, with its own id counters
///
/// The counters belong to the circuit itself, so independent circuits never
/// interfere with each other's ids or default labels.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    next_node: u32,
    next_edge: u32,
}

impl Circuit {
    /// Create an empty circuit
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a circuit from loaded nodes and edges
    ///
    /// The id counters are re-seeded past the highest id present.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let next_node = nodes.iter().map(|n| n.id.0 + 1).max().unwrap_or(0);
        let next_edge = edges.iter().map(|e| e.id.0 + 1).max().unwrap_or(0);
        Circuit {
            nodes,
            edges,
            next_node,
            next_edge,
        }
    }

    /// Return the number of nodes
    pub fn nb_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of edges
    pub fn nb_edges(&self) -> usize {
        self.edges.len()
    }

    /// All nodes, in insertion order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges, in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up a node by id
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Replace the display label of a node
    pub fn set_label(&mut self, id: NodeId, label: &str) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            node.label = label.to_string();
        }
    }

    /// Add a node of the given kind and input arity, with a default label
    pub fn add_node(&mut self, kind: GateKind, num_inputs: usize) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        let label = format!("{}{}", kind.label_prefix(), id.0);
        self.nodes.push(Node {
            id,
            kind,
            label,
            num_inputs,
        });
        id
    }

    /// Add a gate or register with its default input arity
    pub fn add_gate(&mut self, kind: GateKind) -> NodeId {
        self.add_node(kind, kind.default_arity())
    }

    /// Add a labeled primary input
    pub fn add_input(&mut self, label: &str) -> NodeId {
        let id = self.add_node(GateKind::Input, 0);
        self.set_label(id, label);
        id
    }

    /// Add a labeled primary output
    pub fn add_output_node(&mut self, label: &str) -> NodeId {
        let id = self.add_node(GateKind::Output, 1);
        self.set_label(id, label);
        id
    }

    /// Add a clock source
    pub fn add_clock(&mut self) -> NodeId {
        self.add_node(GateKind::Clock, 0)
    }

    /// Add an instance of an IC definition; its arity follows the definition
    pub fn add_ic(&mut self, def: &IcDefinition) -> NodeId {
        let id = self.add_node(GateKind::Ic(def.id()), def.nb_inputs());
        self.set_label(id, def.name());
        id
    }

    /// Connect a node's primary output to an input handle by index
    pub fn connect(&mut self, source: NodeId, target: NodeId, input: usize) -> EdgeId {
        let handle = self
            .node(source)
            .map(|n| primary_output_handle(n.kind))
            .unwrap_or(OUTPUT_HANDLE);
        let target_handle = input_handle(input);
        self.connect_from(source, handle, target, &target_handle)
    }

    /// Connect two named handles
    pub fn connect_from(
        &mut self,
        source: NodeId,
        source_handle: &str,
        target: NodeId,
        target_handle: &str,
    ) -> EdgeId {
        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        self.edges.push(Edge {
            id,
            source,
            source_handle: source_handle.to_string(),
            target,
            target_handle: target_handle.to_string(),
        });
        id
    }
}

/// Name of the handle carrying a node's primary value
pub fn primary_output_handle(kind: GateKind) -> &'static str {
    if kind.is_register() {
        Q_HANDLE
    } else {
        OUTPUT_HANDLE
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Circuit with {} nodes, {} edges:",
            self.nb_nodes(),
            self.nb_edges()
        )?;
        for n in &self.nodes {
            writeln!(f, "\t{} = {:?} \"{}\"", n.id, n.kind, n.label)?;
        }
        for e in &self.edges {
            writeln!(
                f,
                "\t{}: {}.{} -> {}.{}",
                e.id, e.source, e.source_handle, e.target, e.target_handle
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let mut c = Circuit::new();
        let a = c.add_input("A");
        let b = c.add_input("B");
        let g = c.add_gate(GateKind::And);
        let o = c.add_output_node("F");
        c.connect(a, g, 0);
        c.connect(b, g, 1);
        c.connect(g, o, 0);

        assert_eq!(c.nb_nodes(), 4);
        assert_eq!(c.nb_edges(), 3);
        assert_eq!(c.node(a).unwrap().label, "A");
        assert_eq!(c.node(g).unwrap().num_inputs, 2);
        assert_eq!(c.edges()[0].target_handle, "input-0");
    }

    #[test]
    fn test_independent_counters() {
        let mut c1 = Circuit::new();
        let mut c2 = Circuit::new();
        let a1 = c1.add_input("A");
        let a2 = c2.add_input("A");
        // Two circuits never share counters
        assert_eq!(a1, a2);
        assert_eq!(c1.nb_nodes(), 1);
        assert_eq!(c2.nb_nodes(), 1);
    }

    #[test]
    fn test_register_source_handle() {
        let mut c = Circuit::new();
        let ff = c.add_gate(GateKind::DFlipFlop);
        let o = c.add_output_node("Q");
        c.connect(ff, o, 0);
        assert_eq!(c.edges()[0].source_handle, "Q");
    }

    #[test]
    fn test_from_parts_counters() {
        let mut c = Circuit::new();
        c.add_input("A");
        c.add_input("B");
        let mut rebuilt = Circuit::from_parts(c.nodes().to_vec(), c.edges().to_vec());
        let next = rebuilt.add_input("C");
        assert_eq!(next, NodeId(2));
    }
}
