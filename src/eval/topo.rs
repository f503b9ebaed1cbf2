//! Topological ordering of combinational dependencies

use std::collections::VecDeque;

use fxhash::{FxHashMap, FxHashSet};

use crate::circuit::{Circuit, NodeId};

/// Compute an evaluation order for the circuit
///
/// Edges driven by a register do not count toward dependencies: register
/// outputs are available at the start of a step, which is what allows
/// feedback loops through registers. Nodes are processed in FIFO order with
/// insertion-order tie-break. On failure the error lists exactly the nodes
/// involved in a combinational cycle, in insertion order.
pub fn resolve_order(circuit: &Circuit) -> Result<Vec<NodeId>, Vec<NodeId>> {
    let mut indeg: FxHashMap<NodeId, usize> = FxHashMap::default();
    for node in circuit.nodes() {
        indeg.insert(node.id, 0);
    }
    let mut succ: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
    for edge in circuit.edges() {
        let Some(source) = circuit.node(edge.source) else {
            continue;
        };
        if source.kind.is_register() {
            continue;
        }
        let Some(d) = indeg.get_mut(&edge.target) else {
            continue;
        };
        *d += 1;
        succ.entry(edge.source).or_default().push(edge.target);
    }

    let mut queue: VecDeque<NodeId> = circuit
        .nodes()
        .iter()
        .filter(|n| indeg[&n.id] == 0)
        .map(|n| n.id)
        .collect();
    let mut order = Vec::with_capacity(circuit.nb_nodes());
    while let Some(id) = queue.pop_front() {
        order.push(id);
        let Some(targets) = succ.get(&id) else {
            continue;
        };
        for target in targets {
            let d = indeg.get_mut(target).unwrap();
            *d -= 1;
            if *d == 0 {
                queue.push_back(*target);
            }
        }
    }

    if order.len() == circuit.nb_nodes() {
        Ok(order)
    } else {
        let ordered: FxHashSet<NodeId> = order.into_iter().collect();
        Err(circuit
            .nodes()
            .iter()
            .map(|n| n.id)
            .filter(|id| !ordered.contains(id))
            .collect())
    }
}
