//! One evaluation pass over a circuit

use fxhash::FxHashMap;

use crate::circuit::{
    handle_value, ic_input_handle, ic_output_handle, input_handle, Circuit, CircuitState,
    GateKind, Node, NodeId, NodeOutputs, OUTPUT_HANDLE, Q_BAR_HANDLE, Q_HANDLE,
};
use crate::eval::gate::eval_gate;
use crate::eval::seq::register_next;
use crate::eval::topo::resolve_order;
use crate::ic::{IcId, IcLibrary};

/// Everything produced by one evaluation pass
#[derive(Debug, Clone, Default)]
pub struct EvaluationResult {
    /// Value of every handle of every node
    pub node_outputs: NodeOutputs,
    /// Value of every OUTPUT node
    pub circuit_outputs: FxHashMap<NodeId, bool>,
    /// Whether a combinational cycle prevented evaluation
    pub has_cycle: bool,
    /// Nodes involved in the combinational cycle, if any
    pub cycle_nodes: Vec<NodeId>,
    /// Register state to commit when the clock is explicitly advanced
    pub next_state: CircuitState,
}

/// Evaluate a circuit once
///
/// Seeds INPUT and CLOCK nodes from `inputs` and registers from `state`,
/// walks the resolved topological order, and computes the next-tick state of
/// every register from the freshly computed snapshot plus `prev_outputs`
/// (needed for clock edge detection). The committed state is never mutated:
/// callers apply `next_state` only when explicitly advancing the clock.
///
/// A combinational cycle is reported through `has_cycle`/`cycle_nodes` with
/// all outputs left empty; it is not an error.
pub fn evaluate(
    circuit: &Circuit,
    inputs: &FxHashMap<NodeId, bool>,
    state: &CircuitState,
    prev_outputs: &NodeOutputs,
    library: &IcLibrary,
) -> EvaluationResult {
    let evaluator = Evaluator {
        circuit,
        inputs,
        state,
        prev_outputs,
        library,
        drivers: driver_index(circuit),
        outputs: NodeOutputs::default(),
        circuit_outputs: FxHashMap::default(),
        next_state: CircuitState::new(),
    };
    evaluator.run()
}

/// First edge registered for each (target, handle) pair wins when several drive it
pub(crate) fn driver_index(circuit: &Circuit) -> FxHashMap<(NodeId, String), (NodeId, String)> {
    let mut drivers = FxHashMap::default();
    for edge in circuit.edges() {
        drivers
            .entry((edge.target, edge.target_handle.clone()))
            .or_insert_with(|| (edge.source, edge.source_handle.clone()));
    }
    drivers
}

struct Evaluator<'a> {
    circuit: &'a Circuit,
    inputs: &'a FxHashMap<NodeId, bool>,
    state: &'a CircuitState,
    prev_outputs: &'a NodeOutputs,
    library: &'a IcLibrary,
    drivers: FxHashMap<(NodeId, String), (NodeId, String)>,
    outputs: NodeOutputs,
    circuit_outputs: FxHashMap<NodeId, bool>,
    next_state: CircuitState,
}

impl<'a> Evaluator<'a> {
    fn run(mut self) -> EvaluationResult {
        let order = match resolve_order(self.circuit) {
            Ok(order) => order,
            Err(cycle) => {
                return EvaluationResult {
                    has_cycle: true,
                    cycle_nodes: cycle,
                    ..Default::default()
                }
            }
        };
        self.seed_sources();
        let circuit = self.circuit;
        for id in order {
            let Some(node) = circuit.node(id) else {
                continue;
            };
            match node.kind {
                GateKind::Input | GateKind::Clock => {}
                GateKind::Output => {
                    let value = self.input_value(&self.outputs, node.id, &input_handle(0));
                    self.publish(node.id, [(OUTPUT_HANDLE.to_string(), value)]);
                    self.circuit_outputs.insert(node.id, value);
                }
                GateKind::Ic(def) => self.eval_ic(node, def),
                kind if kind.is_register() => {}
                kind => {
                    let input_values: Vec<bool> = (0..node.num_inputs)
                        .map(|i| self.input_value(&self.outputs, node.id, &input_handle(i)))
                        .collect();
                    let value = eval_gate(kind, &input_values);
                    self.publish(node.id, [(OUTPUT_HANDLE.to_string(), value)]);
                }
            }
        }
        self.compute_next_state();
        EvaluationResult {
            node_outputs: self.outputs,
            circuit_outputs: self.circuit_outputs,
            has_cycle: false,
            cycle_nodes: Vec::new(),
            next_state: self.next_state,
        }
    }

    /// Publish values for INPUT, CLOCK and register nodes before the walk
    fn seed_sources(&mut self) {
        let circuit = self.circuit;
        for node in circuit.nodes() {
            match node.kind {
                GateKind::Input | GateKind::Clock => {
                    let value = self.inputs.get(&node.id).copied().unwrap_or(false);
                    self.publish(node.id, [(OUTPUT_HANDLE.to_string(), value)]);
                }
                kind if kind.is_register() => {
                    let bit = self.state.bit(node.id);
                    self.publish(
                        node.id,
                        [
                            (Q_HANDLE.to_string(), bit),
                            (OUTPUT_HANDLE.to_string(), bit),
                            (Q_BAR_HANDLE.to_string(), !bit),
                        ],
                    );
                }
                _ => {}
            }
        }
    }

    /// Value driving an input handle, resolved against the given snapshot
    fn input_value(&self, snapshot: &NodeOutputs, node: NodeId, handle: &str) -> bool {
        match self.drivers.get(&(node, handle.to_string())) {
            Some((source, source_handle)) => handle_value(snapshot, *source, source_handle),
            None => false,
        }
    }

    fn publish<I: IntoIterator<Item = (String, bool)>>(&mut self, node: NodeId, handles: I) {
        self.outputs.insert(node, handles.into_iter().collect());
    }

    /// Evaluate an IC instance by recursing into its definition's circuit
    fn eval_ic(&mut self, node: &Node, def_id: IcId) {
        let Some(def) = self.library.get(def_id) else {
            // Dangling definition: expose no handles, every read degrades to false
            self.outputs.insert(node.id, FxHashMap::default());
            return;
        };

        let mut pin_inputs = FxHashMap::default();
        let mut prev_pin_inputs = FxHashMap::default();
        for pin in def.inputs() {
            let handle = ic_input_handle(pin.node);
            pin_inputs.insert(pin.node, self.input_value(&self.outputs, node.id, &handle));
            prev_pin_inputs.insert(
                pin.node,
                self.input_value(self.prev_outputs, node.id, &handle),
            );
        }
        let nested_state = self.state.nested(node.id).cloned().unwrap_or_default();

        // Rebuild the previous-tick view of the nested circuit so registers
        // inside the definition can detect clock edges.
        let prev_nested = if self.prev_outputs.contains_key(&node.id) {
            evaluate(
                def.circuit(),
                &prev_pin_inputs,
                &nested_state,
                &NodeOutputs::default(),
                self.library,
            )
            .node_outputs
        } else {
            NodeOutputs::default()
        };
        let result = evaluate(
            def.circuit(),
            &pin_inputs,
            &nested_state,
            &prev_nested,
            self.library,
        );

        let mut handles = FxHashMap::default();
        for pin in def.outputs() {
            let value = result
                .circuit_outputs
                .get(&pin.node)
                .copied()
                .unwrap_or(false);
            handles.insert(ic_output_handle(pin.node), value);
        }
        self.outputs.insert(node.id, handles);
        if !result.next_state.is_empty() {
            self.next_state.set_nested(node.id, result.next_state);
        }
    }

    /// Next-tick bit for every register at this level, from current and previous snapshots
    fn compute_next_state(&mut self) {
        let circuit = self.circuit;
        for node in circuit.nodes() {
            if !node.kind.is_register() {
                continue;
            }
            let arity = node.kind.default_arity();
            let now: Vec<bool> = (0..arity)
                .map(|i| self.input_value(&self.outputs, node.id, &input_handle(i)))
                .collect();
            let prev: Vec<bool> = (0..arity)
                .map(|i| self.input_value(self.prev_outputs, node.id, &input_handle(i)))
                .collect();
            let next = register_next(node.kind, self.state.bit(node.id), &now, &prev);
            self.next_state.set_bit(node.id, next);
        }
    }
}
