//! Register state and evaluation outputs

use fxhash::FxHashMap;

use crate::circuit::node::{NodeId, OUTPUT_HANDLE, Q_HANDLE};

/// One entry of the committed state: a register bit, or the state of a nested IC
#[derive(Debug, Clone, PartialEq)]
pub enum StateEntry {
    /// A single register bit
    Bit(bool),
    /// The state of the registers and ICs inside an IC instance
    Nested(CircuitState),
}

/// Committed register state, keyed by node id
///
/// Owned by the caller across ticks. The engine reads it and returns a fresh
/// `next_state`; it never mutates the caller's copy. Missing entries read as
/// false.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CircuitState {
    entries: FxHashMap<NodeId, StateEntry>,
}

impl CircuitState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Return whether no node holds state
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the number of stateful nodes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Register bit for a node; missing or nested entries read as false
    pub fn bit(&self, id: NodeId) -> bool {
        matches!(self.entries.get(&id), Some(StateEntry::Bit(true)))
    }

    /// Nested state of an IC instance, if any
    pub fn nested(&self, id: NodeId) -> Option<&CircuitState> {
        match self.entries.get(&id) {
            Some(StateEntry::Nested(state)) => Some(state),
            _ => None,
        }
    }

    /// Set the register bit for a node
    pub fn set_bit(&mut self, id: NodeId, value: bool) {
        self.entries.insert(id, StateEntry::Bit(value));
    }

    /// Set the nested state of an IC instance
    pub fn set_nested(&mut self, id: NodeId, state: CircuitState) {
        self.entries.insert(id, StateEntry::Nested(state));
    }
}

/// Freshly computed handle values, per node then per handle name
pub type NodeOutputs = FxHashMap<NodeId, FxHashMap<String, bool>>;

/// Read a handle value from an outputs map
///
/// Falls back to the generic output handle, then Q, when the specific handle
/// is absent; an unknown node or handle reads as false.
pub fn handle_value(outputs: &NodeOutputs, node: NodeId, handle: &str) -> bool {
    let Some(handles) = outputs.get(&node) else {
        return false;
    };
    handles
        .get(handle)
        .or_else(|| handles.get(OUTPUT_HANDLE))
        .or_else(|| handles.get(Q_HANDLE))
        .copied()
        .unwrap_or(false)
}
