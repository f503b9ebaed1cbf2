//! Circuit graph data model: nodes, edges, handles, builder and state

pub mod graph;
pub mod node;
pub mod state;
pub mod stats;

pub use graph::{primary_output_handle, Circuit};
pub use node::{
    ic_input_handle, ic_output_handle, input_handle, Edge, EdgeId, GateKind, Node, NodeId,
    OUTPUT_HANDLE, Q_BAR_HANDLE, Q_HANDLE,
};
pub use state::{handle_value, CircuitState, NodeOutputs, StateEntry};
