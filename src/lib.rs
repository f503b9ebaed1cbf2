//! Digital logic circuit evaluation and analysis
//!
//! This crate provides the evaluation engine behind a breadboard-style logic
//! circuit editor: gates, flip-flops, reusable packaged ICs, truth tables,
//! Boolean expression extraction and structural diagnostics.
//!
//! # Usage
//!
//! Circuits are plain directed graphs of typed nodes. Evaluation is pure:
//! it never mutates the circuit or the committed register state, and instead
//! returns the next state for the caller to commit when the clock advances.
//!
//! ```
//! use breadboard::{evaluate, Circuit, CircuitState, GateKind, NodeOutputs};
//! use breadboard::ic::IcLibrary;
//! use fxhash::FxHashMap;
//!
//! let mut circuit = Circuit::new();
//! let a = circuit.add_input("A");
//! let b = circuit.add_input("B");
//! let gate = circuit.add_gate(GateKind::And);
//! let out = circuit.add_output_node("F");
//! circuit.connect(a, gate, 0);
//! circuit.connect(b, gate, 1);
//! circuit.connect(gate, out, 0);
//!
//! let mut inputs = FxHashMap::default();
//! inputs.insert(a, true);
//! inputs.insert(b, true);
//! let result = evaluate(
//!     &circuit,
//!     &inputs,
//!     &CircuitState::new(),
//!     &NodeOutputs::default(),
//!     &IcLibrary::new(),
//! );
//! assert_eq!(result.circuit_outputs[&out], true);
//! ```
//!
//! Sequential circuits carry a [`CircuitState`] with one bit per register,
//! plus nested state for registers inside IC instances. Edge-triggered
//! flip-flops detect clock edges by comparing against the previous
//! evaluation snapshot, so simulation loops feed each tick's `node_outputs`
//! back in as `prev_outputs`.
//!
//! The binary exposes the same features on circuit files:
//! ```bash
//! # Statistics and diagnostics
//! breadboard show design.json
//! # Truth table and sum-of-products expressions
//! breadboard table design.json --sop
//! # Boolean expression per output
//! breadboard expr design.json
//! # Simulate 16 random ticks
//! breadboard sim design.json
//! ```

#![warn(missing_docs)]

pub mod analysis;
pub mod circuit;
pub mod cmd;
pub mod eval;
pub mod history;
pub mod ic;
pub mod io;

pub use circuit::{Circuit, CircuitState, Edge, EdgeId, GateKind, Node, NodeId, NodeOutputs};
pub use eval::{evaluate, EvaluationResult};
pub use history::SignalHistory;
pub use ic::{IcDefinition, IcId, IcLibrary};
