//! JSON circuit persistence

use std::io::{Read, Write};

use fxhash::FxHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::circuit::{Circuit, Edge, Node, NodeId};
use crate::io::IoError;

/// Current on-disk schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Serialized form of a circuit and its saved input values
#[derive(Debug, Serialize, Deserialize)]
struct CircuitFile {
    version: u32,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(default)]
    input_values: Vec<(NodeId, bool)>,
}

/// Read a circuit and its saved input values from JSON
pub fn read_circuit<R: Read>(r: R) -> Result<(Circuit, FxHashMap<NodeId, bool>), IoError> {
    let file: CircuitFile = serde_json::from_reader(r)?;
    if file.version > SCHEMA_VERSION {
        return Err(IoError::UnsupportedVersion(file.version));
    }
    let circuit = Circuit::from_parts(file.nodes, file.edges);
    let inputs = file.input_values.into_iter().collect();
    Ok((circuit, inputs))
}

/// Write a circuit and its saved input values as JSON
pub fn write_circuit<W: Write>(
    w: W,
    circuit: &Circuit,
    inputs: &FxHashMap<NodeId, bool>,
) -> Result<(), IoError> {
    let file = CircuitFile {
        version: SCHEMA_VERSION,
        nodes: circuit.nodes().to_vec(),
        edges: circuit.edges().to_vec(),
        input_values: inputs
            .iter()
            .map(|(id, v)| (*id, *v))
            .sorted()
            .collect(),
    };
    serde_json::to_writer_pretty(w, &file)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::GateKind;

    #[test]
    fn test_round_trip() {
        let mut c = Circuit::new();
        let a = c.add_input("A");
        let b = c.add_input("B");
        let g = c.add_gate(GateKind::Nand);
        let o = c.add_output_node("F");
        c.connect(a, g, 0);
        c.connect(b, g, 1);
        c.connect(g, o, 0);
        let mut inputs = FxHashMap::default();
        inputs.insert(a, true);

        let mut buf = Vec::new();
        write_circuit(&mut buf, &c, &inputs).unwrap();
        let (loaded, loaded_inputs) = read_circuit(buf.as_slice()).unwrap();
        assert_eq!(loaded.nodes(), c.nodes());
        assert_eq!(loaded.edges(), c.edges());
        assert_eq!(loaded_inputs, inputs);

        // Id counters must resume past the loaded ids
        let mut loaded = loaded;
        let next = loaded.add_input("C");
        assert!(next.0 > o.0);
    }

    #[test]
    fn test_future_version_rejected() {
        let json = r#"{"version": 99, "nodes": [], "edges": []}"#;
        match read_circuit(json.as_bytes()) {
            Err(IoError::UnsupportedVersion(99)) => {}
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_input_values_defaults_empty() {
        let json = r#"{"version": 1, "nodes": [], "edges": []}"#;
        let (circuit, inputs) = read_circuit(json.as_bytes()).unwrap();
        assert_eq!(circuit.nb_nodes(), 0);
        assert!(inputs.is_empty());
    }
}
