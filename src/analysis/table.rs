//! Exhaustive truth table generation

use core::fmt;

use fxhash::FxHashMap;
use itertools::Itertools;

use crate::circuit::{Circuit, CircuitState, GateKind, Node, NodeOutputs};
use crate::eval::evaluate;
use crate::ic::IcLibrary;

/// Hard cap on table inputs; beyond this no table is generated
pub const MAX_TABLE_INPUTS: usize = 10;
/// Input count at which a table is flagged as slow to build and display
pub const SLOW_TABLE_INPUTS: usize = 8;

/// One row of a truth table, aligned to the table's label vectors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTableRow {
    /// Input values, in input label order
    pub inputs: Vec<bool>,
    /// Output values, in output label order
    pub outputs: Vec<bool>,
}

/// Exhaustive input-to-output table of a circuit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    /// Input column labels, sorted
    pub input_labels: Vec<String>,
    /// Output column labels, sorted
    pub output_labels: Vec<String>,
    /// One row per input combination, in binary order
    pub rows: Vec<TruthTableRow>,
}

impl TruthTable {
    /// Number of input columns
    pub fn nb_inputs(&self) -> usize {
        self.input_labels.len()
    }

    /// Number of output columns
    pub fn nb_outputs(&self) -> usize {
        self.output_labels.len()
    }

    /// Whether the table is expected to be slow to display
    pub fn is_slow(&self) -> bool {
        self.nb_inputs() >= SLOW_TABLE_INPUTS
    }

    /// Column of values for one output label
    pub fn output_column(&self, label: &str) -> Option<Vec<bool>> {
        let pos = self.output_labels.iter().position(|l| l == label)?;
        Some(self.rows.iter().map(|r| r.outputs[pos]).collect())
    }
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} | {}",
            self.input_labels.iter().join(" "),
            self.output_labels.iter().join(" ")
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{} | {}",
                column_bits(&row.inputs, &self.input_labels),
                column_bits(&row.outputs, &self.output_labels)
            )?;
        }
        Ok(())
    }
}

/// Render row values aligned under their column labels
fn column_bits(values: &[bool], labels: &[String]) -> String {
    values
        .iter()
        .zip(labels)
        .map(|(v, l)| format!("{:>width$}", if *v { 1 } else { 0 }, width = l.len()))
        .join(" ")
}

/// Generate the exhaustive truth table of a circuit
///
/// Returns None when the circuit has no INPUT node, no OUTPUT node, or more
/// than [`MAX_TABLE_INPUTS`] inputs. Inputs and outputs are ordered by label
/// and bits are assigned MSB-first, so rows come in binary counting order.
/// Every row is evaluated with empty register state and no previous outputs,
/// which under-represents sequential behaviour.
pub fn generate_table(circuit: &Circuit, library: &IcLibrary) -> Option<TruthTable> {
    let inputs = labeled_nodes(circuit, GateKind::Input);
    let outputs = labeled_nodes(circuit, GateKind::Output);
    if inputs.is_empty() || outputs.is_empty() || inputs.len() > MAX_TABLE_INPUTS {
        return None;
    }

    let k = inputs.len();
    let state = CircuitState::new();
    let prev = NodeOutputs::default();
    let mut rows = Vec::with_capacity(1 << k);
    for combination in 0..(1usize << k) {
        let mut values = FxHashMap::default();
        let mut row_inputs = Vec::with_capacity(k);
        for (i, node) in inputs.iter().enumerate() {
            let bit = (combination >> (k - 1 - i)) & 1 == 1;
            values.insert(node.id, bit);
            row_inputs.push(bit);
        }
        let result = evaluate(circuit, &values, &state, &prev, library);
        let row_outputs = outputs
            .iter()
            .map(|n| result.circuit_outputs.get(&n.id).copied().unwrap_or(false))
            .collect();
        rows.push(TruthTableRow {
            inputs: row_inputs,
            outputs: row_outputs,
        });
    }

    Some(TruthTable {
        input_labels: inputs.iter().map(|n| n.label.clone()).collect(),
        output_labels: outputs.iter().map(|n| n.label.clone()).collect(),
        rows,
    })
}

/// Nodes of one kind sorted by label, ties broken by id
pub(crate) fn labeled_nodes(circuit: &Circuit, kind: GateKind) -> Vec<&Node> {
    circuit
        .nodes()
        .iter()
        .filter(|n| n.kind == kind)
        .sorted_by(|a, b| (&a.label, a.id).cmp(&(&b.label, b.id)))
        .collect()
}
