//! Sum-of-products rendering from a truth table
//!
//! This is the canonical (unminimized) sum of minterms, not minimized logic.

use itertools::Itertools;

use crate::analysis::table::TruthTable;

/// Canonical sum of minterms for one output of a generated table
///
/// Every row where the output is true contributes one literal product:
/// the variable when the input is true, the variable with a negation suffix
/// when false. Degenerates to "0" when no row is true and "1" when all are.
/// Returns None for an unknown output label.
pub fn sum_of_products(table: &TruthTable, output_label: &str) -> Option<String> {
    let pos = table
        .output_labels
        .iter()
        .position(|l| l == output_label)?;
    let minterms: Vec<String> = table
        .rows
        .iter()
        .filter(|row| row.outputs[pos])
        .map(|row| minterm(&table.input_labels, &row.inputs))
        .collect();
    Some(if minterms.is_empty() {
        "0".to_string()
    } else if minterms.len() == table.rows.len() {
        "1".to_string()
    } else {
        minterms.iter().join(" + ")
    })
}

/// SOP string for every output of the table, in label order
pub fn all_sums(table: &TruthTable) -> Vec<(String, String)> {
    table
        .output_labels
        .iter()
        .map(|label| {
            let sop = sum_of_products(table, label).unwrap();
            (label.clone(), sop)
        })
        .collect()
}

fn minterm(labels: &[String], inputs: &[bool]) -> String {
    labels
        .iter()
        .zip(inputs)
        .map(|(label, value)| {
            if *value {
                label.clone()
            } else {
                format!("{}'", label)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::table::TruthTableRow;

    fn table(outputs: [bool; 4]) -> TruthTable {
        let rows = (0..4)
            .map(|i| TruthTableRow {
                inputs: vec![i & 2 != 0, i & 1 != 0],
                outputs: vec![outputs[i]],
            })
            .collect();
        TruthTable {
            input_labels: vec!["A".to_string(), "B".to_string()],
            output_labels: vec!["F".to_string()],
            rows,
        }
    }

    #[test]
    fn test_xor_minterms() {
        // True on rows 01 and 10
        let t = table([false, true, true, false]);
        assert_eq!(sum_of_products(&t, "F").unwrap(), "A'B + AB'");
    }

    #[test]
    fn test_single_minterm() {
        let t = table([false, false, false, true]);
        assert_eq!(sum_of_products(&t, "F").unwrap(), "AB");
    }

    #[test]
    fn test_degenerate_cases() {
        assert_eq!(
            sum_of_products(&table([false; 4]), "F").unwrap(),
            "0"
        );
        assert_eq!(sum_of_products(&table([true; 4]), "F").unwrap(), "1");
    }

    #[test]
    fn test_unknown_label() {
        assert!(sum_of_products(&table([false; 4]), "G").is_none());
    }

    #[test]
    fn test_all_sums() {
        let t = table([false, true, true, false]);
        assert_eq!(
            all_sums(&t),
            vec![("F".to_string(), "A'B + AB'".to_string())]
        );
    }
}
