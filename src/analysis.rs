//! Circuit analysis: truth tables, Boolean expressions, sum-of-products
//! rendering and lint diagnostics

pub mod diagnostics;
pub mod expr;
pub mod sop;
pub mod table;

pub use diagnostics::{analyze, CircuitIssue, IssueCode, Severity};
pub use expr::{expression_for, output_expressions};
pub use sop::{all_sums, sum_of_products};
pub use table::{generate_table, TruthTable, TruthTableRow};
