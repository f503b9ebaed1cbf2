//! Structural and electrical lint checks over a circuit
//!
//! Diagnostics never block evaluation. The evaluator degrades gracefully on
//! every condition reported here; the checks exist so users can find out why
//! a circuit reads all-false before blaming the simulator.

use core::fmt;

use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;

use crate::circuit::{
    handle_value, ic_input_handle, input_handle, Circuit, GateKind, NodeId, NodeOutputs,
};
use crate::eval::driver_index;
use crate::ic::IcLibrary;

/// Node count above which a circuit is flagged as large
pub const LARGE_CIRCUIT_THRESHOLD: usize = 300;

/// How serious an issue is; the derived order puts errors first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// The circuit will not behave as drawn
    Error,
    /// Suspicious, but evaluation has a defined answer
    Warning,
    /// Worth knowing, nothing wrong
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Machine-readable category of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCode {
    /// Several edges drive the same input handle
    MultipleDrivers,
    /// A required input handle has no driver
    UnconnectedInput,
    /// An edge-triggered register has no clock driver
    MissingClock,
    /// An OUTPUT node has no driver
    FloatingOutput,
    /// An SR latch currently reads S and R both high
    InvalidLatchState,
    /// An INPUT or CLOCK node drives nothing
    UnusedSource,
    /// The circuit exceeds the size where interaction stays snappy
    LargeCircuit,
}

/// One reported issue, optionally anchored to a node and input handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitIssue {
    /// Severity tier
    pub severity: Severity,
    /// Category
    pub code: IssueCode,
    /// Human-readable description
    pub message: String,
    /// Node the issue is anchored to, if any
    pub node: Option<NodeId>,
    /// Input handle the issue is anchored to, if any
    pub handle: Option<String>,
}

impl fmt::Display for CircuitIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Run every check and return the issues sorted by severity
///
/// `outputs` is the latest evaluation snapshot; it feeds the checks that
/// depend on current values, like the SR latch forbidden state. Pass an
/// empty snapshot to run the purely structural checks alone.
pub fn analyze(circuit: &Circuit, library: &IcLibrary, outputs: &NodeOutputs) -> Vec<CircuitIssue> {
    let drivers = driver_index(circuit);
    let mut issues = Vec::new();
    check_multiple_drivers(circuit, &mut issues);
    check_unconnected_inputs(circuit, library, &drivers, &mut issues);
    check_latch_states(circuit, &drivers, outputs, &mut issues);
    check_unused_sources(circuit, &mut issues);
    if circuit.nb_nodes() > LARGE_CIRCUIT_THRESHOLD {
        issues.push(CircuitIssue {
            severity: Severity::Warning,
            code: IssueCode::LargeCircuit,
            message: format!(
                "circuit has {} nodes; expect slow interaction above {}",
                circuit.nb_nodes(),
                LARGE_CIRCUIT_THRESHOLD
            ),
            node: None,
            handle: None,
        });
    }
    issues.sort_by_key(|i| i.severity);
    issues
}

fn check_multiple_drivers(circuit: &Circuit, issues: &mut Vec<CircuitIssue>) {
    let mut reported = FxHashSet::default();
    let counts = circuit
        .edges()
        .iter()
        .counts_by(|e| (e.target, e.target_handle.clone()));
    // Walk edges rather than the count map to keep a deterministic order
    for edge in circuit.edges() {
        let key = (edge.target, edge.target_handle.clone());
        let count = counts[&key];
        if count > 1 && reported.insert(key) {
            let label = node_label(circuit, edge.target);
            issues.push(CircuitIssue {
                severity: Severity::Error,
                code: IssueCode::MultipleDrivers,
                message: format!(
                    "{} drivers on handle '{}' of {}; only the first connection counts",
                    count, edge.target_handle, label
                ),
                node: Some(edge.target),
                handle: Some(edge.target_handle.clone()),
            });
        }
    }
}

fn check_unconnected_inputs(
    circuit: &Circuit,
    library: &IcLibrary,
    drivers: &FxHashMap<(NodeId, String), (NodeId, String)>,
    issues: &mut Vec<CircuitIssue>,
) {
    for node in circuit.nodes() {
        let label = &node.label;
        match node.kind {
            GateKind::Output => {
                if !drivers.contains_key(&(node.id, input_handle(0))) {
                    issues.push(CircuitIssue {
                        severity: Severity::Warning,
                        code: IssueCode::FloatingOutput,
                        message: format!("output {} is not driven and will always read 0", label),
                        node: Some(node.id),
                        handle: Some(input_handle(0)),
                    });
                }
            }
            GateKind::Ic(def_id) => {
                // A dangling definition already degrades to constant false;
                // pin checks would only pile noise on top of that.
                let Some(def) = library.get(def_id) else {
                    continue;
                };
                for pin in def.inputs() {
                    let handle = ic_input_handle(pin.node);
                    if !drivers.contains_key(&(node.id, handle.clone())) {
                        issues.push(CircuitIssue {
                            severity: Severity::Warning,
                            code: IssueCode::UnconnectedInput,
                            message: format!(
                                "pin '{}' of {} ({}) is unconnected and reads 0",
                                pin.label,
                                label,
                                def.name()
                            ),
                            node: Some(node.id),
                            handle: Some(handle),
                        });
                    }
                }
            }
            kind if kind.is_register() => {
                for i in 0..node.num_inputs {
                    let handle = input_handle(i);
                    if drivers.contains_key(&(node.id, handle.clone())) {
                        continue;
                    }
                    let role = kind.input_role(i).unwrap_or("?");
                    if kind.clock_input() == Some(i) {
                        issues.push(CircuitIssue {
                            severity: Severity::Warning,
                            code: IssueCode::MissingClock,
                            message: format!(
                                "register {} has no clock and will never change state",
                                label
                            ),
                            node: Some(node.id),
                            handle: Some(handle),
                        });
                    } else {
                        issues.push(CircuitIssue {
                            severity: Severity::Warning,
                            code: IssueCode::UnconnectedInput,
                            message: format!(
                                "input {} of register {} is unconnected and reads 0",
                                role, label
                            ),
                            node: Some(node.id),
                            handle: Some(handle),
                        });
                    }
                }
            }
            kind if kind.is_combinational() => {
                for i in 0..node.num_inputs {
                    let handle = input_handle(i);
                    if !drivers.contains_key(&(node.id, handle.clone())) {
                        issues.push(CircuitIssue {
                            severity: Severity::Warning,
                            code: IssueCode::UnconnectedInput,
                            message: format!(
                                "input {} of gate {} is unconnected and reads 0",
                                i, label
                            ),
                            node: Some(node.id),
                            handle: Some(handle),
                        });
                    }
                }
            }
            _ => {}
        }
    }
}

fn check_latch_states(
    circuit: &Circuit,
    drivers: &FxHashMap<(NodeId, String), (NodeId, String)>,
    outputs: &NodeOutputs,
    issues: &mut Vec<CircuitIssue>,
) {
    if outputs.is_empty() {
        return;
    }
    for node in circuit.nodes() {
        if node.kind != GateKind::SrLatch {
            continue;
        }
        let read = |i: usize| -> bool {
            match drivers.get(&(node.id, input_handle(i))) {
                Some((source, handle)) => handle_value(outputs, *source, handle),
                None => false,
            }
        };
        if read(0) && read(1) {
            issues.push(CircuitIssue {
                severity: Severity::Warning,
                code: IssueCode::InvalidLatchState,
                message: format!(
                    "latch {} has S and R both high; it resolves to 0",
                    node.label
                ),
                node: Some(node.id),
                handle: None,
            });
        }
    }
}

fn check_unused_sources(circuit: &Circuit, issues: &mut Vec<CircuitIssue>) {
    let driving: FxHashSet<NodeId> = circuit.edges().iter().map(|e| e.source).collect();
    for node in circuit.nodes() {
        if node.kind.is_source() && !driving.contains(&node.id) {
            issues.push(CircuitIssue {
                severity: Severity::Info,
                code: IssueCode::UnusedSource,
                message: format!("source {} drives nothing", node.label),
                node: Some(node.id),
                handle: None,
            });
        }
    }
}

fn node_label(circuit: &Circuit, id: NodeId) -> String {
    circuit
        .node(id)
        .map(|n| n.label.clone())
        .unwrap_or_else(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitState;
    use crate::eval::evaluate;

    fn codes(issues: &[CircuitIssue]) -> Vec<IssueCode> {
        issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn test_clean_circuit() {
        let mut c = Circuit::new();
        let a = c.add_input("A");
        let g = c.add_gate(GateKind::Not);
        let o = c.add_output_node("F");
        c.connect(a, g, 0);
        c.connect(g, o, 0);
        let issues = analyze(&c, &IcLibrary::new(), &NodeOutputs::default());
        assert!(issues.is_empty());
    }

    #[test]
    fn test_multiple_drivers() {
        let mut c = Circuit::new();
        let a = c.add_input("A");
        let b = c.add_input("B");
        let g = c.add_gate(GateKind::Not);
        c.connect(a, g, 0);
        c.connect(b, g, 0);
        let issues = analyze(&c, &IcLibrary::new(), &NodeOutputs::default());
        let conflict = issues
            .iter()
            .find(|i| i.code == IssueCode::MultipleDrivers)
            .unwrap();
        assert_eq!(conflict.severity, Severity::Error);
        assert_eq!(conflict.node, Some(g));
        assert_eq!(conflict.handle, Some(input_handle(0)));
        // Reported once, not once per edge
        assert_eq!(
            codes(&issues)
                .iter()
                .filter(|c| **c == IssueCode::MultipleDrivers)
                .count(),
            1
        );
    }

    #[test]
    fn test_unconnected_gate_input() {
        let mut c = Circuit::new();
        let a = c.add_input("A");
        let g = c.add_gate(GateKind::And);
        let o = c.add_output_node("F");
        c.connect(a, g, 0);
        c.connect(g, o, 0);
        let issues = analyze(&c, &IcLibrary::new(), &NodeOutputs::default());
        assert_eq!(codes(&issues), vec![IssueCode::UnconnectedInput]);
        assert_eq!(issues[0].handle, Some(input_handle(1)));
    }

    #[test]
    fn test_missing_clock() {
        let mut c = Circuit::new();
        let d = c.add_input("D");
        let ff = c.add_gate(GateKind::DFlipFlop);
        c.connect(d, ff, 0);
        let issues = analyze(&c, &IcLibrary::new(), &NodeOutputs::default());
        assert!(codes(&issues).contains(&IssueCode::MissingClock));
    }

    #[test]
    fn test_floating_output_and_unused_source() {
        let mut c = Circuit::new();
        c.add_input("A");
        c.add_output_node("F");
        let issues = analyze(&c, &IcLibrary::new(), &NodeOutputs::default());
        assert_eq!(
            codes(&issues),
            vec![IssueCode::FloatingOutput, IssueCode::UnusedSource]
        );
    }

    #[test]
    fn test_invalid_latch_state_needs_snapshot() {
        let mut c = Circuit::new();
        let s = c.add_input("S");
        let r = c.add_input("R");
        let latch = c.add_gate(GateKind::SrLatch);
        c.connect(s, latch, 0);
        c.connect(r, latch, 1);

        // Structural pass alone says nothing about values
        let issues = analyze(&c, &IcLibrary::new(), &NodeOutputs::default());
        assert!(!codes(&issues).contains(&IssueCode::InvalidLatchState));

        let mut inputs = FxHashMap::default();
        inputs.insert(s, true);
        inputs.insert(r, true);
        let result = evaluate(
            &c,
            &inputs,
            &CircuitState::new(),
            &NodeOutputs::default(),
            &IcLibrary::new(),
        );
        let issues = analyze(&c, &IcLibrary::new(), &result.node_outputs);
        assert!(codes(&issues).contains(&IssueCode::InvalidLatchState));
    }

    #[test]
    fn test_ic_pin_unconnected() {
        let mut sub = Circuit::new();
        let pa = sub.add_input("A");
        let pb = sub.add_input("B");
        let g = sub.add_gate(GateKind::And);
        let po = sub.add_output_node("F");
        sub.connect(pa, g, 0);
        sub.connect(pb, g, 1);
        sub.connect(g, po, 0);
        let mut lib = IcLibrary::new();
        let def_id = lib.package("and2", "#fff", &sub, &[pa, pb, g, po]).unwrap();

        let mut c = Circuit::new();
        let a = c.add_input("A");
        let ic = c.add_ic(lib.get(def_id).unwrap());
        let o = c.add_output_node("F");
        c.connect_from(a, crate::circuit::OUTPUT_HANDLE, ic, &ic_input_handle(pa));
        c.connect_from(
            ic,
            &crate::circuit::ic_output_handle(po),
            o,
            &input_handle(0),
        );
        let issues = analyze(&c, &lib, &NodeOutputs::default());
        assert_eq!(codes(&issues), vec![IssueCode::UnconnectedInput]);
        assert_eq!(issues[0].handle, Some(ic_input_handle(pb)));
    }

    #[test]
    fn test_large_circuit() {
        let mut c = Circuit::new();
        let a = c.add_input("A");
        for _ in 0..LARGE_CIRCUIT_THRESHOLD {
            let g = c.add_gate(GateKind::Not);
            c.connect(a, g, 0);
        }
        let issues = analyze(&c, &IcLibrary::new(), &NodeOutputs::default());
        assert!(codes(&issues).contains(&IssueCode::LargeCircuit));
    }

    #[test]
    fn test_errors_sort_first() {
        let mut c = Circuit::new();
        let a = c.add_input("A");
        let b = c.add_input("B");
        let unused = c.add_input("Z");
        let g = c.add_gate(GateKind::Not);
        c.connect(a, g, 0);
        c.connect(b, g, 0);
        let _ = unused;
        let issues = analyze(&c, &IcLibrary::new(), &NodeOutputs::default());
        assert_eq!(issues[0].code, IssueCode::MultipleDrivers);
        assert_eq!(issues.last().unwrap().code, IssueCode::UnusedSource);
    }
}
