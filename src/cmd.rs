//! Command line interface

use std::path::{Path, PathBuf};
use std::process::exit;

use clap::{Args, Parser, Subcommand};
use fxhash::FxHashMap;
use kdam::{tqdm, BarExt};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::analysis::table::labeled_nodes;
use crate::analysis::{all_sums, analyze, generate_table, output_expressions};
use crate::circuit::stats::stats;
use crate::circuit::{Circuit, CircuitState, GateKind, NodeId, NodeOutputs};
use crate::eval::evaluate;
use crate::history::SignalHistory;
use crate::ic::IcLibrary;
use crate::io::{read_circuit_file, read_pattern_file, write_pattern_file};

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics and diagnostics for a circuit
    ///
    /// Will print counts per node kind, then evaluate the circuit once with
    /// its saved input values and report any issue found.
    #[clap()]
    Show(ShowArgs),

    /// Print the exhaustive truth table of a circuit
    ///
    /// Inputs and outputs are ordered by label. Fails on circuits without
    /// input and output nodes, or with more than 10 inputs.
    #[clap()]
    Table(TableArgs),

    /// Print a Boolean expression for each output
    ///
    /// Expressions follow the wires backwards from each output. Registers
    /// and IC instances appear as opaque names.
    #[clap(alias = "expr")]
    Expression(ExprArgs),

    /// Simulate a circuit over a number of clock ticks
    ///
    /// Patterns use one line per tick with one bit per input, in label
    /// order:
    ///    101
    ///    011
    /// Without a pattern file, random patterns are generated.
    #[clap(alias = "sim")]
    Simulate(SimulateArgs),
}

fn load(path: &Path) -> (Circuit, FxHashMap<NodeId, bool>) {
    match read_circuit_file(path) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("cannot load {}: {}", path.display(), err);
            exit(1);
        }
    }
}

/// Command arguments for circuit informations
#[derive(Args)]
pub struct ShowArgs {
    /// Circuit to show
    file: PathBuf,
}

impl ShowArgs {
    pub fn run(&self) {
        let (circuit, inputs) = load(&self.file);
        println!("Circuit stats:\n{}\n", stats(&circuit));

        let library = IcLibrary::new();
        let result = evaluate(
            &circuit,
            &inputs,
            &CircuitState::new(),
            &NodeOutputs::default(),
            &library,
        );
        if result.has_cycle {
            println!("Combinational cycle through:");
            for id in &result.cycle_nodes {
                println!("  {}", id);
            }
            return;
        }
        let issues = analyze(&circuit, &library, &result.node_outputs);
        if issues.is_empty() {
            println!("No issues found");
        } else {
            for issue in &issues {
                println!("{}", issue);
            }
        }
    }
}

/// Command arguments for truth table generation
#[derive(Args)]
pub struct TableArgs {
    /// Circuit to tabulate
    file: PathBuf,

    /// Also print a sum-of-products expression per output
    #[arg(long)]
    sop: bool,
}

impl TableArgs {
    pub fn run(&self) {
        let (circuit, _) = load(&self.file);
        let library = IcLibrary::new();
        let Some(table) = generate_table(&circuit, &library) else {
            eprintln!("no truth table: the circuit needs inputs, outputs and at most 10 inputs");
            exit(1);
        };
        if table.is_slow() {
            eprintln!("{} inputs: this table is large", table.nb_inputs());
        }
        print!("{}", table);
        if self.sop {
            println!();
            for (label, sop) in all_sums(&table) {
                println!("{} = {}", label, sop);
            }
        }
    }
}

/// Command arguments for expression extraction
#[derive(Args)]
pub struct ExprArgs {
    /// Circuit to analyze
    file: PathBuf,
}

impl ExprArgs {
    pub fn run(&self) {
        let (circuit, _) = load(&self.file);
        for (label, expr) in output_expressions(&circuit) {
            println!("{} = {}", label, expr);
        }
    }
}

/// Command arguments for simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Circuit to simulate
    file: PathBuf,

    /// Input patterns file, one tick per line; random patterns if absent
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Output file for output patterns; printed if absent
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Number of random ticks when no pattern file is given
    #[arg(short = 'r', long, default_value_t = 16)]
    num_random: usize,

    /// Seed for random pattern generation
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Number of samples of signal history to retain
    #[arg(long, default_value_t = 64)]
    history_depth: usize,
}

impl SimulateArgs {
    pub fn run(&self) {
        let (circuit, saved) = load(&self.file);
        let library = IcLibrary::new();
        let input_ids: Vec<NodeId> = labeled_nodes(&circuit, GateKind::Input)
            .iter()
            .map(|n| n.id)
            .collect();
        let output_ids: Vec<NodeId> = labeled_nodes(&circuit, GateKind::Output)
            .iter()
            .map(|n| n.id)
            .collect();
        let clock_ids: Vec<NodeId> = circuit
            .nodes()
            .iter()
            .filter(|n| n.kind == GateKind::Clock)
            .map(|n| n.id)
            .collect();

        let patterns = match &self.input {
            Some(path) => match read_pattern_file(path) {
                Ok(patterns) => patterns,
                Err(err) => {
                    eprintln!("cannot load {}: {}", path.display(), err);
                    exit(1);
                }
            },
            None => {
                let mut rng = SmallRng::seed_from_u64(self.seed);
                (0..self.num_random)
                    .map(|_| (0..input_ids.len()).map(|_| rng.gen()).collect())
                    .collect()
            }
        };

        let mut state = CircuitState::new();
        let mut prev = NodeOutputs::default();
        let mut history = SignalHistory::new(self.history_depth);
        let mut output_values = Vec::with_capacity(patterns.len());
        let mut bar = tqdm!(total = patterns.len());
        for (tick, pattern) in patterns.iter().enumerate() {
            let mut inputs = saved.clone();
            for (i, id) in input_ids.iter().enumerate() {
                if let Some(bit) = pattern.get(i) {
                    inputs.insert(*id, *bit);
                }
            }
            for id in &clock_ids {
                inputs.insert(*id, tick % 2 == 1);
            }
            let result = evaluate(&circuit, &inputs, &state, &prev, &library);
            if result.has_cycle {
                eprintln!("combinational cycle, cannot simulate");
                exit(1);
            }
            history.record(&result.node_outputs);
            output_values.push(
                output_ids
                    .iter()
                    .map(|id| result.circuit_outputs.get(id).copied().unwrap_or(false))
                    .collect::<Vec<bool>>(),
            );
            state = result.next_state;
            prev = result.node_outputs;
            bar.update(1).unwrap();
        }
        eprintln!();

        match &self.output {
            Some(path) => {
                if let Err(err) = write_pattern_file(path, &output_values) {
                    eprintln!("cannot write {}: {}", path.display(), err);
                    exit(1);
                }
            }
            None => {
                for bits in &output_values {
                    let line: String = bits.iter().map(|b| if *b { '1' } else { '0' }).collect();
                    println!("{}", line);
                }
            }
        }
    }
}
