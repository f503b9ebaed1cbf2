//! Read and write circuits and simulation patterns to files

mod json;
mod patterns;

use std::fs::File;
use std::path::Path;

use fxhash::FxHashMap;
use thiserror::Error;

pub use json::{read_circuit, write_circuit, SCHEMA_VERSION};
pub use patterns::{read_patterns, write_patterns};

use crate::circuit::{Circuit, NodeId};

/// Errors when loading or saving files
#[derive(Debug, Error)]
pub enum IoError {
    /// Underlying file error
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON
    #[error("invalid circuit file: {0}")]
    Json(#[from] serde_json::Error),
    /// The file was written by a newer schema
    #[error("unsupported circuit file version {0}")]
    UnsupportedVersion(u32),
    /// A pattern file holds something other than bits and comments
    #[error("invalid character '{0}' in pattern file")]
    BadPattern(char),
}

/// Read a circuit and its saved input values from a JSON file
pub fn read_circuit_file(path: &Path) -> Result<(Circuit, FxHashMap<NodeId, bool>), IoError> {
    let f = File::open(path)?;
    read_circuit(f)
}

/// Write a circuit and its saved input values to a JSON file
pub fn write_circuit_file(
    path: &Path,
    circuit: &Circuit,
    inputs: &FxHashMap<NodeId, bool>,
) -> Result<(), IoError> {
    let f = File::create(path)?;
    write_circuit(f, circuit, inputs)
}

/// Read patterns from a file, one tick per line
pub fn read_pattern_file(path: &Path) -> Result<Vec<Vec<bool>>, IoError> {
    let f = File::open(path)?;
    read_patterns(f)
}

/// Write patterns to a file, one tick per line
pub fn write_pattern_file(path: &Path, patterns: &[Vec<bool>]) -> Result<(), IoError> {
    let mut f = File::create(path)?;
    write_patterns(&mut f, patterns)
}
