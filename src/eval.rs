//! Circuit evaluation: topological ordering, gate and register semantics,
//! and the orchestrating evaluation pass

pub mod gate;
pub mod seq;
pub mod topo;

mod evaluator;

pub use evaluator::{evaluate, EvaluationResult};

pub(crate) use evaluator::driver_index;
