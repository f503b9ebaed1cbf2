//! Bounded per-handle signal history for waveform-style inspection

use fxhash::FxHashMap;

use crate::circuit::{NodeId, NodeOutputs};

/// Rolling record of the last N samples of every published handle
///
/// One sample per recorded tick. Older samples fall off the front once the
/// configured depth is reached; the total tick count keeps counting.
#[derive(Debug, Clone)]
pub struct SignalHistory {
    depth: usize,
    ticks: u64,
    series: FxHashMap<(NodeId, String), Vec<bool>>,
}

impl SignalHistory {
    /// Create a history keeping at most `depth` samples per handle
    pub fn new(depth: usize) -> Self {
        SignalHistory {
            depth: depth.max(1),
            ticks: 0,
            series: FxHashMap::default(),
        }
    }

    /// Maximum number of retained samples per handle
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Total number of recorded ticks, including evicted ones
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of tracked (node, handle) series
    pub fn nb_series(&self) -> usize {
        self.series.len()
    }

    /// Append one sample per handle from an evaluation snapshot
    pub fn record(&mut self, outputs: &NodeOutputs) {
        self.ticks += 1;
        for (node, handles) in outputs {
            for (handle, value) in handles {
                let samples = self
                    .series
                    .entry((*node, handle.clone()))
                    .or_default();
                samples.push(*value);
                if samples.len() > self.depth {
                    let excess = samples.len() - self.depth;
                    samples.drain(..excess);
                }
            }
        }
    }

    /// Retained samples for one handle, oldest first
    pub fn samples(&self, node: NodeId, handle: &str) -> &[bool] {
        self.series
            .get(&(node, handle.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Drop all samples and reset the tick count
    pub fn clear(&mut self) {
        self.ticks = 0;
        self.series.clear();
    }
}
