use serde::{Deserialize, Serialize};

/// One (timestamp, value) pair of a series. Timestamps within a block are
/// non-decreasing.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub ts: u64,
    pub value: f64,
}

impl Sample {
    pub fn new(ts: u64, value: f64) -> Self {
        Sample { ts, value }
    }
}
