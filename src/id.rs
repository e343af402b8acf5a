use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Opaque series identifier. Assigned by the series registry, stored once
/// per block.
#[derive(Copy, Clone, Eq, Debug, PartialEq, Hash, Serialize, Deserialize)]
pub struct SeriesId(pub u64);

impl Deref for SeriesId {
    type Target = u64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl SeriesId {
    pub fn inner(&self) -> u64 {
        self.0
    }
}
