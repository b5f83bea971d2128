use std::collections::HashMap;
use std::sync::Mutex;

use crate::SurfaceMethod;

/// Per-method invocation counters of one stubbed surface.
///
/// Counting lives with the surface, not the registry: every stubbed operation
/// increments exactly one counter per invocation, registered or not.
#[derive(Debug, Default)]
pub struct CallLog {
    counts: Mutex<HashMap<SurfaceMethod, usize>>,
}

impl CallLog {
    pub(crate) fn record(&self, method: impl Into<SurfaceMethod>) {
        *self.counts.lock().unwrap().entry(method.into()).or_insert(0) += 1;
    }

    /// Number of recorded invocations of the given operation.
    pub fn count(&self, method: impl Into<SurfaceMethod>) -> usize {
        self.counts
            .lock()
            .unwrap()
            .get(&method.into())
            .copied()
            .unwrap_or_default()
    }

    /// Total invocations across every operation of the surface.
    pub fn total(&self) -> usize {
        self.counts.lock().unwrap().values().sum()
    }
}
