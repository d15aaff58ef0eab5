use crate::finding::Finding;
use std::sync::{Mutex, PoisonError};

/// Receives findings from every worker, in any interleaving across workers.
pub trait FindingSink: Send + Sync {
    fn emit(&self, finding: Finding);
}

impl<F> FindingSink for F
where
    F: Fn(Finding) + Send + Sync,
{
    fn emit(&self, finding: Finding) {
        (self)(finding)
    }
}

/// Keeps every finding in memory.
#[derive(Default)]
pub struct CollectSink {
    found: Mutex<Vec<Finding>>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Findings ordered by position, then worker.
    pub fn into_findings(self) -> Vec<Finding> {
        let mut v = self
            .found
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        v.sort_by_key(|f| (f.position, f.worker));
        v
    }
}

impl FindingSink for CollectSink {
    fn emit(&self, finding: Finding) {
        self.found
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(finding);
    }
}
