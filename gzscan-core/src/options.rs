use crate::error::{Result, ScanError};
use crate::gzip::header::MAX_HEADER_LEN;

#[derive(Clone, Debug)]
pub struct ScanOptions {
    /// Worker count; one thread and one range per worker.
    pub threads: usize,
    /// Bytes each range reads past its split point. Must cover the largest
    /// header so one straddling a split is parsed whole.
    pub overlap: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            overlap: MAX_HEADER_LEN as u64,
        }
    }
}

impl ScanOptions {
    pub fn with_threads(threads: usize) -> Self {
        Self {
            threads,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(ScanError::Config("thread count must be at least 1".into()));
        }
        if self.overlap < MAX_HEADER_LEN as u64 {
            return Err(ScanError::Config(format!(
                "overlap {} is smaller than the largest header ({MAX_HEADER_LEN} bytes)",
                self.overlap
            )));
        }
        Ok(())
    }
}

/// Twice the available hardware parallelism.
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        * 2
}
