use super::range::ScanRange;
use crate::io::bounded::ReadCursor;

/// Lock-free view of how far every worker has read.
#[derive(Clone, Debug)]
pub struct Progress {
    parts: Vec<(ScanRange, ReadCursor)>,
}

impl Progress {
    pub(crate) fn new(parts: Vec<(ScanRange, ReadCursor)>) -> Self {
        Self { parts }
    }

    /// Bytes read so far, overlap included.
    pub fn bytes_read(&self) -> u64 {
        self.parts
            .iter()
            .map(|(r, c)| c.get().clamp(r.start, r.end) - r.start)
            .sum()
    }

    pub fn total(&self) -> u64 {
        self.parts.iter().map(|(r, _)| r.len()).sum()
    }

    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 1.0;
        }
        self.bytes_read() as f64 / total as f64
    }

    pub fn per_worker(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.parts.iter().map(|(r, c)| (r.index, c.get()))
    }
}
