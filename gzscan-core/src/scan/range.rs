/// Byte interval assigned to one worker.
///
/// The worker reports candidates starting in `[start, nominal_end)` and may
/// read on to `end` (the overlap) to finish parsing a header that straddles
/// the split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanRange {
    pub index: usize,
    pub start: u64,
    pub nominal_end: u64,
    pub end: u64,
}

impl ScanRange {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.nominal_end <= self.start
    }

    pub fn owns(&self, offset: u64) -> bool {
        offset >= self.start && offset < self.nominal_end
    }
}

/// Splits `[0, len)` into `workers` ranges; the last one absorbs the remainder.
pub fn partition(len: u64, workers: usize, overlap: u64) -> Vec<ScanRange> {
    let workers = workers.max(1);
    let interval = len / workers as u64;
    (0..workers)
        .map(|i| {
            let start = interval * i as u64;
            let nominal_end = if i + 1 == workers {
                len
            } else {
                start + interval
            };
            ScanRange {
                index: i,
                start,
                nominal_end,
                end: nominal_end.saturating_add(overlap).min(len),
            }
        })
        .collect()
}
