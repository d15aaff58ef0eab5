use super::progress::Progress;
use super::range::{ScanRange, partition};
use super::window::WindowScanner;
use crate::error::{Result, ScanError};
use crate::io::bounded::ReadCursor;
use crate::io::positioned::ReadAt;
use crate::options::ScanOptions;
use crate::sink::FindingSink;
use std::fs::File;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub workers: usize,
    pub findings: u64,
    pub bytes_read: u64,
}

/// Splits one source into overlapping ranges and scans them in parallel.
pub struct Scanner<S: ReadAt> {
    source: S,
    len: u64,
    ranges: Vec<ScanRange>,
    cursors: Vec<ReadCursor>,
}

impl<S: ReadAt> Scanner<S> {
    pub fn new(source: S, len: u64, opts: &ScanOptions) -> Result<Self> {
        opts.validate()?;
        let ranges = partition(len, opts.threads, opts.overlap);
        let cursors = ranges.iter().map(|r| ReadCursor::new(r.start)).collect();
        Ok(Self {
            source,
            len,
            ranges,
            cursors,
        })
    }

    pub fn ranges(&self) -> &[ScanRange] {
        &self.ranges
    }

    pub fn progress(&self) -> Progress {
        Progress::new(
            self.ranges
                .iter()
                .copied()
                .zip(self.cursors.iter().cloned())
                .collect(),
        )
    }

    /// Scans every range on its own thread and waits for all of them. The
    /// first failure (by worker index) is returned after the rest finish.
    pub fn run(&self, sink: &dyn FindingSink) -> Result<ScanSummary> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.ranges.len())
            .thread_name(|i| format!("gzscan-{i}"))
            .build()?;

        tracing::info!(
            workers = self.ranges.len(),
            len = self.len,
            "running with {} threads",
            self.ranges.len()
        );

        // one call per pool thread; thread i owns range i
        let results: Vec<std::io::Result<u64>> =
            pool.broadcast(|ctx| self.scan_range(ctx.index(), sink));

        let mut summary = ScanSummary {
            workers: self.ranges.len(),
            bytes_read: self.progress().bytes_read(),
            ..Default::default()
        };
        let mut first_err = None;
        for (range, res) in self.ranges.iter().zip(results) {
            match res {
                Ok(n) => summary.findings += n,
                Err(e) => {
                    tracing::warn!(
                        worker = range.index,
                        start = range.start,
                        end = range.end,
                        error = %e,
                        "worker failed"
                    );
                    first_err.get_or_insert(ScanError::Worker {
                        index: range.index,
                        start: range.start,
                        end: range.end,
                        source: e,
                    });
                }
            }
        }
        if let Some(e) = first_err {
            return Err(e);
        }
        tracing::info!(
            findings = summary.findings,
            bytes_read = summary.bytes_read,
            "scan complete"
        );
        Ok(summary)
    }

    fn scan_range(&self, index: usize, sink: &dyn FindingSink) -> std::io::Result<u64> {
        let range = self.ranges[index];
        tracing::debug!(
            worker = index,
            start = range.start,
            nominal_end = range.nominal_end,
            end = range.end,
            "range start"
        );
        WindowScanner::new(&self.source, range, self.cursors[index].clone()).run(sink)
    }
}

impl Scanner<File> {
    pub fn open(path: &Path, opts: &ScanOptions) -> Result<Self> {
        let f = File::open(path).map_err(|source| ScanError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let len = f.metadata()?.len();
        Scanner::new(f, len, opts)
    }
}

/// Opens `path` and scans it with `opts`.
pub fn scan_file(path: &Path, opts: &ScanOptions, sink: &dyn FindingSink) -> Result<ScanSummary> {
    Scanner::open(path, opts)?.run(sink)
}
