use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use gzscan_core::{Finding, FindingSink, Progress, Result, ScanOptions, Scanner};

/// Default output: one log record per finding.
struct LogSink;

impl FindingSink for LogSink {
    fn emit(&self, finding: Finding) {
        tracing::info!(
            pos = finding.position,
            worker = finding.worker,
            "found likely gzip: {finding}"
        );
    }
}

/// JSON lines on a writer (stdout for the CLI).
struct JsonSink<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> FindingSink for JsonSink<W> {
    fn emit(&self, finding: Finding) {
        let line = match serde_json::to_string(&finding) {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(pos = finding.position, "encode finding: {e}");
                return;
            }
        };
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{line}") {
            tracing::error!(pos = finding.position, "write finding: {e}");
        }
    }
}

fn monitor(progress: &Progress, every: Duration, stop: &mpsc::Receiver<()>) {
    loop {
        match stop.recv_timeout(every) {
            Err(RecvTimeoutError::Timeout) => {
                tracing::info!(
                    read = progress.bytes_read(),
                    total = progress.total(),
                    "progress {:.1}%",
                    progress.fraction() * 100.0
                );
            }
            _ => return,
        }
    }
}

pub fn handle_scan(
    file: PathBuf,
    opts: &ScanOptions,
    json: bool,
    progress_every: Option<Duration>,
) -> Result<()> {
    let scanner = Scanner::open(&file, opts)?;
    let sink: Box<dyn FindingSink> = if json {
        Box::new(JsonSink {
            out: Mutex::new(std::io::stdout()),
        })
    } else {
        Box::new(LogSink)
    };

    let summary = match progress_every {
        Some(every) => {
            let progress = scanner.progress();
            let (tx, rx) = mpsc::channel();
            let progress = &progress;
            std::thread::scope(|s| {
                s.spawn(move || monitor(progress, every, &rx));
                let res = scanner.run(sink.as_ref());
                drop(tx);
                res
            })?
        }
        None => scanner.run(sink.as_ref())?,
    };

    tracing::debug!(
        file = %file.display(),
        findings = summary.findings,
        workers = summary.workers,
        "done"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gzscan_core::gzip::header::{FNAME, MAGIC};
    use gzscan_core::scan_file;

    #[test]
    fn test_json_sink_writes_one_line_per_finding() {
        let mut data = vec![0u8; 256];
        let mut h = MAGIC.to_vec();
        h.extend_from_slice(&[FNAME, 0, 0xF1, 0x53, 0x65, 0, 3]);
        h.extend_from_slice(b"test.txt\0");
        data[16..16 + h.len()].copy_from_slice(&h);
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), &data).unwrap();

        let sink = JsonSink {
            out: Mutex::new(Vec::new()),
        };
        scan_file(tmp.path(), &ScanOptions::with_threads(2), &sink).unwrap();
        let text = String::from_utf8(sink.out.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);

        let v: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(v["position"], 16);
        assert_eq!(v["mtime"], 1_700_000_000u32);
        assert_eq!(v["filename"], "test.txt");
        assert_eq!(v["os_name"], "Unix");
    }

    #[test]
    fn test_handle_scan_missing_file_fails() {
        let err = handle_scan(
            PathBuf::from("/nonexistent/gzscan.bin"),
            &ScanOptions::with_threads(1),
            false,
            None,
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("while opening"));
    }

    #[test]
    fn test_monitor_stops_when_sender_dropped() {
        let scanner = Scanner::new(vec![0u8; 10], 10, &ScanOptions::with_threads(1)).unwrap();
        let progress = scanner.progress();
        let (tx, rx) = mpsc::channel::<()>();
        drop(tx);
        monitor(&progress, Duration::from_secs(3600), &rx);
    }
}
