use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Locate embedded gzip headers in a file",
    long_about = "Scans a file of any size for byte sequences that look like gzip member \
                  headers and reports each candidate with its decoded header fields. \
                  Nothing is decompressed and no checksum is verified."
)]
pub struct Cli {
    /// File or disk image to scan
    pub file: PathBuf,

    /// Number of worker threads (defaults to twice the CPU count)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Print one JSON object per finding on stdout instead of log lines
    #[arg(long)]
    pub json: bool,

    /// Log scan progress every N seconds
    #[arg(long, value_name = "SECS")]
    pub progress: Option<u64>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}
