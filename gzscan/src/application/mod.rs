pub mod handlers;

use crate::presentation::cli::Cli;
use gzscan_core::{Result, ScanOptions};

pub fn run(cli: Cli) -> Result<()> {
    let mut opts = ScanOptions::default();
    if let Some(t) = cli.threads {
        opts.threads = t;
    }
    let progress = cli
        .progress
        .filter(|s| *s > 0)
        .map(std::time::Duration::from_secs);
    handlers::handle_scan(cli.file, &opts, cli.json, progress)
}
