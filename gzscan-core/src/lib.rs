#![forbid(unsafe_code)]

pub mod error;
pub mod finding;
pub mod options;
pub mod sink;

pub mod io {
    pub mod bounded;
    pub mod peek;
    pub mod positioned;
}

pub mod gzip {
    pub mod header;
    pub mod os;
}

pub mod scan {
    pub mod coordinator;
    pub mod progress;
    pub mod range;
    pub mod window;
}

// Re-exports: stable API surface
pub use error::{Result, ScanError};
pub use finding::{FlagTag, Finding};
pub use io::positioned::ReadAt;
pub use options::ScanOptions;
pub use scan::coordinator::{ScanSummary, Scanner, scan_file};
pub use scan::progress::Progress;
pub use sink::{CollectSink, FindingSink};
