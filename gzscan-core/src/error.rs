use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("while opening {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("worker {index} failed scanning [{start}, {end}): {source}")]
    Worker {
        index: usize,
        start: u64,
        end: u64,
        #[source]
        source: std::io::Error,
    },
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, ScanError>;
