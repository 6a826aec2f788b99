use thiserror::Error;

/// Errors surfaced to whoever configures the logging pipeline.
///
/// Submitting a record never fails; only construction and reconfiguration do.
#[derive(Error, Debug)]
pub enum ConlogError {
    /// The queue capacity must be a positive number of records.
    #[error("max queue length must be greater than zero, got {0}")]
    InvalidCapacity(usize),

    #[error("unknown queue full mode `{0}`, expected `wait` or `drop`")]
    UnknownQueueFullMode(String),

    #[error("unable to spawn the log writer thread: {0}")]
    SpawnWriter(#[source] std::io::Error),

    #[error("a global logger is already installed: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, ConlogError>;
