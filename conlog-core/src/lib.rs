//! # conlog-core
//! Core of conlog - a bounded log queue drained by a dedicated console writer thread.
//!
//! Producers submit fully rendered [`LogEntry`] values to a [`LogProcessor`].
//! The processor queues them for its writer thread, which writes each entry to
//! standard output or standard error. When the queue is full the configured
//! [`QueueFullMode`] decides whether the producer waits or writes the entry
//! itself.
//!
//! ```rust
//! use std::{sync::Arc, time::Duration};
//! use conlog_core::{LogEntry, LogProcessor, MemorySink, QueueFullMode, QueueOptions};
//!
//! let stdout = MemorySink::new();
//! let processor = LogProcessor::new(
//!     Arc::new(stdout.clone()),
//!     Arc::new(MemorySink::new()),
//!     QueueOptions {
//!         max_queue_length: 64,
//!         full_mode: QueueFullMode::Wait,
//!         ..Default::default()
//!     },
//! )
//! .expect("Unable to start the log writer");
//! processor.submit(LogEntry::new("Hello, world!", false));
//! processor.shutdown(Duration::from_millis(1500));
//! assert_eq!(stdout.lines(), ["Hello, world!"]);
//! ```

mod config;
mod entry;
mod error;
mod error_detail;
mod mode;
mod processor;
mod queue;
mod sink;

pub use config::{CONLOG_CONFIG, ConlogEnv};
pub use entry::LogEntry;
pub use error::{ConlogError, Result};
pub use error_detail::{ErrorDetail, ErrorRenderSettings};
pub use mode::QueueFullMode;
pub use processor::{LogProcessor, WRITER_THREAD_NAME};
pub use queue::{BoundedQueue, Enqueued, QueueOptions};
pub use sink::{ConsoleSink, MemorySink, StderrSink, StdoutSink};
