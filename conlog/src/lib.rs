//! # conlog
//! Colorized console logging for CLI tools, written from a dedicated thread.
//!
//! Records are formatted on the logging thread and queued for a single writer
//! thread. Severe records go to standard error, the rest to standard output.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! conlog = "0.1.0"
//! ```
//!
//! ```rust
//! use conlog::logger_config;
//!
//! let _guard = logger_config()
//!     .init_global()
//!     .expect("Unable to install the logger");
//! log::info!("Hello, world!");
//! // guard ensures queued logs are written when dropped
//! ```
//!
//! ## Explicit registry
//! A [`LoggerRegistry`] can also be used without touching the global `log`
//! facade. Each registry owns its writer thread.
//!
//! ```rust
//! use std::sync::Arc;
//! use conlog::{MemorySink, QueueFullMode, logger_config};
//! use log::Level;
//!
//! let stdout = MemorySink::new();
//! let registry = logger_config()
//!     .with_max_queue_length(128)
//!     .with_queue_full_mode(QueueFullMode::DropAndWriteInline)
//!     .with_sinks(Arc::new(stdout.clone()), Arc::new(MemorySink::new()))
//!     .build()
//!     .expect("Unable to start the logger");
//!
//! let handles: Vec<_> = (0..4).map(|i| {
//!     let logger = registry.logger(&format!("worker {i}"));
//!     std::thread::spawn(move || logger.log(Level::Info, "Hello from a worker!"))
//! }).collect();
//! for h in handles { h.join().unwrap(); }
//!
//! registry.shutdown();
//! assert_eq!(stdout.len(), 4);
//! ```
//!
//! ## Queue full mode
//! With [`QueueFullMode::Wait`] (the default) a thread logging into a full
//! queue blocks until the writer catches up. With
//! [`QueueFullMode::DropAndWriteInline`] it writes the record itself instead,
//! and a warning with the number of such records is queued before the next
//! record that fits.

mod formatter;
mod logger;
mod options;
mod registry;

pub use colored::Color;
pub use conlog_core::{
    ConlogError, ConsoleSink, ErrorDetail, ErrorRenderSettings, LogEntry, LogProcessor,
    MemorySink, QueueFullMode, QueueOptions, Result, StderrSink, StdoutSink,
};
pub use formatter::{FormatterOptions, LevelStyle, LevelStyles, format_line};
pub use logger::ConsoleLogger;
pub use options::{ConfigBuilder, LoggerOptions, logger_config};
pub use registry::{LoggerGuard, LoggerRegistry};
