use std::{
    error::Error,
    fmt::Display,
    sync::{Arc, PoisonError, RwLock},
};

use conlog_core::{ErrorDetail, LogEntry, LogProcessor};
use log::{
    Level, Log,
    kv::{Key, Source},
};

use crate::{LoggerOptions, LoggerRegistry, formatter::format_line};

/// State shared by a registry and all of its loggers.
pub(crate) struct Shared {
    pub(crate) processor: LogProcessor,
    options: RwLock<Arc<LoggerOptions>>,
}

impl Shared {
    pub(crate) fn new(processor: LogProcessor, options: LoggerOptions) -> Self {
        Self {
            processor,
            options: RwLock::new(Arc::new(options)),
        }
    }

    pub(crate) fn options(&self) -> Arc<LoggerOptions> {
        Arc::clone(&self.options.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub(crate) fn replace_options(&self, options: LoggerOptions) {
        *self.options.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(options);
    }
}

/// A named logger. Cheap to clone; every clone feeds the same writer thread.
#[derive(Clone)]
pub struct ConsoleLogger {
    name: Arc<str>,
    shared: Arc<Shared>,
}

impl ConsoleLogger {
    pub(crate) fn new(name: &str, shared: Arc<Shared>) -> Self {
        Self {
            name: name.into(),
            shared,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        self.shared.options().is_enabled(level)
    }

    pub fn log(&self, level: Level, message: impl Display) {
        self.submit(level, &message.to_string(), None);
    }

    /// Logs `message` followed by the error and its source chain.
    pub fn log_error(&self, level: Level, message: impl Display, error: &(dyn Error + 'static)) {
        self.submit(
            level,
            &message.to_string(),
            Some(ErrorDetail::from_error(error)),
        );
    }

    pub(crate) fn submit(&self, level: Level, message: &str, error: Option<ErrorDetail>) {
        let options = self.shared.options();
        if !options.is_enabled(level) {
            return;
        }
        let text = format_line(&options.formatter, level, Some(&self.name), message);
        let to_stderr = options.writes_to_stderr(level);
        let entry = match error {
            Some(error) => LogEntry::with_error(text, to_stderr, error),
            None => LogEntry::new(text, to_stderr),
        };
        self.shared.processor.submit(entry);
    }
}

/// Routes `log` records to the registry logger named after the record target.
///
/// An `error` key-value captured with `:err` is rendered as error detail.
pub(crate) struct FacadeLogger {
    pub(crate) registry: LoggerRegistry,
}

impl Log for FacadeLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.registry.options().is_enabled(metadata.level())
    }

    fn log(&self, record: &log::Record) {
        let error = record
            .key_values()
            .get(Key::from_str("error"))
            .and_then(|value| value.to_borrowed_error().map(ErrorDetail::from_error));
        self.registry.logger(record.target()).submit(
            record.level(),
            &record.args().to_string(),
            error,
        );
    }

    fn flush(&self) {}
}
