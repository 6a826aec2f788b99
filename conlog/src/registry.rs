use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use conlog_core::{ConsoleSink, LogProcessor, Result};

use crate::{
    LoggerOptions,
    logger::{ConsoleLogger, FacadeLogger, Shared},
};

/// Owns one writer thread and hands out named [`ConsoleLogger`]s feeding it.
///
/// Registries are plain values: create one at startup, pass it (or its
/// loggers) to whoever logs, and shut it down when the application ends.
/// Clones share the same writer and logger cache.
#[derive(Clone)]
pub struct LoggerRegistry {
    shared: Arc<Shared>,
    loggers: Arc<Mutex<HashMap<String, ConsoleLogger>>>,
    installed: Arc<AtomicBool>,
}

impl LoggerRegistry {
    /// A registry writing to the process' standard output and standard error.
    pub fn new(options: LoggerOptions) -> Result<Self> {
        let processor = LogProcessor::stdio(options.queue.clone())?;
        Ok(Self::from_processor(processor, options))
    }

    pub fn with_sinks(
        stdout: Arc<dyn ConsoleSink>,
        stderr: Arc<dyn ConsoleSink>,
        options: LoggerOptions,
    ) -> Result<Self> {
        let processor = LogProcessor::new(stdout, stderr, options.queue.clone())?;
        Ok(Self::from_processor(processor, options))
    }

    fn from_processor(processor: LogProcessor, options: LoggerOptions) -> Self {
        processor.set_shutdown_grace(options.shutdown_grace);
        Self {
            shared: Arc::new(Shared::new(processor, options)),
            loggers: Arc::default(),
            installed: Arc::default(),
        }
    }

    /// Returns the logger for `name`, creating it on first use.
    pub fn logger(&self, name: &str) -> ConsoleLogger {
        let mut loggers = self.loggers.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(logger) = loggers.get(name) {
            return logger.clone();
        }
        let logger = ConsoleLogger::new(name, Arc::clone(&self.shared));
        loggers.insert(name.to_string(), logger.clone());
        logger
    }

    pub fn options(&self) -> Arc<LoggerOptions> {
        self.shared.options()
    }

    /// Applies new options to the writer and to every logger.
    ///
    /// Blocked producers re-evaluate the new queue settings immediately.
    /// Invalid options are rejected and the current ones stay in effect.
    pub fn reload(&self, options: LoggerOptions) -> Result<()> {
        self.shared.processor.configure(&options.queue)?;
        self.shared.processor.set_shutdown_grace(options.shutdown_grace);
        if self.installed.load(Ordering::SeqCst) {
            log::set_max_level(options.level);
        }
        self.shared.replace_options(options);
        Ok(())
    }

    pub fn processor(&self) -> &LogProcessor {
        &self.shared.processor
    }

    /// Drains queued records within the configured grace period and stops the writer.
    ///
    /// Records logged afterwards are written inline by the calling thread.
    pub fn shutdown(&self) {
        self.shared.processor.shutdown(self.options().shutdown_grace);
    }

    /// Installs this registry as the global `log` facade.
    #[must_use = "LoggerGuard must be kept alive to ensure logging works"]
    pub fn install(&self) -> Result<LoggerGuard> {
        log::set_boxed_logger(Box::new(FacadeLogger {
            registry: self.clone(),
        }))?;
        log::set_max_level(self.options().level);
        self.installed.store(true, Ordering::SeqCst);
        Ok(LoggerGuard::new(self.clone()))
    }
}

/// Guard that ensures the logger is properly shut down when dropped.
/// Hold this guard for the lifetime of your logging session.
pub struct LoggerGuard {
    registry: LoggerRegistry,
}

impl LoggerGuard {
    pub fn new(registry: LoggerRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &LoggerRegistry {
        &self.registry
    }
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        self.registry.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger_config;
    use conlog_core::{ErrorRenderSettings, MemorySink, QueueFullMode};
    use log::{Level, LevelFilter};
    use std::{fmt, time::Duration};

    fn registry() -> (LoggerRegistry, MemorySink, MemorySink) {
        let stdout = MemorySink::new();
        let stderr = MemorySink::new();
        let registry = logger_config()
            .with_level(LevelFilter::Debug)
            .with_stderr_threshold(Level::Warn)
            .with_max_queue_length(8)
            .with_error_settings(ErrorRenderSettings {
                colorize: false,
                ..Default::default()
            })
            .with_shutdown_grace(Duration::from_secs(5))
            .with_sinks(Arc::new(stdout.clone()), Arc::new(stderr.clone()))
            .build()
            .unwrap();
        (registry, stdout, stderr)
    }

    #[derive(Debug)]
    struct ConfigMissing;

    impl fmt::Display for ConfigMissing {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("config file missing")
        }
    }

    impl std::error::Error for ConfigMissing {}

    #[test]
    fn test_loggers_are_cached_by_name() {
        let (registry, _, _) = registry();
        let first = registry.logger("db");
        let second = registry.logger("db");
        assert_eq!(first.name(), "db");
        assert_eq!(second.name(), "db");
        assert_eq!(registry.loggers.lock().unwrap().len(), 1);
        registry.logger("http");
        assert_eq!(registry.loggers.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_levels_route_to_streams() {
        let (registry, stdout, stderr) = registry();
        let logger = registry.logger("app");
        logger.log(Level::Trace, "filtered out");
        logger.log(Level::Debug, "debugging");
        logger.log(Level::Info, "started");
        logger.log(Level::Warn, "slow");
        logger.log(Level::Error, "failed");
        registry.shutdown();

        let stdout = stdout.lines();
        let stderr = stderr.lines();
        assert_eq!(stdout.len(), 2);
        assert!(stdout[0].ends_with("] debugging"));
        assert!(stdout[1].ends_with("] started"));
        assert_eq!(stderr.len(), 2);
        assert!(stderr[0].ends_with("] slow"));
        assert!(stderr[1].ends_with("] failed"));
        assert!(stdout.iter().chain(&stderr).all(|line| line.contains(" app ")));
    }

    #[test]
    fn test_log_error_renders_detail() {
        let (registry, _, stderr) = registry();
        registry
            .logger("config")
            .log_error(Level::Error, "unable to start", &ConfigMissing);
        registry.shutdown();
        let lines = stderr.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("] unable to start"));
        assert_eq!(lines[1], "error: config file missing");
    }

    #[test]
    fn test_reload_updates_loggers_and_queue() {
        let (registry, stdout, _) = registry();
        let logger = registry.logger("app");
        assert!(logger.is_enabled(Level::Debug));
        assert_eq!(registry.processor().shutdown_grace(), Duration::from_secs(5));

        let mut options = (*registry.options()).clone();
        options.level = LevelFilter::Warn;
        options.queue.max_queue_length = 32;
        options.queue.full_mode = QueueFullMode::DropAndWriteInline;
        options.shutdown_grace = Duration::from_millis(250);
        registry.reload(options.clone()).unwrap();
        assert!(!logger.is_enabled(Level::Info));
        assert_eq!(registry.processor().capacity(), 32);
        assert_eq!(registry.processor().mode(), QueueFullMode::DropAndWriteInline);
        assert_eq!(registry.processor().shutdown_grace(), Duration::from_millis(250));

        options.queue.max_queue_length = 0;
        options.shutdown_grace = Duration::ZERO;
        assert!(registry.reload(options).is_err());
        assert_eq!(registry.processor().capacity(), 32);
        assert_eq!(registry.processor().shutdown_grace(), Duration::from_millis(250));
        assert_eq!(registry.options().queue.max_queue_length, 32);

        logger.log(Level::Info, "hidden");
        registry.shutdown();
        assert!(stdout.is_empty());
    }

    #[test]
    fn test_guard_shuts_down_and_later_records_are_inline() {
        let (registry, stdout, _) = registry();
        let logger = registry.logger("app");
        let guard = LoggerGuard::new(registry.clone());
        logger.log(Level::Info, "queued");
        drop(guard);
        assert!(registry.processor().is_closed());
        assert_eq!(stdout.len(), 1);
        logger.log(Level::Info, "inline");
        assert_eq!(stdout.len(), 2);
    }
}
