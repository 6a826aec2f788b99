use std::{sync::Arc, time::Duration};

use conlog_core::{
    CONLOG_CONFIG, ConsoleSink, ErrorRenderSettings, QueueFullMode, QueueOptions, Result,
};
use log::{Level, LevelFilter};

use crate::{
    LoggerGuard, LoggerRegistry,
    formatter::{FormatterOptions, LevelStyle},
};

/// Settings shared by every logger of a [`LoggerRegistry`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerOptions {
    /// Most verbose level that gets logged.
    pub level: LevelFilter,
    /// Records at this severity or above go to standard error.
    /// `None` keeps everything on standard output.
    pub stderr_threshold: Option<Level>,
    pub queue: QueueOptions,
    pub formatter: FormatterOptions,
    /// How long shutdown waits for queued records to be written.
    pub shutdown_grace: Duration,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            stderr_threshold: Some(Level::Error),
            queue: QueueOptions::default(),
            formatter: FormatterOptions::default(),
            shutdown_grace: CONLOG_CONFIG.shutdown_grace(),
        }
    }
}

impl LoggerOptions {
    pub fn is_enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    pub fn writes_to_stderr(&self, level: Level) -> bool {
        self.stderr_threshold.is_some_and(|threshold| level <= threshold)
    }
}

/// Builder for configuring and initializing a [`LoggerRegistry`].
#[derive(Default)]
pub struct ConfigBuilder {
    options: LoggerOptions,
    sinks: Option<(Arc<dyn ConsoleSink>, Arc<dyn ConsoleSink>)>,
}

impl ConfigBuilder {
    /// Sets the most verbose level that gets logged.
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.options.level = level;
        self
    }
    /// Sets the least severe level written to standard error.
    pub fn with_stderr_threshold(mut self, level: Level) -> Self {
        self.options.stderr_threshold = Some(level);
        self
    }
    /// Write every record to standard output.
    pub fn no_stderr(mut self) -> Self {
        self.options.stderr_threshold = None;
        self
    }
    /// Sets the number of records queued before the full mode applies.
    pub fn with_max_queue_length(mut self, max_queue_length: usize) -> Self {
        self.options.queue.max_queue_length = max_queue_length;
        self
    }
    pub fn with_queue_full_mode(mut self, mode: QueueFullMode) -> Self {
        self.options.queue.full_mode = mode;
        self
    }
    pub fn with_error_settings(mut self, settings: ErrorRenderSettings) -> Self {
        self.options.queue.error_settings = settings;
        self
    }
    /// Sets the strftime format of timestamps.
    pub fn with_timestamp_format(mut self, format: &str) -> Self {
        self.options.formatter.timestamp_format = format.into();
        self
    }
    pub fn with_utc_timestamp(mut self, yes: bool) -> Self {
        self.options.formatter.use_utc_timestamp = yes;
        self
    }
    /// Overrides the colors of one level label.
    pub fn with_level_style(mut self, level: Level, style: LevelStyle) -> Self {
        self.options.formatter.level_styles.set(level, style);
        self
    }
    /// Leave the logger name out of rendered lines.
    pub fn no_category(mut self) -> Self {
        self.options.formatter.include_category = false;
        self
    }
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.options.shutdown_grace = grace;
        self
    }
    /// Write to the given sinks instead of the process' standard streams.
    pub fn with_sinks(mut self, stdout: Arc<dyn ConsoleSink>, stderr: Arc<dyn ConsoleSink>) -> Self {
        self.sinks = Some((stdout, stderr));
        self
    }
    pub fn options(&self) -> &LoggerOptions {
        &self.options
    }
    /// Starts the writer thread and returns the registry owning it.
    pub fn build(self) -> Result<LoggerRegistry> {
        match self.sinks {
            Some((stdout, stderr)) => LoggerRegistry::with_sinks(stdout, stderr, self.options),
            None => LoggerRegistry::new(self.options),
        }
    }
    /// Builds the registry and installs it as the `log` facade.
    /// Returns a guard that drains and shuts down the writer when dropped.
    #[must_use = "LoggerGuard must be kept alive to ensure logging works. Do \"let _guard = logger_config().init_global()?;\""]
    pub fn init_global(self) -> Result<LoggerGuard> {
        self.build()?.install()
    }
}

/// Returns a default ConfigBuilder for configuring the logger.
pub fn logger_config() -> ConfigBuilder {
    ConfigBuilder::default()
}

#[test]
fn test_stream_threshold() {
    let options = LoggerOptions {
        stderr_threshold: Some(Level::Warn),
        level: LevelFilter::Debug,
        ..Default::default()
    };
    assert!(options.writes_to_stderr(Level::Error));
    assert!(options.writes_to_stderr(Level::Warn));
    assert!(!options.writes_to_stderr(Level::Info));
    assert!(options.is_enabled(Level::Debug));
    assert!(!options.is_enabled(Level::Trace));

    let options = LoggerOptions {
        stderr_threshold: None,
        ..options
    };
    assert!(!options.writes_to_stderr(Level::Error));
}

#[test]
fn test_builder_collects_options() {
    let builder = logger_config()
        .with_level(LevelFilter::Trace)
        .with_stderr_threshold(Level::Warn)
        .with_max_queue_length(16)
        .with_queue_full_mode(QueueFullMode::DropAndWriteInline)
        .with_timestamp_format("%H:%M:%S")
        .with_utc_timestamp(false)
        .no_category()
        .with_level_style(Level::Debug, LevelStyle::fg(colored::Color::Cyan).bold())
        .with_shutdown_grace(Duration::from_millis(10));
    let options = builder.options();
    assert_eq!(options.level, LevelFilter::Trace);
    assert_eq!(options.stderr_threshold, Some(Level::Warn));
    assert_eq!(
        options.formatter.level_styles.get(Level::Debug),
        LevelStyle::fg(colored::Color::Cyan).bold()
    );
    assert_eq!(logger_config().no_stderr().options().stderr_threshold, None);
    assert_eq!(options.queue.max_queue_length, 16);
    assert_eq!(options.queue.full_mode, QueueFullMode::DropAndWriteInline);
    assert_eq!(options.formatter.timestamp_format, "%H:%M:%S");
    assert!(!options.formatter.use_utc_timestamp);
    assert!(!options.formatter.include_category);
    assert_eq!(options.shutdown_grace, Duration::from_millis(10));
}

#[test]
fn test_builder_rejects_empty_queue() {
    let result = logger_config()
        .with_max_queue_length(0)
        .with_sinks(
            Arc::new(conlog_core::MemorySink::new()),
            Arc::new(conlog_core::MemorySink::new()),
        )
        .build();
    assert!(matches!(
        result,
        Err(conlog_core::ConlogError::InvalidCapacity(0))
    ));
}
