use std::fmt::Write;

use chrono::{Local, Utc};
use colored::{Color, ColoredString, Colorize};
use log::Level;

/// Colors and weight of a level label.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LevelStyle {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub bold: bool,
}

impl LevelStyle {
    pub fn fg(color: Color) -> Self {
        Self {
            foreground: Some(color),
            ..Self::default()
        }
    }

    pub fn on(self, color: Color) -> Self {
        Self {
            background: Some(color),
            ..self
        }
    }

    pub fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    pub fn paint(&self, label: &str) -> ColoredString {
        let mut painted = label.normal();
        if let Some(color) = self.foreground {
            painted = painted.color(color);
        }
        if let Some(color) = self.background {
            painted = painted.on_color(color);
        }
        if self.bold {
            painted = painted.bold();
        }
        painted
    }
}

/// One [`LevelStyle`] per log level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelStyles {
    pub error: LevelStyle,
    pub warn: LevelStyle,
    pub info: LevelStyle,
    pub debug: LevelStyle,
    pub trace: LevelStyle,
}

impl Default for LevelStyles {
    fn default() -> Self {
        Self {
            error: LevelStyle::fg(Color::Red),
            warn: LevelStyle::fg(Color::Yellow),
            info: LevelStyle::fg(Color::Green),
            debug: LevelStyle::fg(Color::Blue),
            trace: LevelStyle::fg(Color::Magenta),
        }
    }
}

impl LevelStyles {
    pub fn get(&self, level: Level) -> LevelStyle {
        match level {
            Level::Error => self.error,
            Level::Warn => self.warn,
            Level::Info => self.info,
            Level::Debug => self.debug,
            Level::Trace => self.trace,
        }
    }

    pub fn set(&mut self, level: Level, style: LevelStyle) {
        let slot = match level {
            Level::Error => &mut self.error,
            Level::Warn => &mut self.warn,
            Level::Info => &mut self.info,
            Level::Debug => &mut self.debug,
            Level::Trace => &mut self.trace,
        };
        *slot = style;
    }
}

/// Layout settings for rendered log lines.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatterOptions {
    /// `chrono` strftime format of the timestamp.
    pub timestamp_format: String,
    pub use_utc_timestamp: bool,
    /// Print the logger name between the timestamp and the level.
    pub include_category: bool,
    pub level_styles: LevelStyles,
}

impl Default for FormatterOptions {
    fn default() -> Self {
        Self {
            timestamp_format: "%Y-%m-%dT%H:%M:%S%.3f".into(),
            use_utc_timestamp: true,
            include_category: true,
            level_styles: LevelStyles::default(),
        }
    }
}

fn timestamp(options: &FormatterOptions) -> String {
    let mut time = String::new();
    let written = if options.use_utc_timestamp {
        write!(time, "{}", Utc::now().format(&options.timestamp_format))
    } else {
        write!(time, "{}", Local::now().format(&options.timestamp_format))
    };
    if written.is_err() {
        // Invalid strftime format.
        time.clear();
        time.push_str(&Utc::now().to_rfc3339());
    }
    time
}

/// Renders `[<time> <category> <LEVEL>] <message>` with a styled level.
pub fn format_line(
    options: &FormatterOptions,
    level: Level,
    category: Option<&str>,
    message: &str,
) -> String {
    let time = timestamp(options);
    let level = options.level_styles.get(level).paint(level.as_str());
    match category {
        Some(category) if options.include_category => {
            format!("[{time} {category} {level}] {message}")
        }
        _ => format!("[{time} {level}] {message}"),
    }
}

#[test]
fn test_format_line() {
    let options = FormatterOptions {
        timestamp_format: "%Y".into(),
        ..Default::default()
    };
    let line = format_line(&options, Level::Warn, Some("http"), "slow response");
    assert!(line.starts_with('['));
    assert!(line.contains(" http "));
    assert!(line.contains("WARN"));
    assert!(line.ends_with("] slow response"));

    let options = FormatterOptions {
        include_category: false,
        ..options
    };
    let line = format_line(&options, Level::Info, Some("http"), "ok");
    assert!(!line.contains("http"));
    assert!(line.ends_with("] ok"));
}

#[test]
fn test_invalid_timestamp_format_falls_back() {
    let options = FormatterOptions {
        timestamp_format: "%Q%".into(),
        use_utc_timestamp: false,
        ..Default::default()
    };
    let line = format_line(&options, Level::Error, None, "still written");
    assert!(line.ends_with("] still written"));
}

#[test]
fn test_level_style_override() {
    colored::control::set_override(true);
    let mut options = FormatterOptions::default();
    assert_eq!(options.level_styles.get(Level::Error), LevelStyle::fg(Color::Red));
    assert_eq!(options.level_styles.get(Level::Trace), LevelStyle::fg(Color::Magenta));

    let style = LevelStyle::fg(Color::White).on(Color::Red).bold();
    options.level_styles.set(Level::Info, style);
    assert_eq!(options.level_styles.get(Level::Info), style);
    assert_eq!(options.level_styles.get(Level::Warn), LevelStyle::fg(Color::Yellow));

    let line = format_line(&options, Level::Info, None, "styled");
    let expected = "INFO".white().on_red().bold().to_string();
    assert!(line.contains(&expected));
    assert!(!line.contains(&"INFO".green().to_string()));
    assert!(line.ends_with("] styled"));
}
