use std::{backtrace::Backtrace, error::Error, fmt::Write};

use colored::Colorize;

/// Controls how an [`ErrorDetail`] attached to an entry is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRenderSettings {
    /// Render one `caused by:` line per error in the source chain.
    pub show_causes: bool,
    /// Render the captured backtrace, when there is one.
    pub show_backtrace: bool,
    pub colorize: bool,
}

impl Default for ErrorRenderSettings {
    fn default() -> Self {
        Self {
            show_causes: true,
            show_backtrace: false,
            colorize: true,
        }
    }
}

/// Owned snapshot of an error and its source chain.
///
/// Errors are captured as text at submission time so the entry can cross to
/// the writer thread without borrowing from the producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    message: String,
    causes: Vec<String>,
    backtrace: Option<String>,
}

impl ErrorDetail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            causes: Vec::new(),
            backtrace: None,
        }
    }

    pub fn from_error(error: &(dyn Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self {
            message: error.to_string(),
            causes,
            backtrace: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    pub fn with_backtrace(mut self, backtrace: &Backtrace) -> Self {
        self.backtrace = Some(backtrace.to_string());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    pub fn backtrace(&self) -> Option<&str> {
        self.backtrace.as_deref()
    }

    /// Appends the rendered detail to `out`, one newline-terminated line at a time.
    pub fn render_into(&self, out: &mut String, settings: &ErrorRenderSettings) {
        let (error_label, cause_label, backtrace_label) = if settings.colorize {
            (
                "error:".red().bold().to_string(),
                "caused by:".yellow().to_string(),
                "stack backtrace:".dimmed().to_string(),
            )
        } else {
            (
                "error:".to_string(),
                "caused by:".to_string(),
                "stack backtrace:".to_string(),
            )
        };
        let _ = writeln!(out, "{error_label} {}", self.message.trim_end());
        if settings.show_causes {
            for cause in &self.causes {
                let _ = writeln!(out, "  {cause_label} {}", cause.trim_end());
            }
        }
        if settings.show_backtrace
            && let Some(backtrace) = &self.backtrace
        {
            let _ = writeln!(out, "{backtrace_label}");
            for line in backtrace.lines() {
                let _ = writeln!(out, "{line}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Layer {
        message: &'static str,
        source: Option<Box<Layer>>,
    }

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl Error for Layer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            self.source.as_deref().map(|s| s as &(dyn Error + 'static))
        }
    }

    fn plain() -> ErrorRenderSettings {
        ErrorRenderSettings {
            colorize: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_from_error_walks_source_chain() {
        let error = Layer {
            message: "unable to load settings",
            source: Some(Box::new(Layer {
                message: "permission denied",
                source: None,
            })),
        };
        let detail = ErrorDetail::from_error(&error);
        assert_eq!(detail.message(), "unable to load settings");
        assert_eq!(detail.causes(), ["permission denied".to_string()]);
        assert!(detail.backtrace().is_none());
    }

    #[test]
    fn test_render_with_and_without_causes() {
        let detail = ErrorDetail::new("request failed").with_cause("connection reset");
        let mut out = String::new();
        detail.render_into(&mut out, &plain());
        assert_eq!(out, "error: request failed\n  caused by: connection reset\n");

        let mut out = String::new();
        detail.render_into(
            &mut out,
            &ErrorRenderSettings {
                show_causes: false,
                ..plain()
            },
        );
        assert_eq!(out, "error: request failed\n");
    }

    #[test]
    fn test_backtrace_only_rendered_when_enabled() {
        let detail = ErrorDetail::new("boom").with_backtrace(&Backtrace::disabled());
        let mut out = String::new();
        detail.render_into(&mut out, &plain());
        assert!(!out.contains("stack backtrace:"));

        let mut out = String::new();
        detail.render_into(
            &mut out,
            &ErrorRenderSettings {
                show_backtrace: true,
                ..plain()
            },
        );
        assert!(out.starts_with("error: boom\nstack backtrace:\n"));
    }
}
