use crate::error_detail::ErrorDetail;

/// One rendered log line on its way to a console sink.
///
/// The text is final: colors and layout were applied by the formatter before
/// the entry was built. Entries are never modified after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    text: String,
    is_error_stream: bool,
    error: Option<ErrorDetail>,
}

impl LogEntry {
    pub fn new(text: impl Into<String>, is_error_stream: bool) -> Self {
        Self {
            text: text.into(),
            is_error_stream,
            error: None,
        }
    }

    pub fn with_error(text: impl Into<String>, is_error_stream: bool, error: ErrorDetail) -> Self {
        Self {
            text: text.into(),
            is_error_stream,
            error: Some(error),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// `true` routes the entry to the standard error sink.
    pub fn is_error_stream(&self) -> bool {
        self.is_error_stream
    }

    pub fn error(&self) -> Option<&ErrorDetail> {
        self.error.as_ref()
    }
}
