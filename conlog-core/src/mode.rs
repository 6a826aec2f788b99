use std::{fmt, str::FromStr};

use crate::error::ConlogError;

/// Behaviour of [`submit`](crate::LogProcessor::submit) once the queue holds
/// `capacity` records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum QueueFullMode {
    /// Block the producing thread until the writer frees a slot or the queue closes.
    #[default]
    Wait,
    /// Write the record synchronously on the producing thread and count it as dropped.
    DropAndWriteInline,
}

impl FromStr for QueueFullMode {
    type Err = ConlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wait" => Ok(Self::Wait),
            "drop" | "drop-write" | "drop-and-write-inline" => Ok(Self::DropAndWriteInline),
            _ => Err(ConlogError::UnknownQueueFullMode(s.to_string())),
        }
    }
}

impl fmt::Display for QueueFullMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wait => f.write_str("wait"),
            Self::DropAndWriteInline => f.write_str("drop-and-write-inline"),
        }
    }
}

#[test]
fn test_queue_full_mode_from_str() {
    assert_eq!("wait".parse::<QueueFullMode>().unwrap(), QueueFullMode::Wait);
    assert_eq!(" Drop ".parse::<QueueFullMode>().unwrap(), QueueFullMode::DropAndWriteInline);
    assert_eq!(
        QueueFullMode::DropAndWriteInline
            .to_string()
            .parse::<QueueFullMode>()
            .unwrap(),
        QueueFullMode::DropAndWriteInline
    );
    assert!(matches!(
        "block".parse::<QueueFullMode>(),
        Err(ConlogError::UnknownQueueFullMode(value)) if value == "block"
    ));
}
