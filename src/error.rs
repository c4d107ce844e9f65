use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub(crate) enum JournalError {
    #[error("invalid status symbol {0:?}")]
    InvalidStatusSymbol(char),

    #[error("corrupt task line {line} in {}: {reason}", .path.display())]
    CorruptTaskLine {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("invalid task text {text:?}: {reason}")]
    InvalidTaskText { text: String, reason: String },

    /// More than one page besides today's is present in the journal root.
    #[error("journal directory is corrupted: found {} stale pages ({})", .pages.len(), .pages.join(", "))]
    JournalCorrupted { pages: Vec<String> },

    #[error("archive already contains {}", .path.display())]
    ArchiveCollision { path: PathBuf },

    #[error("invalid filter {expression:?}: {reason}")]
    InvalidFilter { expression: String, reason: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl JournalError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Recoverable: reported to the user while the remaining edits still apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TaskIndexNotFound {
    pub(crate) index: i64,
    pub(crate) len: usize,
}

impl fmt::Display for TaskIndexNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task n° {} does not exist", self.index)
    }
}
