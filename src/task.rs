use crate::error::JournalError;
use crate::status::Status;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Task {
    pub(crate) status: Status,
    pub(crate) text: String,
}

impl Task {
    /// Builds a task from user input. The first character of a stored line is
    /// the status, so text may not open with a status symbol or span lines.
    pub(crate) fn new(status: Status, text: impl Into<String>) -> Result<Self, JournalError> {
        let text = text.into();
        if text.contains(['\n', '\r']) {
            return Err(JournalError::InvalidTaskText {
                text,
                reason: "must be a single line".to_string(),
            });
        }
        if text.chars().next().is_some_and(Status::is_symbol) {
            return Err(JournalError::InvalidTaskText {
                text,
                reason: "must not start with a status symbol".to_string(),
            });
        }
        Ok(Self { status, text })
    }

    pub(crate) fn pending(text: impl Into<String>) -> Result<Self, JournalError> {
        Self::new(Status::Pending, text)
    }

    /// Copy carried forward to the next page.
    pub(crate) fn reopened(&self) -> Self {
        Self {
            status: Status::Pending,
            text: self.text.clone(),
        }
    }

    pub(crate) fn to_line(&self) -> String {
        let mut line = String::with_capacity(self.text.len() + 4);
        line.push(self.status.symbol());
        line.push_str(&self.text);
        line
    }

    /// Parses a stored line without re-checking the text: positional decoding
    /// is unambiguous for anything `to_line` produced.
    pub(crate) fn from_line(line: &str) -> Result<Self, String> {
        let mut chars = line.chars();
        let Some(symbol) = chars.next() else {
            return Err("blank line".to_string());
        };
        let status = Status::parse(symbol).map_err(|err| err.to_string())?;
        Ok(Self {
            status,
            text: chars.as_str().to_string(),
        })
    }
}
