//! Build-time diagnostics reported to document authors.

use std::fmt;
use std::path::PathBuf;

/// Severity of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Markup was accepted but probably not what the author meant.
    Warning,
    /// A directive could not be processed; its node was omitted.
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("WARNING"),
            Self::Error => f.write_str("ERROR"),
        }
    }
}

/// A message pointing at a location in a source document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity.
    pub level: Level,
    /// Source file, if known.
    pub source_path: Option<PathBuf>,
    /// Line number (1-indexed).
    pub line: usize,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Whether this is an error-level diagnostic.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source_path {
            Some(path) => write!(f, "{}:{}: ", path.display(), self.line)?,
            None => write!(f, "line {}: ", self.line)?,
        }
        write!(f, "{}: {}", self.level, self.message)
    }
}
