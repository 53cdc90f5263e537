//! Colored terminal output.
//!
//! Status messages go to stderr so that command results on stdout stay
//! machine-readable.

use console::{Style, Term};
use togglebutton_site::{Diagnostic, Level};

/// Message tone.
#[derive(Clone, Copy)]
enum Tone {
    Plain,
    Success,
    Warning,
    Error,
    Heading,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Plain => Style::new(),
            Self::Success => Style::new().green(),
            Self::Warning => Style::new().yellow(),
            Self::Error => Style::new().red(),
            Self::Heading => Style::new().cyan().bold(),
        }
    }
}

/// Terminal output formatter.
pub(crate) struct Output {
    status: Term,
    results: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            status: Term::stderr(),
            results: Term::stdout(),
        }
    }

    fn status(&self, tone: Tone, msg: &str) {
        let _ = self.status.write_line(&tone.style().apply_to(msg).to_string());
    }

    pub(crate) fn info(&self, msg: &str) {
        self.status(Tone::Plain, msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.status(Tone::Success, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.status(Tone::Warning, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.status(Tone::Error, msg);
    }

    pub(crate) fn highlight(&self, msg: &str) {
        self.status(Tone::Heading, msg);
    }

    /// Print a page diagnostic, yellow for warnings and red for errors.
    pub(crate) fn diagnostic(&self, diagnostic: &Diagnostic) {
        let tone = match diagnostic.level {
            Level::Warning => Tone::Warning,
            Level::Error => Tone::Error,
        };
        self.status(tone, &diagnostic.to_string());
    }

    /// Print a command result line to stdout, uncolored.
    pub(crate) fn result(&self, msg: &str) {
        let _ = self.results.write_line(msg);
    }
}
