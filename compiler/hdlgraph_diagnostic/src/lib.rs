//! Contains the definition of the [`Diagnostic`] struct and related types.

use std::{fmt::Display, path::PathBuf};

use colored::Colorize;
use hdlgraph_tree::Span;
use serde::Serialize;

/// Implement this trait for a type that can report a diagnostic.
///
/// This trait is typically implemented by the structs that encode the
/// warning conditions found while analysing a project. The parameter carries
/// whatever context is needed to turn IDs into names and locations.
pub trait Report<Param> {
    /// Creates a diagnostic.
    fn report(&self, parameter: Param) -> Diagnostic;
}

/// Enumeration of the severity levels of a diagnostic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// An error that makes the result unusable.
    Error,

    /// A problem that was skipped over; the result is still usable.
    Warning,

    /// An informational message.
    Info,
}

/// Represents a region of a source file displayed alongside a diagnostic.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_new::new,
)]
pub struct Highlight {
    /// The source file the region belongs to.
    pub path: PathBuf,

    /// The byte range of the region, when the syntax tree provides one.
    pub span: Option<Span>,

    /// The additional message to display at the highlighted region.
    pub message: Option<String>,
}

/// A struct containing all the information required to display the diagnostic
/// to the user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Diagnostic {
    /// The location where the diagnostic occurred.
    pub primary_highlight: Option<Highlight>,

    /// The message to display to the user.
    pub message: String,

    /// The severity of the diagnostic.
    pub severity: Severity,

    /// The optional help message to display to the user.
    pub help_message: Option<String>,

    /// List of related locations, such as the earlier declaration in a
    /// redefinition.
    pub related: Vec<Highlight>,
}

/// A single colored `severity: message` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Message<'a> {
    severity: Severity,
    display: &'a str,
}

impl<'a> Message<'a> {
    /// Creates a new [`Message`].
    #[must_use]
    pub const fn new(severity: Severity, display: &'a str) -> Self {
        Self { severity, display }
    }
}

impl Display for Message<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error".red(),
            Severity::Warning => "warning".yellow(),
            Severity::Info => "info".green(),
        };

        write!(f, "{}{} {}", prefix.bold(), ":".bold(), self.display.bold())
    }
}

impl Display for Highlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())?;

        if let Some(span) = self.span {
            write!(f, "@{span}")?;
        }

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        Ok(())
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Message::new(self.severity, &self.message))?;

        if let Some(primary) = &self.primary_highlight {
            write!(f, "\n {} {primary}", "-->".bright_blue().bold())?;
        }

        for related in &self.related {
            write!(f, "\n  {} {related}", "=".bright_blue().bold())?;
        }

        if let Some(help) = &self.help_message {
            write!(f, "\n  {} {help}", "= help:".bright_blue().bold())?;
        }

        Ok(())
    }
}
