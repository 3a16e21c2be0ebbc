//! Module containing structures and implementations for logging messages to the user.

use colored::Colorize;
use std::fmt::Display;

use super::source::Position;

/// Represent the severity of a log message to be printed to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Severity {
    Error,
    Info,
    Warning,
}

/// Struct implementing [`Display`] that represents a log message to be displayed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Message<T> {
    /// The severity of the log message.
    pub severity: Severity,

    /// The message to be displayed.
    pub display: T,
}

impl<T> Message<T> {
    /// Create a new log message with the given severity and message to be displayed.
    pub fn new(severity: Severity, display: T) -> Self {
        Self { severity, display }
    }
}

impl<T: Display> Display for Message<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let log_header = (match self.severity {
            Severity::Error => "[error]:".red(),
            Severity::Info => "[info]:".green(),
            Severity::Warning => "[warning]:".yellow(),
        })
        .bold();

        let message_part = &self.display.to_string().bold();

        write!(f, "{log_header} {message_part}")
    }
}

/// Structure implementing [`Display`] that points at a location in the source
/// code, optionally followed by a help message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PositionDisplay<T> {
    /// The position in the source code to be pointed at.
    pub position: Position,

    /// The help message to be displayed.
    pub help_display: Option<T>,
}

impl<T> PositionDisplay<T> {
    /// Create a new position display with the given position and help message to be displayed.
    pub fn new(position: Position, help_display: Option<T>) -> Self {
        Self {
            position,
            help_display,
        }
    }
}

impl<T: Display> Display for PositionDisplay<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  --> {}", self.position)?;

        if let Some(help_display) = &self.help_display {
            write!(f, "\n\n{help_display}")?;
        }

        Ok(())
    }
}
