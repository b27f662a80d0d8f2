//! Error reporting for the assembler.
//!
//! A `SyntaxError` stops assembly outright. A `Diagnostic` only records
//! that a substitute value was used; assembly carries on so that a full
//! listing can still be produced.
use std::error::Error;
use std::fmt;

use super::ast::Position;

/// Malformed source text. No listing is produced.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SyntaxError {
    pub position: Position,
    pub message: String,
}

impl SyntaxError {
    pub fn new<S: Into<String>>(position: Position, message: S) -> Self {
        SyntaxError { position, message: message.into() }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} syntax error: {}", self.position, self.message)
    }
}

impl Error for SyntaxError {}

/// A recoverable problem with an operand.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Diagnostic {
    pub position: Position,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} Error: {}", self.position, self.message)
    }
}

/// Collects diagnostics in the order they are reported.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics { entries: Vec::new() }
    }

    pub fn report<S: Into<String>>(&mut self, position: Position, message: S) {
        let diag = Diagnostic { position, message: message.into() };
        debug!("{}", diag);
        self.entries.push(diag);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Hands the collected diagnostics to the caller, leaving this sink empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }
}
