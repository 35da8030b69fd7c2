use std::error::Error;
use std::{fmt, io};
use crate::parser::Position;

#[derive(Debug)]
pub enum BrainfuckError {
    /// Generic message
    Message(String),
    /// I/O error.
    IoError(io::Error),
    /// A `]` without a matching `[`, or a `[` never closed.
    UnbalancedLoop { position: Position },
    /// A run of identical instructions is too long to fit in a single count.
    RunLengthOverflow { symbol: char, position: Position },
    /// Unknown optimization pass.
    UnknownOptimizationPass(String)
}

impl Error for BrainfuckError {}

impl fmt::Display for BrainfuckError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use BrainfuckError::*;
        match self {
            Message(ref m) => {
                write!(f, "{}", m)
            },
            IoError(ref e) => {
                write!(f, "I/O error: {}", e)
            },
            UnbalancedLoop { position } => {
                write!(f, "Unbalanced loop bracket at ({}-{})", position.start, position.end)
            },
            RunLengthOverflow { symbol, position } => {
                write!(f, "Run of '{}' too long to collapse at ({}-{})", symbol, position.start, position.end)
            },
            UnknownOptimizationPass(ref name) => {
                write!(f, "Unknown optimization pass: {}", name)
            }
        }
    }
}

impl From<&str> for BrainfuckError {
    fn from(s: &str) -> Self {
        BrainfuckError::Message(s.to_owned())
    }
}

impl From<String> for BrainfuckError {
    fn from(s: String) -> Self {
        BrainfuckError::Message(s)
    }
}

impl From<io::Error> for BrainfuckError {
    fn from(e: io::Error) -> Self {
        BrainfuckError::IoError(e)
    }
}
