use crate::frontend::lexer::LexError;
use crate::lang::alphabet::AlphabetError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("syntax error: {0}")]
    Syntax(#[from] LexError),

    #[error("{op}: stack underflow (needs {needed} bubbles, found {found})")]
    StackUnderflow {
        op: &'static str,
        needed: usize,
        found: usize,
    },

    #[error("{op}: missing parameter")]
    MissingParameter { op: &'static str },

    #[error("invalid opcode {name}")]
    InvalidOpcode { name: String },

    #[error("range error: {0}")]
    Alphabet(#[from] AlphabetError),

    #[error("type error: {text:?} is not a number")]
    NotNumeric { text: String },

    #[error("{op}: division by zero")]
    DivisionByZero { op: &'static str },

    #[error("{op}: arithmetic overflow")]
    Overflow { op: &'static str },

    #[error("operation limit exceeded ({limit})")]
    LimitExceeded { limit: usize },

    #[error("io error: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for ErrorKind {
    fn from(e: std::io::Error) -> Self {
        ErrorKind::Io {
            message: e.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    /// Outermost frame first.
    pub call_stack: Vec<String>,
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "runtime error: {}", self.kind)?;

        if !self.call_stack.is_empty() {
            write!(f, "\n  call stack:")?;

            for (i, frame) in self.call_stack.iter().rev().enumerate() {
                write!(f, "\n    {}: {}", i, frame)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl RuntimeError {
    pub fn new(kind: ErrorKind) -> Self {
        RuntimeError {
            kind,
            call_stack: Vec::new(),
        }
    }

    pub fn with_trace(mut self, frames: &[String]) -> Self {
        self.call_stack = frames.to_vec();
        self
    }

    pub fn with_context(mut self, context: &str) -> Self {
        self.call_stack.push(context.to_string());
        self
    }
}

impl From<ErrorKind> for RuntimeError {
    fn from(kind: ErrorKind) -> Self {
        RuntimeError::new(kind)
    }
}

impl From<LexError> for RuntimeError {
    fn from(e: LexError) -> Self {
        RuntimeError::new(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_innermost_frame_first() {
        let err = RuntimeError::new(ErrorKind::LimitExceeded { limit: 10 })
            .with_context("run")
            .with_context("jmp@3");
        assert_eq!(
            err.to_string(),
            "runtime error: operation limit exceeded (10)\n  call stack:\n    0: jmp@3\n    1: run"
        );
    }

    #[test]
    fn test_display_without_trace() {
        let err = RuntimeError::new(ErrorKind::MissingParameter { op: "blo" });
        assert_eq!(err.to_string(), "runtime error: blo: missing parameter");
    }
}
