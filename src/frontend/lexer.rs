use crate::bytecode::op::{Opcode, Token};
use thiserror::Error;
use tracing::debug;

/// Literal that opens every program; decoding starts right after it.
pub const START_MARKER: &str = "awa";

pub const ONE: &str = "wa";
pub const ZERO: &str = " awa";
pub const SIGN_SEED: &str = " ~wa";

pub const OPCODE_BITS: u32 = 5;
pub const PARAMETER_BITS: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("missing start marker 'awa'")]
    MissingStartMarker,

    /// `position` is a character offset into the sanitized source.
    #[error("unexpected input {found:?} at position {position}")]
    UnexpectedInput { position: usize, found: String },

    #[error("sign marker at position {position} is not the first bit of a token")]
    MisplacedSignSeed { position: usize },
}

/// Keeps only `a`, `w`, `~` and whitespace, collapses whitespace runs to one
/// space and lower-cases the rest.
pub fn sanitize(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut in_space = false;

    for ch in source.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
            continue;
        }

        let lower = ch.to_ascii_lowercase();
        if matches!(lower, 'a' | 'w' | '~') {
            out.push(lower);
            in_space = false;
        }
    }

    out
}

pub struct Lexer {
    source: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            source: sanitize(source).chars().collect(),
            pos: 0,
        }
    }

    fn remaining(&self) -> usize {
        self.source.len().saturating_sub(self.pos)
    }

    fn at(&self, unit: &str) -> bool {
        let mut i = self.pos;
        for ch in unit.chars() {
            if self.source.get(i) != Some(&ch) {
                return false;
            }
            i += 1;
        }
        true
    }

    fn seek_start_marker(&mut self) -> Result<(), LexError> {
        let marker: Vec<char> = START_MARKER.chars().collect();
        let start = self
            .source
            .windows(marker.len())
            .position(|w| w == marker.as_slice())
            .ok_or(LexError::MissingStartMarker)?;

        self.pos = start + marker.len();
        Ok(())
    }

    fn unexpected(&self) -> LexError {
        let found: String = self.source[self.pos..].iter().take(4).collect();
        LexError::UnexpectedInput {
            position: self.pos,
            found,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        self.seek_start_marker()?;

        let mut tokens = Vec::new();
        let mut value: Token = 0;
        let mut bits = 0;
        let mut width = OPCODE_BITS;

        // decoding stops once fewer than four characters remain, even when
        // they would spell a one bit
        while self.remaining() >= ZERO.len() {
            if self.at(ONE) {
                value = value * 2 + 1;
                self.pos += ONE.len();
            } else if self.at(ZERO) {
                value *= 2;
                self.pos += ZERO.len();
            } else if self.at(SIGN_SEED) {
                if bits != 0 {
                    return Err(LexError::MisplacedSignSeed { position: self.pos });
                }
                value = -1;
                self.pos += SIGN_SEED.len();
            } else {
                return Err(self.unexpected());
            }

            bits += 1;
            if bits < width {
                continue;
            }

            tokens.push(value);
            width = if width == OPCODE_BITS
                && Opcode::decode(value).is_some_and(Opcode::takes_parameter)
            {
                PARAMETER_BITS
            } else {
                OPCODE_BITS
            };
            value = 0;
            bits = 0;
        }

        if bits > 0 {
            debug!(bits, "discarding incomplete trailing token");
        }
        debug!(count = tokens.len(), "decoded tokens");

        Ok(tokens)
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}
