//! # awa
//!
//! Interpreter for the awa bit-stream language: source text spelled with
//! `wa` (1), ` awa` (0) and ` ~wa` (sign) decodes into 5-bit opcodes and
//! 8-bit parameters that run against a stack of bubbles.
//!
//! ```text
//! source --lexer--> tokens --labels--> dispatch loop --> Bubble
//! ```

pub mod bytecode;
pub mod frontend;
pub mod lang;
pub mod runtime;

pub use bytecode::{Opcode, Token};
pub use lang::Bubble;
pub use runtime::{ErrorKind, Interpreter, RuntimeError};
