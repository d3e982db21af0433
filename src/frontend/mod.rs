pub mod lexer;
pub mod token_dumper;

pub use lexer::{LexError, tokenize};
