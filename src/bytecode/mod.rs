pub mod asm;
pub mod disasm;
pub mod op;

pub use op::{Opcode, Token};
