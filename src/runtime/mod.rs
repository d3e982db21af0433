pub mod arith;
pub mod io;
pub mod runtime_error;
pub mod stack;
pub mod vm;

pub use runtime_error::{ErrorKind, RuntimeError};
pub use vm::{Interpreter, OPERATION_LIMIT};
