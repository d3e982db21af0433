//! # awa values
//!
//! The value model shared by the runtime and the tooling.
//!
//! ## Documentation conventions
//!
//! - Stack effects are written as `( before -- after )`.
//! - `[ ... ]` denotes a double bubble.

pub mod alphabet;
pub mod value;

pub use value::Bubble;
