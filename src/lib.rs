//! rlsp: a small Lisp. Source text is split into top-level forms, each form
//! is read into a `Value` tree and evaluated against one shared, flat
//! environment.

#[macro_use]
extern crate lazy_static;

pub mod cmdline;
pub mod console;
pub mod core;
pub mod environment;
pub mod evaluator;
pub mod forms;
pub mod interpreter;
pub mod printer;
pub mod reader;
pub mod special_forms;
mod stack;
mod tokens;
pub mod types;

pub use interpreter::Interpreter;
pub use types::Value;

pub const VERSION: &str = "1.4.2";
