//! Tree-walking interpreter
//!
//! Executes a [`Program`](crate::ast::Program) directly from its AST.

mod console;
mod env;
mod error;
mod eval;
mod object;
mod operators;
mod value;

pub use console::{BufferConsole, Console, StdConsole};
pub use env::{Capture, Cell, Environment, ScopeRef};
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::{Flow, Interpreter, THIS};
pub use object::{Object, ObjectId, ObjectStore};
pub use operators::{eval_binary, eval_unary, floor_div};
pub use value::{Closure, Value};
