//! Brisk interpreter library
//!
//! Tree-walking evaluator for a small dynamically typed language with
//! closures, prototype objects and per-parameter reference passing.
//! Programs arrive as an already-parsed AST (see [`ast`]).

pub mod ast;
pub mod config;
pub mod error;
pub mod interp;

pub use ast::Program;
pub use config::InterpConfig;
pub use error::{Error, Result};
pub use interp::{BufferConsole, Interpreter, InterpResult, RuntimeError, Value};

/// Run a program against the given input lines and collect its output
pub fn run_program<I, S>(program: &Program, inputs: I) -> InterpResult<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut interp = Interpreter::new(InterpConfig::default(), BufferConsole::with_input(inputs));
    interp.run(program)?;
    Ok(interp.into_console().into_lines())
}
