//! Runtime errors for the interpreter
//!
//! Every error is fatal: the first one aborts the whole run.

use std::fmt;
use thiserror::Error;

/// Runtime error during interpretation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unresolved variable, function, method, arity or object
    NameError,
    /// Operand type mismatch, non-callable call, bad `proto`, wrong arity
    TypeError,
    /// Integer division by zero
    DivisionByZero,
    /// Call depth exceeded the configured limit
    StackOverflow,
    /// Console input exhausted
    IoError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NameError => "NameError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::DivisionByZero => "DivisionByZero",
            ErrorKind::StackOverflow => "StackOverflow",
            ErrorKind::IoError => "IoError",
        };
        f.write_str(name)
    }
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        RuntimeError {
            kind,
            message: message.into(),
        }
    }

    pub fn name_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NameError, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    pub fn undefined_variable(name: &str) -> Self {
        Self::name_error(format!("variable/function {name} not found"))
    }

    pub fn undefined_function(name: &str) -> Self {
        Self::name_error(format!("function {name} not found"))
    }

    /// Function exists, but not with this many parameters
    pub fn no_overload(name: &str, arity: usize) -> Self {
        Self::name_error(format!("function {name} taking {arity} params not found"))
    }

    pub fn ambiguous_overload(name: &str) -> Self {
        Self::type_error(format!("function {name} has multiple overloaded versions"))
    }

    pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> Self {
        Self::type_error(format!(
            "{name} expects {expected} argument(s), got {got}"
        ))
    }

    pub fn not_callable(name: &str, type_name: &str) -> Self {
        Self::type_error(format!("{name} holds a {type_name}, which cannot be called"))
    }

    pub fn object_not_found(name: &str) -> Self {
        Self::name_error(format!("object {name} not found"))
    }

    pub fn not_an_object(name: &str, type_name: &str) -> Self {
        Self::type_error(format!("dot operator used on non-object {name} ({type_name})"))
    }

    pub fn property_not_found(field: &str) -> Self {
        Self::name_error(format!("object property {field} not found"))
    }

    pub fn method_not_found(name: &str) -> Self {
        Self::name_error(format!("object method {name} not found"))
    }

    pub fn method_overload_not_found(name: &str, arity: usize) -> Self {
        Self::name_error(format!("object method {name} taking {arity} params not found"))
    }

    pub fn property_not_callable(name: &str) -> Self {
        Self::type_error(format!("object property {name} cannot be called"))
    }

    pub fn invalid_proto(type_name: &str) -> Self {
        Self::type_error(format!(
            "{type_name} is not an object, cannot be assigned to proto field"
        ))
    }

    pub fn cyclic_prototype(object: impl fmt::Display) -> Self {
        Self::type_error(format!("cyclic prototype chain through object {object}"))
    }

    pub fn incompatible_types(op: impl fmt::Display, left: &str, right: &str) -> Self {
        Self::type_error(format!(
            "incompatible types for {op} operation: {left} and {right}"
        ))
    }

    pub fn unsupported_operator(op: impl fmt::Display, type_name: &str) -> Self {
        Self::type_error(format!("incompatible operator {op} for type {type_name}"))
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero, "division by zero")
    }

    pub fn stack_overflow(limit: usize) -> Self {
        Self::new(
            ErrorKind::StackOverflow,
            format!("stack overflow: call depth exceeded {limit}"),
        )
    }

    pub fn io_error(message: &str) -> Self {
        Self::new(ErrorKind::IoError, format!("IO error: {message}"))
    }
}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
