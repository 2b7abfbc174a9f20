//! Runtime values for the interpreter

use super::env::Capture;
use super::object::ObjectId;
use crate::ast::FnDef;
use std::fmt;
use std::rc::Rc;

/// Runtime value
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Int(i64),
    Bool(bool),
    Str(Rc<str>),
    Closure(Rc<Closure>),
    /// Handle into the interpreter's object store
    Object(ObjectId),
}

impl Value {
    pub fn str(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Closure(_) => "closure",
            Value::Object(_) => "object",
        }
    }

    /// Nil, Int, Bool and Str are snapshotted when a closure captures them
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Value::Nil | Value::Int(_) | Value::Bool(_) | Value::Str(_)
        )
    }

    /// Text written by `print`; closures and objects have none
    pub fn printable(&self) -> Option<String> {
        match self {
            Value::Nil => Some("nil".to_string()),
            Value::Int(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Str(s) => Some(s.to_string()),
            Value::Closure(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Closure(c) => write!(f, "<closure {}/{}>", c.name(), c.arity()),
            Value::Object(id) => write!(f, "<object {id}>"),
        }
    }
}

/// Total equality: values of different types are never equal.
/// Closures compare by identity, objects by handle.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

/// A function body paired with the environment it was created in
pub struct Closure {
    pub func: Rc<FnDef>,
    pub capture: Capture,
}

impl Closure {
    pub fn new(func: Rc<FnDef>, capture: Capture) -> Self {
        Closure { func, capture }
    }

    /// Closure over nothing, used for top-level functions
    pub fn bare(func: Rc<FnDef>) -> Self {
        Closure::new(func, Capture::default())
    }

    pub fn name(&self) -> &str {
        &self.func.name
    }

    pub fn arity(&self) -> usize {
        self.func.arity()
    }

    /// Copy of this closure with its own snapshot cells
    pub fn fork(&self) -> Self {
        Closure::new(Rc::clone(&self.func), self.capture.fork())
    }
}

// The capture can reach this closure again, so it is left out.
impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("name", &self.func.name)
            .field("arity", &self.arity())
            .finish_non_exhaustive()
    }
}
