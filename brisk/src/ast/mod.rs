//! Abstract Syntax Tree definitions
//!
//! The evaluator never parses surface syntax. A front-end hands over a
//! [`Program`] directly, or as JSON through [`Program::from_json`].

pub mod build;
mod expr;
mod stmt;

pub use expr::*;
pub use stmt::*;

use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// A program is a list of top-level function definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    pub functions: Vec<Rc<FnDef>>,
}

impl Program {
    pub fn new(functions: Vec<Rc<FnDef>>) -> Self {
        Program { functions }
    }

    /// Decode a program from its JSON encoding
    pub fn from_json(source: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Encode the program as pretty-printed JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Function definition, shared by top-level functions and lambdas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FnDef {
    pub name: String,
    #[serde(rename = "args")]
    pub params: Vec<Param>,
    pub statements: Vec<Stmt>,
}

impl FnDef {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(default)]
    pub mode: ParamMode,
}

/// How an argument is bound to its formal parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamMode {
    /// Bound to an independent deep copy of the argument
    #[default]
    Value,
    /// Bound to the caller's storage; callee writes are visible after return
    Ref,
}

#[cfg(test)]
mod tests {
    use super::build::*;
    use super::*;

    #[test]
    fn test_arity() {
        let f = func("add", vec![val("a"), by_ref("b")], vec![]);
        assert_eq!(f.arity(), 2);
        assert_eq!(f.params[1].mode, ParamMode::Ref);
    }

    #[test]
    fn test_json_round_trip_keeps_shape() {
        let program = program(vec![func(
            "main",
            vec![],
            vec![assign("x", int(1)), expr_stmt(call("print", vec![var("x")]))],
        )]);
        let json = program.to_json().unwrap();
        let decoded = Program::from_json(&json).unwrap();
        assert_eq!(decoded.functions.len(), 1);
        assert_eq!(decoded.functions[0].name, "main");
        assert_eq!(decoded.functions[0].statements.len(), 2);
    }

    #[test]
    fn test_param_mode_defaults_to_value() {
        let param: Param = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert_eq!(param.mode, ParamMode::Value);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Program::from_json("{ not json").is_err());
    }
}
