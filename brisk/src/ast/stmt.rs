//! Statement AST nodes

use super::Expr;
use serde::{Deserialize, Serialize};

/// Statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stmt {
    /// `name = expression`, where `name` may be a dotted path
    Assign { name: String, expression: Expr },

    /// Expression evaluated for its side effects (usually a call)
    Expr { expression: Expr },

    /// `return [expression]`
    Return {
        #[serde(default)]
        expression: Option<Expr>,
    },

    /// `if (condition) { statements } [else { else_statements }]`
    If {
        condition: Expr,
        statements: Vec<Stmt>,
        #[serde(default)]
        else_statements: Option<Vec<Stmt>>,
    },

    /// `while (condition) { statements }`
    While {
        condition: Expr,
        statements: Vec<Stmt>,
    },
}

impl Stmt {
    /// Short name of the statement kind, for trace output
    pub fn kind(&self) -> &'static str {
        match self {
            Stmt::Assign { .. } => "assign",
            Stmt::Expr { .. } => "expr",
            Stmt::Return { .. } => "return",
            Stmt::If { .. } => "if",
            Stmt::While { .. } => "while",
        }
    }
}
