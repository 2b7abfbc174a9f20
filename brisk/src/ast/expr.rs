//! Expression AST nodes

use super::FnDef;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Expression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expr {
    /// `nil`
    Nil,
    /// Integer literal
    Int { val: i64 },
    /// Boolean literal
    Bool { val: bool },
    /// String literal
    Str { val: String },

    /// Variable reference or dotted property path (`x`, `o.f`, `this.a.b`)
    Var { name: String },

    /// Call by name: `f(args)`
    Call { name: String, args: Vec<Expr> },

    /// Method call: `objref.name(args)`
    MethodCall {
        objref: String,
        name: String,
        args: Vec<Expr>,
    },

    /// Binary operation
    Binary {
        op: BinOp,
        op1: Box<Expr>,
        op2: Box<Expr>,
    },

    /// Unary operation
    Unary { op: UnOp, op1: Box<Expr> },

    /// Anonymous function, captures the environment where it is evaluated
    Lambda(Rc<FnDef>),

    /// Fresh empty object (`@`)
    NewObject,
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,

    // Logical
    And,
    Or,
}

impl BinOp {
    /// `==` and `!=`, defined for every pair of operand types
    pub fn is_equality(self) -> bool {
        matches!(self, BinOp::Eq | BinOp::Ne)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }

    /// Operators that accept Int operands (arithmetic and every comparison)
    pub fn is_numeric(self) -> bool {
        !self.is_logical()
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinOp::Add => write!(f, "+"),
            BinOp::Sub => write!(f, "-"),
            BinOp::Mul => write!(f, "*"),
            BinOp::Div => write!(f, "/"),
            BinOp::Eq => write!(f, "=="),
            BinOp::Ne => write!(f, "!="),
            BinOp::Lt => write!(f, "<"),
            BinOp::Gt => write!(f, ">"),
            BinOp::Le => write!(f, "<="),
            BinOp::Ge => write!(f, ">="),
            BinOp::And => write!(f, "&&"),
            BinOp::Or => write!(f, "||"),
        }
    }
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnOp {
    /// Negation (-)
    Neg,
    /// Logical not (!)
    Not,
}

impl std::fmt::Display for UnOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnOp::Neg => write!(f, "-"),
            UnOp::Not => write!(f, "!"),
        }
    }
}
