//! Shorthand constructors for assembling ASTs by hand
//!
//! Used by embedders without a front-end and throughout the test suites.

use super::{BinOp, Expr, FnDef, Param, ParamMode, Program, Stmt, UnOp};
use std::rc::Rc;

pub fn program(functions: Vec<Rc<FnDef>>) -> Program {
    Program::new(functions)
}

pub fn func(name: &str, params: Vec<Param>, statements: Vec<Stmt>) -> Rc<FnDef> {
    Rc::new(FnDef {
        name: name.to_string(),
        params,
        statements,
    })
}

/// By-value parameter
pub fn val(name: &str) -> Param {
    Param {
        name: name.to_string(),
        mode: ParamMode::Value,
    }
}

/// By-reference parameter
pub fn by_ref(name: &str) -> Param {
    Param {
        name: name.to_string(),
        mode: ParamMode::Ref,
    }
}

pub fn nil() -> Expr {
    Expr::Nil
}

pub fn int(n: i64) -> Expr {
    Expr::Int { val: n }
}

pub fn boolean(b: bool) -> Expr {
    Expr::Bool { val: b }
}

pub fn string(s: &str) -> Expr {
    Expr::Str { val: s.to_string() }
}

pub fn var(name: &str) -> Expr {
    Expr::Var {
        name: name.to_string(),
    }
}

pub fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Call {
        name: name.to_string(),
        args,
    }
}

pub fn mcall(objref: &str, name: &str, args: Vec<Expr>) -> Expr {
    Expr::MethodCall {
        objref: objref.to_string(),
        name: name.to_string(),
        args,
    }
}

pub fn bin(op: BinOp, op1: Expr, op2: Expr) -> Expr {
    Expr::Binary {
        op,
        op1: Box::new(op1),
        op2: Box::new(op2),
    }
}

pub fn neg(op1: Expr) -> Expr {
    Expr::Unary {
        op: UnOp::Neg,
        op1: Box::new(op1),
    }
}

pub fn not(op1: Expr) -> Expr {
    Expr::Unary {
        op: UnOp::Not,
        op1: Box::new(op1),
    }
}

pub fn lambda(params: Vec<Param>, statements: Vec<Stmt>) -> Expr {
    Expr::Lambda(func("lambda", params, statements))
}

pub fn new_object() -> Expr {
    Expr::NewObject
}

pub fn assign(name: &str, expression: Expr) -> Stmt {
    Stmt::Assign {
        name: name.to_string(),
        expression,
    }
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr { expression: expr }
}

/// `print(args)` as a statement
pub fn print(args: Vec<Expr>) -> Stmt {
    expr_stmt(call("print", args))
}

pub fn ret(expr: Expr) -> Stmt {
    Stmt::Return {
        expression: Some(expr),
    }
}

pub fn ret_nil() -> Stmt {
    Stmt::Return { expression: None }
}

pub fn if_(condition: Expr, statements: Vec<Stmt>) -> Stmt {
    Stmt::If {
        condition,
        statements,
        else_statements: None,
    }
}

pub fn if_else(condition: Expr, statements: Vec<Stmt>, else_statements: Vec<Stmt>) -> Stmt {
    Stmt::If {
        condition,
        statements,
        else_statements: Some(else_statements),
    }
}

pub fn while_(condition: Expr, statements: Vec<Stmt>) -> Stmt {
    Stmt::While {
        condition,
        statements,
    }
}
