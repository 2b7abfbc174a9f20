//! Binary and unary operator semantics
//!
//! Operands are promoted before dispatch:
//! 1. `&&`, `||`, `==`, `!=` turn Int operands into Bool (non-zero is true),
//!    except `==`/`!=` between two Ints.
//! 2. Arithmetic and comparison operators (`==`/`!=` included) turn Bool
//!    operands into Int (true is 1).
//!
//! After promotion the operand types must match, except for `==`/`!=`,
//! which are total: values of different types are simply unequal.

use super::error::{InterpResult, RuntimeError};
use super::value::Value;
use crate::ast::{BinOp, UnOp};

fn int_to_bool(value: Value) -> Value {
    match value {
        Value::Int(n) => Value::Bool(n != 0),
        other => other,
    }
}

fn bool_to_int(value: Value) -> Value {
    match value {
        Value::Bool(b) => Value::Int(i64::from(b)),
        other => other,
    }
}

fn promote(op: BinOp, left: Value, right: Value) -> (Value, Value) {
    let (mut left, mut right) = (left, right);
    if op.is_logical() || op.is_equality() {
        let both_int = matches!((&left, &right), (Value::Int(_), Value::Int(_)));
        if !(op.is_equality() && both_int) {
            left = int_to_bool(left);
            right = int_to_bool(right);
        }
    }
    if op.is_numeric() {
        left = bool_to_int(left);
        right = bool_to_int(right);
    }
    (left, right)
}

/// Integer division rounding toward negative infinity
pub fn floor_div(a: i64, b: i64) -> i64 {
    let q = a.wrapping_div(b);
    if a.wrapping_rem(b) != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

/// Evaluate binary operation
pub fn eval_binary(op: BinOp, left: Value, right: Value) -> InterpResult<Value> {
    let (left, right) = promote(op, left, right);

    if !op.is_equality() && std::mem::discriminant(&left) != std::mem::discriminant(&right) {
        return Err(RuntimeError::incompatible_types(
            op,
            left.type_name(),
            right.type_name(),
        ));
    }

    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => eval_int(op, *a, *b),
        (Value::Str(a), Value::Str(b)) if op == BinOp::Add => {
            Ok(Value::Str(format!("{a}{b}").into()))
        }
        (Value::Bool(a), Value::Bool(b)) if op.is_logical() => Ok(Value::Bool(match op {
            BinOp::And => *a && *b,
            _ => *a || *b,
        })),
        _ => match op {
            BinOp::Eq => Ok(Value::Bool(left == right)),
            BinOp::Ne => Ok(Value::Bool(left != right)),
            _ => Err(RuntimeError::unsupported_operator(op, left.type_name())),
        },
    }
}

fn eval_int(op: BinOp, a: i64, b: i64) -> InterpResult<Value> {
    let value = match op {
        BinOp::Add => Value::Int(a.wrapping_add(b)),
        BinOp::Sub => Value::Int(a.wrapping_sub(b)),
        BinOp::Mul => Value::Int(a.wrapping_mul(b)),
        BinOp::Div => {
            if b == 0 {
                return Err(RuntimeError::division_by_zero());
            }
            Value::Int(floor_div(a, b))
        }
        BinOp::Eq => Value::Bool(a == b),
        BinOp::Ne => Value::Bool(a != b),
        BinOp::Lt => Value::Bool(a < b),
        BinOp::Gt => Value::Bool(a > b),
        BinOp::Le => Value::Bool(a <= b),
        BinOp::Ge => Value::Bool(a >= b),
        BinOp::And | BinOp::Or => return Err(RuntimeError::unsupported_operator(op, "int")),
    };
    Ok(value)
}

/// Evaluate unary operation
pub fn eval_unary(op: UnOp, val: Value) -> InterpResult<Value> {
    match op {
        UnOp::Neg => match bool_to_int(val) {
            Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
            other => Err(RuntimeError::unsupported_operator(op, other.type_name())),
        },
        UnOp::Not => match int_to_bool(val) {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            other => Err(RuntimeError::unsupported_operator(op, other.type_name())),
        },
    }
}
