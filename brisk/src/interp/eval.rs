//! Statement and expression evaluator

use super::console::{Console, StdConsole};
use super::env::{Cell, Environment};
use super::error::{InterpResult, RuntimeError};
use super::object::{ObjectId, ObjectStore};
use super::operators::{eval_binary, eval_unary};
use super::value::{Closure, Value};
use crate::ast::{Expr, ParamMode, Program, Stmt};
use crate::config::InterpConfig;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use tracing::{debug, trace};

/// Stack growth parameters for deep recursion
const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// Name bound to the receiver inside a method body
pub const THIS: &str = "this";

/// Outcome of executing a statement
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Continue,
    /// Unwind to the nearest call boundary with this value
    Return(Value),
}

/// The interpreter
pub struct Interpreter<C: Console = StdConsole> {
    /// Top-level functions by name, then arity
    functions: HashMap<String, BTreeMap<usize, Rc<Closure>>>,
    objects: ObjectStore,
    /// Environment of the call currently executing
    env: Environment,
    console: C,
    config: InterpConfig,
    call_depth: usize,
}

impl Interpreter<StdConsole> {
    /// Interpreter wired to stdout and stdin
    pub fn with_stdio(config: InterpConfig) -> Self {
        Interpreter::new(config, StdConsole)
    }
}

impl<C: Console> Interpreter<C> {
    pub fn new(config: InterpConfig, console: C) -> Self {
        Interpreter {
            functions: HashMap::new(),
            objects: ObjectStore::new(),
            env: Environment::new(),
            console,
            config,
            call_depth: 0,
        }
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    pub fn config(&self) -> &InterpConfig {
        &self.config
    }

    /// Build the function table. A later definition with the same name and
    /// arity replaces an earlier one.
    pub fn load(&mut self, program: &Program) {
        self.functions.clear();
        for func in &program.functions {
            self.functions
                .entry(func.name.clone())
                .or_default()
                .insert(func.arity(), Rc::new(Closure::bare(Rc::clone(func))));
        }
        debug!(functions = self.functions.len(), "function table built");
    }

    /// Run a program: load its functions, then execute `main`
    #[tracing::instrument(level = "debug", skip_all, fields(functions = program.functions.len()))]
    pub fn run(&mut self, program: &Program) -> InterpResult<()> {
        self.load(program);
        let main = self
            .functions
            .get("main")
            .and_then(|overloads| overloads.get(&0))
            .cloned()
            .ok_or_else(|| RuntimeError::undefined_function("main"))?;

        self.env = Environment::new();
        self.call_depth = 0;
        self.run_statements(&main.func.statements)?;
        Ok(())
    }

    /// Evaluate a single expression in the current environment
    pub fn eval_expr(&mut self, expr: &Expr) -> InterpResult<Value> {
        self.eval(expr)
    }

    /// Execute a statement list in a fresh scope
    fn run_statements(&mut self, statements: &[Stmt]) -> InterpResult<Flow> {
        self.env.push(None);
        let result = self.exec_all(statements);
        self.env.pop();
        result
    }

    fn exec_all(&mut self, statements: &[Stmt]) -> InterpResult<Flow> {
        for statement in statements {
            if let Flow::Return(value) = self.exec(statement)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Continue)
    }

    fn exec(&mut self, statement: &Stmt) -> InterpResult<Flow> {
        if self.config.trace {
            debug!(statement = statement.kind(), depth = self.call_depth, "exec");
        } else {
            trace!(statement = statement.kind(), "exec");
        }

        match statement {
            Stmt::Assign { name, expression } => {
                self.assign(name, expression)?;
                Ok(Flow::Continue)
            }
            Stmt::Expr { expression } => {
                self.eval(expression)?;
                Ok(Flow::Continue)
            }
            Stmt::Return { expression } => {
                let value = match expression {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return(self.objects.deep_copy(&value)))
            }
            Stmt::If {
                condition,
                statements,
                else_statements,
            } => {
                if self.condition(condition, "if")? {
                    self.run_statements(statements)
                } else if let Some(else_statements) = else_statements {
                    self.run_statements(else_statements)
                } else {
                    Ok(Flow::Continue)
                }
            }
            Stmt::While {
                condition,
                statements,
            } => {
                while self.condition(condition, "while")? {
                    if let Flow::Return(value) = self.run_statements(statements)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Continue)
            }
        }
    }

    /// Evaluate an `if`/`while` condition; Int coerces by non-zero test
    fn condition(&mut self, expr: &Expr, construct: &str) -> InterpResult<bool> {
        match self.eval(expr)? {
            Value::Bool(b) => Ok(b),
            Value::Int(n) => Ok(n != 0),
            other => Err(RuntimeError::type_error(format!(
                "incompatible type for {construct} condition: {}",
                other.type_name()
            ))),
        }
    }

    fn assign(&mut self, target: &str, expression: &Expr) -> InterpResult<()> {
        match target.rsplit_once('.') {
            None => {
                let value = self.eval(expression)?;
                self.env.set(target, value);
            }
            Some((base, field)) => {
                let id = self.resolve_object(base)?;
                let value = self.eval(expression)?;
                if field == "proto" {
                    self.objects.set_proto(id, &value)?;
                } else {
                    self.objects.set_field(id, field, value);
                }
            }
        }
        Ok(())
    }

    /// Evaluate an expression with automatic stack growth for deep recursion
    fn eval(&mut self, expr: &Expr) -> InterpResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(expr))
    }

    fn eval_inner(&mut self, expr: &Expr) -> InterpResult<Value> {
        match expr {
            Expr::Nil => Ok(Value::Nil),
            Expr::Int { val } => Ok(Value::Int(*val)),
            Expr::Bool { val } => Ok(Value::Bool(*val)),
            Expr::Str { val } => Ok(Value::str(val)),

            Expr::Var { name } if name.contains('.') => self.read_path(name),
            Expr::Var { name } => self.eval_name(name),

            Expr::Call { name, args } => self.call_named(name, args),
            Expr::MethodCall { objref, name, args } => self.call_method(objref, name, args),

            Expr::Binary { op, op1, op2 } => {
                let left = self.eval(op1)?;
                let right = self.eval(op2)?;
                eval_binary(*op, left, right)
            }
            Expr::Unary { op, op1 } => {
                let value = self.eval(op1)?;
                eval_unary(*op, value)
            }

            Expr::Lambda(func) => {
                let closure = Closure::new(Rc::clone(func), self.env.capture());
                Ok(Value::Closure(Rc::new(closure)))
            }
            Expr::NewObject => Ok(Value::Object(self.objects.alloc())),
        }
    }

    /// Variable first, then a top-level function as a first-class value
    fn eval_name(&self, name: &str) -> InterpResult<Value> {
        if let Some(value) = self.env.get(name) {
            return Ok(value);
        }
        match self.functions.get(name) {
            Some(overloads) if overloads.len() > 1 => Err(RuntimeError::ambiguous_overload(name)),
            Some(overloads) => overloads
                .values()
                .next()
                .map(|closure| Value::Closure(Rc::clone(closure)))
                .ok_or_else(|| RuntimeError::undefined_variable(name)),
            None => Err(RuntimeError::undefined_variable(name)),
        }
    }

    /// Read a dotted path such as `o.f` or `this.a.b`
    fn read_path(&self, path: &str) -> InterpResult<Value> {
        match path.rsplit_once('.') {
            Some((base, field)) => {
                let id = self.resolve_object(base)?;
                self.objects.get_property(id, field)
            }
            None => self.eval_name(path),
        }
    }

    /// Resolve the object a dotted path or method call is rooted at
    fn resolve_object(&self, path: &str) -> InterpResult<ObjectId> {
        let value = if path.contains('.') {
            self.read_path(path)?
        } else {
            self.env
                .get(path)
                .ok_or_else(|| RuntimeError::object_not_found(path))?
        };
        match value {
            Value::Object(id) => Ok(id),
            other => Err(RuntimeError::not_an_object(path, other.type_name())),
        }
    }

    /// Resolve a call by name: the function table first, then a variable
    /// holding a closure.
    fn resolve_function(&self, name: &str, arity: usize) -> InterpResult<Rc<Closure>> {
        if let Some(overloads) = self.functions.get(name) {
            return overloads
                .get(&arity)
                .cloned()
                .ok_or_else(|| RuntimeError::no_overload(name, arity));
        }
        match self.env.get(name) {
            Some(Value::Closure(closure)) => {
                if closure.arity() != arity {
                    return Err(RuntimeError::arity_mismatch(name, closure.arity(), arity));
                }
                Ok(closure)
            }
            Some(other) => Err(RuntimeError::not_callable(name, other.type_name())),
            None => Err(RuntimeError::undefined_function(name)),
        }
    }

    fn call_named(&mut self, name: &str, args: &[Expr]) -> InterpResult<Value> {
        match name {
            "print" => return self.call_print(args),
            "inputi" | "inputs" => return self.call_input(name, args),
            _ => {}
        }
        let closure = self.resolve_function(name, args.len())?;
        self.invoke(&closure, args, None)
    }

    fn call_method(&mut self, objref: &str, name: &str, args: &[Expr]) -> InterpResult<Value> {
        let receiver = self.resolve_object(objref)?;
        let method = self.objects.find_method(receiver, name, args.len())?;
        self.invoke(&method, args, Some(receiver))
    }

    /// The caller's cell behind a bare-variable argument
    fn caller_cell(&self, arg: &Expr) -> Option<Cell> {
        match arg {
            Expr::Var { name } if !name.contains('.') => self.env.cell(name),
            _ => None,
        }
    }

    /// Call a closure: bind arguments in a fresh frame, run the body there.
    /// `receiver` is bound to `this` for method calls.
    fn invoke(
        &mut self,
        closure: &Rc<Closure>,
        args: &[Expr],
        receiver: Option<ObjectId>,
    ) -> InterpResult<Value> {
        let func = &closure.func;
        if func.arity() != args.len() {
            return Err(RuntimeError::arity_mismatch(
                closure.name(),
                func.arity(),
                args.len(),
            ));
        }
        if self.call_depth >= self.config.max_call_depth {
            return Err(RuntimeError::stack_overflow(self.config.max_call_depth));
        }

        // Arguments are evaluated in the caller's environment
        let mut frame = Environment::from_capture(&closure.capture);
        for (param, arg) in func.params.iter().zip(args) {
            match param.mode {
                ParamMode::Ref => match self.caller_cell(arg) {
                    Some(cell) => frame.bind_cell(&param.name, cell),
                    None => {
                        let value = self.eval(arg)?;
                        frame.define(&param.name, value);
                    }
                },
                ParamMode::Value => {
                    let value = self.eval(arg)?;
                    let copy = self.objects.deep_copy(&value);
                    frame.define(&param.name, copy);
                }
            }
        }
        if let Some(receiver) = receiver {
            frame.define(THIS, Value::Object(receiver));
        }

        debug!(function = closure.name(), depth = self.call_depth, "call");
        self.call_depth += 1;
        let caller = std::mem::replace(&mut self.env, frame);
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.run_statements(&func.statements)
        });
        self.env = caller;
        self.call_depth -= 1;

        match result? {
            Flow::Return(value) => Ok(value),
            Flow::Continue => Ok(Value::Nil),
        }
    }

    fn call_print(&mut self, args: &[Expr]) -> InterpResult<Value> {
        let mut line = String::new();
        for arg in args {
            let value = self.eval(arg)?;
            line.push_str(&printable(&value)?);
        }
        self.console.output(&line);
        Ok(Value::Nil)
    }

    /// `inputi([prompt])` reads an Int, `inputs([prompt])` a string
    fn call_input(&mut self, name: &str, args: &[Expr]) -> InterpResult<Value> {
        match args {
            [] => {}
            [prompt] => {
                let prompt = self.eval(prompt)?;
                let text = printable(&prompt)?;
                self.console.output(&text);
            }
            _ => {
                return Err(RuntimeError::name_error(format!(
                    "no {name}() function that takes > 1 parameter"
                )));
            }
        }

        let line = self
            .console
            .get_input()
            .ok_or_else(|| RuntimeError::io_error("end of input"))?;
        if name == "inputi" {
            line.trim().parse().map(Value::Int).map_err(|_| {
                RuntimeError::type_error(format!("inputi expected an integer, got {line:?}"))
            })
        } else {
            Ok(Value::str(&line))
        }
    }
}

fn printable(value: &Value) -> InterpResult<String> {
    value
        .printable()
        .ok_or_else(|| RuntimeError::type_error(format!("cannot print a {}", value.type_name())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinOp;
    use crate::ast::build::*;
    use crate::interp::{BufferConsole, ErrorKind};

    fn interp() -> Interpreter<BufferConsole> {
        Interpreter::new(InterpConfig::default(), BufferConsole::new())
    }

    fn run(functions: Vec<Rc<crate::ast::FnDef>>) -> (InterpResult<()>, Vec<String>) {
        let mut interp = interp();
        let result = interp.run(&program(functions));
        (result, interp.into_console().into_lines())
    }

    #[test]
    fn test_eval_literals() {
        let mut interp = interp();
        assert_eq!(interp.eval_expr(&int(42)).unwrap(), Value::Int(42));
        assert_eq!(interp.eval_expr(&boolean(true)).unwrap(), Value::Bool(true));
        assert_eq!(interp.eval_expr(&string("s")).unwrap(), Value::str("s"));
        assert_eq!(interp.eval_expr(&nil()).unwrap(), Value::Nil);
    }

    #[test]
    fn test_eval_binary() {
        let mut interp = interp();
        let expr = bin(BinOp::Add, int(2), bin(BinOp::Mul, int(3), int(4)));
        assert_eq!(interp.eval_expr(&expr).unwrap(), Value::Int(14));
    }

    #[test]
    fn test_eval_unbound_name() {
        let mut interp = interp();
        let err = interp.eval_expr(&var("ghost")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NameError);
    }

    #[test]
    fn test_missing_main() {
        let (result, _) = run(vec![func("helper", vec![], vec![])]);
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NameError);
        assert!(err.message.contains("main"));
    }

    #[test]
    fn test_main_with_params_is_not_entry() {
        let (result, _) = run(vec![func("main", vec![val("argv")], vec![])]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::NameError);
    }

    #[test]
    fn test_print_concatenates_args() {
        let (result, out) = run(vec![func(
            "main",
            vec![],
            vec![print(vec![string("x = "), int(3), string(", "), boolean(false), nil()])],
        )]);
        result.unwrap();
        assert_eq!(out, ["x = 3, falsenil"]);
    }

    #[test]
    fn test_print_object_is_type_error() {
        let (result, out) = run(vec![func("main", vec![], vec![print(vec![new_object()])])]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::TypeError);
        assert!(out.is_empty());
    }

    #[test]
    fn test_inputi_and_inputs() {
        let mut interp = Interpreter::new(
            InterpConfig::default(),
            BufferConsole::with_input([" 41 ", "abc"]),
        );
        let program = program(vec![func(
            "main",
            vec![],
            vec![
                assign("n", call("inputi", vec![string("number?")])),
                assign("s", call("inputs", vec![])),
                print(vec![bin(BinOp::Add, var("n"), int(1)), var("s")]),
            ],
        )]);
        interp.run(&program).unwrap();
        assert_eq!(interp.console().lines(), ["number?", "42abc"]);
    }

    #[test]
    fn test_inputi_rejects_non_numbers() {
        let mut interp =
            Interpreter::new(InterpConfig::default(), BufferConsole::with_input(["x"]));
        let program = program(vec![func("main", vec![], vec![expr_stmt(call("inputi", vec![]))])]);
        assert_eq!(interp.run(&program).unwrap_err().kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_input_with_two_args_is_name_error() {
        let (result, _) = run(vec![func(
            "main",
            vec![],
            vec![expr_stmt(call("inputi", vec![int(1), int(2)]))],
        )]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::NameError);
    }

    #[test]
    fn test_input_exhausted() {
        let (result, _) = run(vec![func("main", vec![], vec![expr_stmt(call("inputs", vec![]))])]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::IoError);
    }

    #[test]
    fn test_condition_type_error() {
        let (result, _) = run(vec![func(
            "main",
            vec![],
            vec![if_(string("yes"), vec![print(vec![int(1)])])],
        )]);
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
        assert!(err.message.contains("if"));
    }

    #[test]
    fn test_int_condition_coerces() {
        let (result, out) = run(vec![func(
            "main",
            vec![],
            vec![
                if_else(
                    int(0),
                    vec![print(vec![string("zero")])],
                    vec![print(vec![string("else")])],
                ),
                if_(int(-2), vec![print(vec![string("nonzero")])]),
            ],
        )]);
        result.unwrap();
        assert_eq!(out, ["else", "nonzero"]);
    }

    #[test]
    fn test_block_scope_is_popped() {
        let (result, _) = run(vec![func(
            "main",
            vec![],
            vec![
                if_(boolean(true), vec![assign("inner", int(1))]),
                print(vec![var("inner")]),
            ],
        )]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::NameError);
    }

    #[test]
    fn test_stack_overflow_is_reported() {
        let mut interp =
            Interpreter::new(InterpConfig::new().max_call_depth(32), BufferConsole::new());
        let program = program(vec![
            func("down", vec![val("n")], vec![ret(call("down", vec![var("n")]))]),
            func("main", vec![], vec![expr_stmt(call("down", vec![int(0)]))]),
        ]);
        assert_eq!(interp.run(&program).unwrap_err().kind, ErrorKind::StackOverflow);
    }

    #[test]
    fn test_later_definition_replaces_same_arity() {
        let (result, out) = run(vec![
            func("f", vec![], vec![ret(int(1))]),
            func("f", vec![], vec![ret(int(2))]),
            func("main", vec![], vec![print(vec![call("f", vec![])])]),
        ]);
        result.unwrap();
        assert_eq!(out, ["2"]);
    }

    #[test]
    fn test_trace_config_runs_normally() {
        let mut interp = Interpreter::new(InterpConfig::new().trace(true), BufferConsole::new());
        let program = program(vec![func("main", vec![], vec![print(vec![int(7)])])]);
        interp.run(&program).unwrap();
        assert_eq!(interp.console().lines(), ["7"]);
        assert!(interp.config().trace);
    }
}
