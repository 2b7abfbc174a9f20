//! Environment for variable bindings
//!
//! A stack of lexical scopes. Each scope maps names to shared mutable cells,
//! so a by-reference parameter or a closure can hold on to the same storage
//! as the scope that created it.

use super::Value;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Mutable storage behind one binding
pub type Cell = Rc<RefCell<Value>>;

/// Shared reference to a single scope
pub type ScopeRef = Rc<RefCell<HashMap<String, Cell>>>;

fn new_cell(value: Value) -> Cell {
    Rc::new(RefCell::new(value))
}

fn new_scope(bindings: HashMap<String, Cell>) -> ScopeRef {
    Rc::new(RefCell::new(bindings))
}

/// What a closure keeps from the environment it was created in
#[derive(Debug, Clone, Default)]
pub struct Capture {
    /// Copies of every primitive binding visible at creation time
    snapshot: HashMap<String, Cell>,
    /// The scopes active at creation time, shared with their owner
    chain: Vec<ScopeRef>,
}

impl Capture {
    /// Fresh snapshot cells holding the current values, over the same chain
    pub fn fork(&self) -> Self {
        let snapshot = self
            .snapshot
            .iter()
            .map(|(name, cell)| (name.clone(), new_cell(cell.borrow().clone())))
            .collect();
        Capture {
            snapshot,
            chain: self.chain.clone(),
        }
    }

    /// Value of a snapshotted primitive
    pub fn snapshot_value(&self, name: &str) -> Option<Value> {
        self.snapshot.get(name).map(|cell| cell.borrow().clone())
    }
}

/// Stack of scopes, index 0 is outermost
#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<ScopeRef>,
}

impl Environment {
    /// Create an environment with one empty scope
    pub fn new() -> Self {
        Environment {
            scopes: vec![new_scope(HashMap::new())],
        }
    }

    /// Fresh call frame for a closure: the captured chain, then a frame scope
    /// seeded with the snapshotted primitive cells.
    ///
    /// Snapshot cells shadow the chain, so primitives resolve call-frame
    /// first and compound values through the shared chain.
    pub fn from_capture(capture: &Capture) -> Self {
        let mut scopes = capture.chain.clone();
        scopes.push(new_scope(capture.snapshot.clone()));
        Environment { scopes }
    }

    /// Push a new scope, optionally pre-seeded
    pub fn push(&mut self, initial: Option<HashMap<String, Value>>) {
        let bindings = initial
            .unwrap_or_default()
            .into_iter()
            .map(|(name, value)| (name, new_cell(value)))
            .collect();
        self.scopes.push(new_scope(bindings));
    }

    /// Discard the innermost scope. The outermost scope is never removed.
    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Cell bound to `name` in the nearest enclosing scope
    pub fn cell(&self, name: &str) -> Option<Cell> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.borrow().get(name).cloned())
    }

    /// Look up a variable in the scope chain
    pub fn get(&self, name: &str) -> Option<Value> {
        self.cell(name).map(|cell| cell.borrow().clone())
    }

    /// Mutate the nearest existing binding, or declare `name` in the
    /// innermost scope if no scope binds it.
    pub fn set(&mut self, name: &str, value: Value) {
        match self.cell(name) {
            Some(cell) => *cell.borrow_mut() = value,
            None => self.define(name, value),
        }
    }

    /// Bind `name` in the innermost scope, shadowing outer bindings
    pub fn define(&mut self, name: &str, value: Value) {
        self.bind_cell(name, new_cell(value));
    }

    /// Bind `name` in the innermost scope to an existing cell
    pub fn bind_cell(&mut self, name: &str, cell: Cell) {
        if let Some(scope) = self.scopes.last() {
            scope.borrow_mut().insert(name.to_string(), cell);
        }
    }

    /// Capture the current environment for a closure
    pub fn capture(&self) -> Capture {
        let mut seen = HashSet::new();
        let mut snapshot = HashMap::new();
        for scope in self.scopes.iter().rev() {
            for (name, cell) in scope.borrow().iter() {
                if !seen.insert(name.clone()) {
                    continue;
                }
                let value = cell.borrow();
                if value.is_primitive() {
                    snapshot.insert(name.clone(), new_cell(value.clone()));
                }
            }
        }
        Capture {
            snapshot,
            chain: self.scopes.clone(),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
