//! Object store
//!
//! All objects of a run live in one arena and are addressed by [`ObjectId`].
//! Variables hold handles; the store owns the objects. Nothing is freed
//! before the interpreter is dropped.

use super::error::{InterpResult, RuntimeError};
use super::value::{Closure, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

/// Handle to an object in an [`ObjectStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A prototype-based object
#[derive(Debug, Clone, Default)]
pub struct Object {
    pub properties: HashMap<String, Value>,
    /// Methods overloaded by arity
    pub methods: HashMap<String, BTreeMap<usize, Rc<Closure>>>,
    pub proto: Option<ObjectId>,
}

/// Arena of live objects
#[derive(Debug, Default)]
pub struct ObjectStore {
    objects: Vec<Object>,
}

/// Walks an object and its prototypes, reporting a cycle instead of looping
struct Chain<'a> {
    store: &'a ObjectStore,
    next: Option<ObjectId>,
    seen: HashSet<ObjectId>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = InterpResult<&'a Object>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        if !self.seen.insert(id) {
            return Some(Err(RuntimeError::cyclic_prototype(id)));
        }
        let store = self.store;
        let object = store.get(id);
        self.next = object.proto;
        Some(Ok(object))
    }
}

impl ObjectStore {
    pub fn new() -> Self {
        ObjectStore {
            objects: Vec::new(),
        }
    }

    /// Allocate an empty object with no prototype
    pub fn alloc(&mut self) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(Object::default());
        id
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Handles are only minted by this store, so indexing cannot miss.
    pub fn get(&self, id: ObjectId) -> &Object {
        &self.objects[id.index()]
    }

    pub fn get_mut(&mut self, id: ObjectId) -> &mut Object {
        &mut self.objects[id.index()]
    }

    fn chain(&self, id: ObjectId) -> Chain<'_> {
        Chain {
            store: self,
            next: Some(id),
            seen: HashSet::new(),
        }
    }

    /// The prototype link as a value (Nil when unset)
    pub fn proto(&self, id: ObjectId) -> Value {
        match self.get(id).proto {
            Some(proto) => Value::Object(proto),
            None => Value::Nil,
        }
    }

    /// Write the prototype link. Only objects and nil are accepted.
    pub fn set_proto(&mut self, id: ObjectId, value: &Value) -> InterpResult<()> {
        let proto = match value {
            Value::Object(proto) => Some(*proto),
            Value::Nil => None,
            other => return Err(RuntimeError::invalid_proto(other.type_name())),
        };
        self.get_mut(id).proto = proto;
        Ok(())
    }

    /// Write `obj.field`: closures become methods under their arity, anything
    /// else a property. Either replaces whatever the name held before.
    pub fn set_field(&mut self, id: ObjectId, field: &str, value: Value) {
        let object = self.get_mut(id);
        match value {
            Value::Closure(closure) => {
                object.properties.remove(field);
                object
                    .methods
                    .entry(field.to_string())
                    .or_default()
                    .insert(closure.arity(), closure);
            }
            value => {
                object.methods.remove(field);
                object.properties.insert(field.to_string(), value);
            }
        }
    }

    /// Read `obj.field`, searching properties along the prototype chain.
    /// `proto` reads the prototype link itself.
    pub fn get_property(&self, id: ObjectId, field: &str) -> InterpResult<Value> {
        if field == "proto" {
            return Ok(self.proto(id));
        }
        for object in self.chain(id) {
            if let Some(value) = object?.properties.get(field) {
                return Ok(value.clone());
            }
        }
        Err(RuntimeError::property_not_found(field))
    }

    /// Resolve `obj.name(..)` with `arity` arguments.
    ///
    /// At each object along the chain a matching overload wins; a property
    /// of that name stops the search as not callable.
    pub fn find_method(&self, id: ObjectId, name: &str, arity: usize) -> InterpResult<Rc<Closure>> {
        let mut other_arity = false;
        for object in self.chain(id) {
            let object = object?;
            if let Some(overloads) = object.methods.get(name) {
                if let Some(method) = overloads.get(&arity) {
                    return Ok(Rc::clone(method));
                }
                other_arity = true;
            } else if object.properties.contains_key(name) {
                return Err(RuntimeError::property_not_callable(name));
            }
        }
        if other_arity {
            Err(RuntimeError::method_overload_not_found(name, arity))
        } else {
            Err(RuntimeError::method_not_found(name))
        }
    }

    /// Copy a value so that nothing reachable from the copy is shared with
    /// the original object graph. Closures, methods included, get their own
    /// snapshot cells; their captured scope chain stays shared.
    ///
    /// The object graph is walked with an explicit worklist, so arbitrarily
    /// long chains of objects copy without growing the native stack.
    pub fn deep_copy(&mut self, value: &Value) -> Value {
        let mut copy = DeepCopy::default();
        let result = self.copy_value(value, &mut copy);
        while let Some((original, target)) = copy.pending.pop() {
            let source = self.get(original).clone();
            let properties: HashMap<_, _> = source
                .properties
                .into_iter()
                .map(|(name, value)| {
                    let value = self.copy_value(&value, &mut copy);
                    (name, value)
                })
                .collect();
            let methods = source
                .methods
                .into_iter()
                .map(|(name, overloads)| {
                    let overloads: BTreeMap<_, _> = overloads
                        .into_iter()
                        .map(|(arity, method)| (arity, copy.closure(&method)))
                        .collect();
                    (name, overloads)
                })
                .collect();
            let proto = source.proto.map(|proto| self.copy_id(proto, &mut copy));

            *self.get_mut(target) = Object {
                properties,
                methods,
                proto,
            };
        }
        result
    }

    fn copy_value(&mut self, value: &Value, copy: &mut DeepCopy) -> Value {
        match value {
            Value::Object(id) => Value::Object(self.copy_id(*id, copy)),
            Value::Closure(closure) => Value::Closure(copy.closure(closure)),
            other => other.clone(),
        }
    }

    /// Handle of the copy of `id`, allocating it and queueing its contents
    /// the first time `id` is reached.
    fn copy_id(&mut self, id: ObjectId, copy: &mut DeepCopy) -> ObjectId {
        if let Some(&target) = copy.objects.get(&id) {
            return target;
        }
        let target = self.alloc();
        copy.objects.insert(id, target);
        copy.pending.push((id, target));
        target
    }
}

/// State of one deep copy. Originals map to their copies, so shared
/// sub-objects stay shared inside the copy and cycles close.
#[derive(Default)]
struct DeepCopy {
    objects: HashMap<ObjectId, ObjectId>,
    closures: HashMap<*const Closure, Rc<Closure>>,
    /// Copies allocated but not yet filled in
    pending: Vec<(ObjectId, ObjectId)>,
}

impl DeepCopy {
    fn closure(&mut self, closure: &Rc<Closure>) -> Rc<Closure> {
        let fork = self
            .closures
            .entry(Rc::as_ptr(closure))
            .or_insert_with(|| Rc::new(closure.fork()));
        Rc::clone(fork)
    }
}
