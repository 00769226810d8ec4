//! Arrays, objects and their constructing classes

use crate::options::AllocationPolicy;
use crate::value::Value;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use std::cell::RefCell;
use std::rc::Rc;

/// Property key. Only string keys exist in this model.
pub type PropertyKey = Rc<str>;

/// An own data property
#[derive(Debug, Clone)]
pub struct Property {
    /// Stored value
    pub value: Value,
    /// Whether the key shows up during enumeration
    pub enumerable: bool,
}

impl Property {
    /// Enumerable data property
    pub fn data(value: Value) -> Self {
        Self {
            value,
            enumerable: true,
        }
    }

    /// Non-enumerable data property
    pub fn hidden(value: Value) -> Self {
        Self {
            value,
            enumerable: false,
        }
    }
}

/// The constructing type of an object: a name and the prototype instances inherit from
#[derive(Debug)]
pub struct Class {
    name: String,
    prototype: Option<Rc<JsObject>>,
}

impl Class {
    /// Create a class whose instances inherit from `prototype`
    pub fn new(name: impl Into<String>, prototype: Option<Rc<JsObject>>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            prototype,
        })
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prototype shared by all instances
    pub fn prototype(&self) -> Option<&Rc<JsObject>> {
        self.prototype.as_ref()
    }

    /// A new, empty instance of this class
    pub fn construct(self: &Rc<Self>) -> JsObject {
        JsObject::with_class(Rc::clone(self))
    }
}

/// Allocation of an empty container of the same kind as an existing one
pub trait EmptyLike {
    /// An empty container the clone of `self` is filled into
    fn empty_like(&self, allocation: AllocationPolicy) -> Self;
}

/// An ordered sequence
#[derive(Default)]
pub struct JsArray {
    elements: RefCell<Vec<Value>>,
}

impl JsArray {
    /// Create an empty array
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty array with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: RefCell::new(Vec::with_capacity(capacity)),
        }
    }

    /// Create an array holding `elements`
    pub fn from_vec(elements: Vec<Value>) -> Self {
        Self {
            elements: RefCell::new(elements),
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    /// Whether the array has no elements
    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Option<Value> {
        self.elements.borrow().get(index).cloned()
    }

    /// Store at `index`, padding with `undefined` past the end
    pub fn set(&self, index: usize, value: Value) {
        let mut elements = self.elements.borrow_mut();
        if index >= elements.len() {
            elements.resize(index + 1, Value::Undefined);
        }
        elements[index] = value;
    }

    /// Append an element
    pub fn push(&self, value: Value) {
        self.elements.borrow_mut().push(value);
    }

    /// Remove and return the last element
    pub fn pop(&self) -> Option<Value> {
        self.elements.borrow_mut().pop()
    }

    /// Snapshot of the elements in index order
    pub fn elements(&self) -> Vec<Value> {
        self.elements.borrow().clone()
    }

    /// Remove every element, returning them in index order
    pub fn drain(&self) -> Vec<Value> {
        std::mem::take(&mut *self.elements.borrow_mut())
    }
}

impl std::fmt::Debug for JsArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsArray").field("len", &self.len()).finish()
    }
}

impl EmptyLike for JsArray {
    fn empty_like(&self, _allocation: AllocationPolicy) -> Self {
        Self::with_capacity(self.len())
    }
}

/// A key-value mapping with insertion-ordered properties
#[derive(Default)]
pub struct JsObject {
    class: Option<Rc<Class>>,
    properties: RefCell<IndexMap<PropertyKey, Property>>,
}

impl JsObject {
    /// Create a plain object
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an instance of `class`
    pub fn with_class(class: Rc<Class>) -> Self {
        Self {
            class: Some(class),
            properties: RefCell::new(IndexMap::new()),
        }
    }

    /// Constructing class, `None` for plain objects
    pub fn class(&self) -> Option<&Rc<Class>> {
        self.class.as_ref()
    }

    /// Name reported by the constructor, `Object` for plain objects
    pub fn class_name(&self) -> &str {
        self.class.as_ref().map_or("Object", |c| c.name())
    }

    /// Prototype inherited through the class
    pub fn prototype(&self) -> Option<Rc<JsObject>> {
        self.class.as_ref().and_then(|c| c.prototype().cloned())
    }

    /// Number of own properties, enumerable or not
    pub fn len(&self) -> usize {
        self.properties.borrow().len()
    }

    /// Whether the object has no own properties
    pub fn is_empty(&self) -> bool {
        self.properties.borrow().is_empty()
    }

    /// Own property lookup
    pub fn get_own(&self, key: &str) -> Option<Value> {
        self.properties.borrow().get(key).map(|p| p.value.clone())
    }

    /// Property lookup through the prototype chain
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.get_own(key) {
            return Some(value);
        }
        let mut seen = FxHashSet::default();
        let mut current = self.prototype();
        while let Some(proto) = current {
            if !seen.insert(Rc::as_ptr(&proto)) {
                break;
            }
            if let Some(value) = proto.get_own(key) {
                return Some(value);
            }
            current = proto.prototype();
        }
        None
    }

    /// Whether `key` is an own property
    pub fn has_own(&self, key: &str) -> bool {
        self.properties.borrow().contains_key(key)
    }

    /// Assign a value. New keys become enumerable; existing keys keep their attributes.
    pub fn set(&self, key: &str, value: Value) {
        let mut properties = self.properties.borrow_mut();
        match properties.get_mut(key) {
            Some(property) => property.value = value,
            None => {
                properties.insert(PropertyKey::from(key), Property::data(value));
            }
        }
    }

    /// Define or replace an own property with explicit attributes
    pub fn define_property(&self, key: &str, property: Property) {
        self.properties
            .borrow_mut()
            .insert(PropertyKey::from(key), property);
    }

    /// Remove an own property, keeping the order of the rest
    pub fn delete(&self, key: &str) -> bool {
        self.properties.borrow_mut().shift_remove(key).is_some()
    }

    /// Remove every own property, enumerable or not, returning the values
    pub fn drain(&self) -> Vec<Value> {
        let properties = std::mem::take(&mut *self.properties.borrow_mut());
        properties.into_values().map(|property| property.value).collect()
    }

    /// All own keys in insertion order
    pub fn own_keys(&self) -> Vec<PropertyKey> {
        self.properties.borrow().keys().cloned().collect()
    }

    /// Own enumerable entries in insertion order
    pub fn own_enumerable_entries(&self) -> Vec<(PropertyKey, Value)> {
        self.properties
            .borrow()
            .iter()
            .filter(|(_, p)| p.enumerable)
            .map(|(k, p)| (k.clone(), p.value.clone()))
            .collect()
    }

    /// Enumerable entries in `for..in` order: own keys first, then each
    /// prototype's keys not shadowed by a closer object.
    pub fn enumerable_entries(&self) -> Vec<(PropertyKey, Value)> {
        let mut entries = Vec::new();
        let mut shadowed: FxHashSet<PropertyKey> = FxHashSet::default();
        let mut visited = FxHashSet::default();

        self.collect_enumerable(&mut entries, &mut shadowed);
        let mut current = self.prototype();
        while let Some(proto) = current {
            if !visited.insert(Rc::as_ptr(&proto)) {
                break;
            }
            proto.collect_enumerable(&mut entries, &mut shadowed);
            current = proto.prototype();
        }
        entries
    }

    fn collect_enumerable(
        &self,
        entries: &mut Vec<(PropertyKey, Value)>,
        shadowed: &mut FxHashSet<PropertyKey>,
    ) {
        for (key, property) in self.properties.borrow().iter() {
            if !shadowed.insert(key.clone()) {
                continue;
            }
            if property.enumerable {
                entries.push((key.clone(), property.value.clone()));
            }
        }
    }
}

impl std::fmt::Debug for JsObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsObject")
            .field("class", &self.class_name())
            .field("len", &self.len())
            .finish()
    }
}

impl EmptyLike for JsObject {
    fn empty_like(&self, allocation: AllocationPolicy) -> Self {
        match (allocation, &self.class) {
            (AllocationPolicy::SameClass, Some(class)) => class.construct(),
            _ => Self::new(),
        }
    }
}
