//! Deep clone
//!
//! Copies a value graph so that no container in the result is shared with the
//! source. Shared and cyclic references are reproduced through an identity
//! map keyed by source address: a container is registered before any of its
//! children are visited, so meeting it again resolves to the clone under
//! construction instead of recursing forever.
//!
//! Dispatch order:
//! 1. `null` is returned as is
//! 2. dates are copied by instant
//! 3. patterns are rebuilt from source and flags
//! 4. other primitives pass through, callables follow [`CallablePolicy`]
//! 5. containers already in the identity map resolve to their clone
//! 6. anything else gets an empty target of the same kind, registered, then filled

use crate::date::JsDate;
use crate::object::{EmptyLike, PropertyKey};
use crate::options::{CallablePolicy, CloneOptions, KeyPolicy, Traversal};
use crate::value::Value;
use rustc_hash::FxHashMap;

/// Source address to clone, for one clone operation.
///
/// Each entry keeps its source alive so an address cannot be recycled while
/// the map is in use.
#[derive(Default)]
pub struct IdentityMap {
    entries: FxHashMap<usize, (Value, Value)>,
}

impl IdentityMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered sources
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clone registered for `source`, if any
    pub fn get(&self, source: &Value) -> Option<&Value> {
        let addr = source.heap_addr()?;
        self.entries.get(&addr).map(|(_, cloned)| cloned)
    }

    fn insert(&mut self, source: &Value, cloned: Value) {
        if let Some(addr) = source.heap_addr() {
            self.entries.insert(addr, (source.clone(), cloned));
        }
    }
}

impl std::fmt::Debug for IdentityMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityMap")
            .field("len", &self.entries.len())
            .finish()
    }
}

/// Counters for the most recent clone call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloneStats {
    /// Arrays and objects allocated
    pub containers: usize,
    /// Dates copied
    pub dates: usize,
    /// Patterns rebuilt
    pub patterns: usize,
    /// Callables shared or nulled
    pub callables: usize,
    /// References resolved from the identity map
    pub identity_hits: usize,
}

enum Resolved {
    /// Final value, nothing left to visit
    Done(Value),
    /// Freshly registered container that still has to be filled
    Allocated(Value),
}

enum Slot {
    Element,
    Property(PropertyKey),
}

/// Performs deep clones with a fixed set of options
#[derive(Debug, Default)]
pub struct DeepCloner {
    options: CloneOptions,
    stats: CloneStats,
}

impl DeepCloner {
    /// Create a cloner with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cloner with the given options
    pub fn with_options(options: CloneOptions) -> Self {
        Self {
            options,
            stats: CloneStats::default(),
        }
    }

    /// Options in effect
    pub fn options(&self) -> &CloneOptions {
        &self.options
    }

    /// Counters from the last `clone`/`clone_with_map` call
    pub fn last_stats(&self) -> CloneStats {
        self.stats
    }

    /// Clone a value with a fresh identity map
    pub fn clone(&mut self, value: &Value) -> Value {
        let mut memory = IdentityMap::new();
        self.clone_with_map(value, &mut memory)
    }

    /// Clone a value, continuing with a caller-owned identity map.
    ///
    /// Sources already registered in `memory` resolve to their earlier clones,
    /// so several roots cloned through one map keep their shared structure.
    pub fn clone_with_map(&mut self, value: &Value, memory: &mut IdentityMap) -> Value {
        self.stats = CloneStats::default();

        let cloned = match self.options.traversal {
            Traversal::Recursive => self.clone_recursive(value, memory),
            Traversal::Worklist => self.clone_worklist(value, memory),
        };

        tracing::debug!(
            target: "otter::clone",
            traversal = ?self.options.traversal,
            containers = self.stats.containers,
            dates = self.stats.dates,
            patterns = self.stats.patterns,
            callables = self.stats.callables,
            identity_hits = self.stats.identity_hits,
            "deep clone complete"
        );

        cloned
    }

    fn clone_recursive(&mut self, value: &Value, memory: &mut IdentityMap) -> Value {
        match self.resolve(value, memory) {
            Resolved::Done(cloned) => cloned,
            Resolved::Allocated(target) => {
                for (slot, child) in self.children(value) {
                    let cloned = self.clone_recursive(&child, memory);
                    assign(&target, slot, cloned);
                }
                target
            }
        }
    }

    fn clone_worklist(&mut self, value: &Value, memory: &mut IdentityMap) -> Value {
        let root = match self.resolve(value, memory) {
            Resolved::Done(cloned) => return cloned,
            Resolved::Allocated(target) => target,
        };

        let mut pending = vec![(value.clone(), root.clone())];
        while let Some((source, target)) = pending.pop() {
            for (slot, child) in self.children(&source) {
                let cloned = match self.resolve(&child, memory) {
                    Resolved::Done(cloned) => cloned,
                    Resolved::Allocated(fresh) => {
                        pending.push((child, fresh.clone()));
                        fresh
                    }
                };
                assign(&target, slot, cloned);
            }
        }

        root
    }

    fn resolve(&mut self, value: &Value, memory: &mut IdentityMap) -> Resolved {
        match value {
            Value::Null => Resolved::Done(Value::Null),

            Value::Date(date) => {
                if let Some(existing) = self.reuse(value, memory) {
                    return Resolved::Done(existing);
                }
                let copy = Value::date(JsDate::new(date.time()));
                memory.insert(value, copy.clone());
                self.stats.dates += 1;
                Resolved::Done(copy)
            }

            Value::RegExp(re) => {
                if let Some(existing) = self.reuse(value, memory) {
                    return Resolved::Done(existing);
                }
                let copy = Value::regex(re.duplicate());
                memory.insert(value, copy.clone());
                self.stats.patterns += 1;
                Resolved::Done(copy)
            }

            Value::Undefined | Value::Boolean(_) | Value::Number(_) | Value::String(_) => {
                Resolved::Done(value.clone())
            }

            Value::Function(_) => {
                self.stats.callables += 1;
                match self.options.callables {
                    CallablePolicy::Share => Resolved::Done(value.clone()),
                    CallablePolicy::Null => Resolved::Done(Value::Null),
                }
            }

            Value::Array(arr) => {
                if let Some(existing) = self.reuse(value, memory) {
                    return Resolved::Done(existing);
                }
                let target = Value::array(arr.empty_like(self.options.allocation));
                // Register before visiting elements (to handle circular refs)
                memory.insert(value, target.clone());
                self.stats.containers += 1;
                Resolved::Allocated(target)
            }

            Value::Object(obj) => {
                if let Some(existing) = self.reuse(value, memory) {
                    return Resolved::Done(existing);
                }
                let target = Value::object(obj.empty_like(self.options.allocation));
                // Register before visiting properties
                memory.insert(value, target.clone());
                self.stats.containers += 1;
                Resolved::Allocated(target)
            }
        }
    }

    fn reuse(&mut self, value: &Value, memory: &IdentityMap) -> Option<Value> {
        let existing = memory.get(value)?.clone();
        self.stats.identity_hits += 1;
        tracing::trace!(
            target: "otter::clone",
            kind = value.type_of(),
            "reusing clone from identity map"
        );
        Some(existing)
    }

    fn children(&self, source: &Value) -> Vec<(Slot, Value)> {
        match source {
            Value::Array(arr) => arr
                .elements()
                .into_iter()
                .map(|element| (Slot::Element, element))
                .collect(),
            Value::Object(obj) => {
                let entries = match self.options.keys {
                    KeyPolicy::Own => obj.own_enumerable_entries(),
                    KeyPolicy::Inherited => obj.enumerable_entries(),
                };
                entries
                    .into_iter()
                    .map(|(key, value)| (Slot::Property(key), value))
                    .collect()
            }
            _ => Vec::new(),
        }
    }
}

fn assign(target: &Value, slot: Slot, value: Value) {
    match (target, slot) {
        (Value::Array(arr), Slot::Element) => arr.push(value),
        (Value::Object(obj), Slot::Property(key)) => obj.set(&key, value),
        (target, _) => unreachable!("slot does not match {} target", target.type_of()),
    }
}

/// Deep clone with default options
pub fn deep_clone(value: &Value) -> Value {
    DeepCloner::new().clone(value)
}

/// Deep clone with the given options
pub fn deep_clone_with(value: &Value, options: CloneOptions) -> Value {
    DeepCloner::with_options(options).clone(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::JsFunction;
    use crate::object::{Class, JsArray, JsObject, Property};
    use crate::options::AllocationPolicy;
    use crate::regexp::JsRegExp;
    use std::rc::Rc;

    fn nested_arrays(depth: usize) -> Value {
        let root = Value::array(JsArray::new());
        let mut current = root.clone();
        for _ in 0..depth {
            let next = Value::array(JsArray::new());
            current.as_array().unwrap().push(next.clone());
            current = next;
        }
        root
    }

    #[test]
    fn test_clone_primitives() {
        let mut cloner = DeepCloner::new();

        assert!(cloner.clone(&Value::undefined()).is_undefined());
        assert!(cloner.clone(&Value::null()).is_null());
        assert_eq!(cloner.clone(&Value::boolean(true)).as_boolean(), Some(true));
        assert_eq!(cloner.clone(&Value::number(42.0)).as_number(), Some(42.0));
        assert_eq!(cloner.clone(&Value::from("hello")).as_str(), Some("hello"));
        assert_eq!(cloner.last_stats(), CloneStats::default());
    }

    #[test]
    fn test_clone_object() {
        let obj = JsObject::new();
        obj.set("x", Value::number(1.0));
        obj.set("y", Value::number(2.0));
        let val = Value::object(obj);

        let cloned = deep_clone(&val);
        let cloned_obj = cloned.as_object().unwrap();
        assert!(!cloned.strict_equals(&val));
        assert_eq!(cloned_obj.get_own("x").unwrap().as_number(), Some(1.0));
        assert_eq!(cloned_obj.get_own("y").unwrap().as_number(), Some(2.0));
    }

    #[test]
    fn test_clone_keeps_class() {
        let point = Class::new("Point", None);
        let obj = point.construct();
        obj.set("x", Value::number(3.0));
        let val = Value::object(obj);

        let cloned = deep_clone(&val);
        let cloned_obj = cloned.as_object().unwrap();
        assert!(Rc::ptr_eq(cloned_obj.class().unwrap(), &point));

        let plain = deep_clone_with(
            &val,
            CloneOptions::new().with_allocation(AllocationPolicy::Plain),
        );
        assert!(plain.as_object().unwrap().class().is_none());
        assert_eq!(
            plain.as_object().unwrap().get_own("x").unwrap().as_number(),
            Some(3.0)
        );
    }

    #[test]
    fn test_self_reference_resolves_to_clone() {
        let obj = Rc::new(JsObject::new());
        obj.set("self", Value::Object(Rc::clone(&obj)));
        let val = Value::Object(Rc::clone(&obj));

        let mut cloner = DeepCloner::new();
        let cloned = cloner.clone(&val);
        let inner = cloned.as_object().unwrap().get_own("self").unwrap();
        assert!(inner.strict_equals(&cloned));
        assert!(!inner.strict_equals(&val));

        let stats = cloner.last_stats();
        assert_eq!(stats.containers, 1);
        assert_eq!(stats.identity_hits, 1);

        val.release();
        cloned.release();
    }

    #[test]
    fn test_released_cyclic_clone_is_freed() {
        let obj = Rc::new(JsObject::new());
        obj.set("self", Value::Object(Rc::clone(&obj)));
        let val = Value::Object(obj);

        for traversal in [Traversal::Recursive, Traversal::Worklist] {
            let cloned = deep_clone_with(&val, CloneOptions::new().with_traversal(traversal));
            let weak = Rc::downgrade(cloned.as_object().unwrap());
            cloned.release();
            drop(cloned);
            assert!(weak.upgrade().is_none());
        }

        val.release();
    }

    #[test]
    #[should_panic(expected = "slot does not match object target")]
    fn test_assign_rejects_mismatched_slot() {
        assign(&Value::array(JsArray::new()), Slot::Property("x".into()), Value::Null);
    }

    #[test]
    fn test_shared_date_and_pattern_stay_shared() {
        let date = Value::date(JsDate::from_timestamp_millis(10).unwrap());
        let re = Value::regex(JsRegExp::new("a+", "g").unwrap());
        let arr = Value::array(JsArray::from_vec(vec![
            date.clone(),
            date.clone(),
            re.clone(),
            re.clone(),
        ]));

        let mut cloner = DeepCloner::new();
        let cloned = cloner.clone(&arr);
        let cloned_arr = cloned.as_array().unwrap();
        assert!(cloned_arr.get(0).unwrap().strict_equals(&cloned_arr.get(1).unwrap()));
        assert!(cloned_arr.get(2).unwrap().strict_equals(&cloned_arr.get(3).unwrap()));
        assert!(!cloned_arr.get(0).unwrap().strict_equals(&date));
        assert!(!cloned_arr.get(2).unwrap().strict_equals(&re));

        let stats = cloner.last_stats();
        assert_eq!(stats.dates, 1);
        assert_eq!(stats.patterns, 1);
        assert_eq!(stats.identity_hits, 2);
    }

    #[test]
    fn test_pattern_clone_resets_last_index() {
        let re = JsRegExp::new("a", "g").unwrap();
        re.set_last_index(2);
        let cloned = deep_clone(&Value::regex(re));
        assert_eq!(cloned.as_regex().unwrap().last_index(), 0);
    }

    #[test]
    fn test_function_share_policy() {
        let func = Value::function(JsFunction::new("f", |_| Value::number(1.0)));
        let mut cloner = DeepCloner::new();
        let cloned = cloner.clone(&func);
        assert!(cloned.strict_equals(&func));
        assert_eq!(cloner.last_stats().callables, 1);
    }

    #[test]
    fn test_function_null_policy() {
        let obj = JsObject::new();
        obj.set(
            "callback",
            Value::function(JsFunction::new("cb", |_| Value::Undefined)),
        );
        let val = Value::object(obj);

        let cloned = deep_clone_with(
            &val,
            CloneOptions::new().with_callables(CallablePolicy::Null),
        );
        let callback = cloned.as_object().unwrap().get_own("callback").unwrap();
        assert!(callback.is_null());
    }

    #[test]
    fn test_non_enumerable_properties_skipped() {
        let obj = JsObject::new();
        obj.set("visible", Value::number(1.0));
        obj.define_property("hidden", Property::hidden(Value::number(2.0)));

        let cloned = deep_clone(&Value::object(obj));
        let cloned_obj = cloned.as_object().unwrap();
        assert!(cloned_obj.has_own("visible"));
        assert!(!cloned_obj.has_own("hidden"));
    }

    #[test]
    fn test_key_policy_inherited_flattens_prototype_keys() {
        let proto = Rc::new(JsObject::new());
        proto.set("greeting", Value::from("hi"));
        let class = Class::new("Greeter", Some(proto));
        let obj = class.construct();
        obj.set("name", Value::from("otter"));
        let val = Value::object(obj);

        let own = deep_clone(&val);
        assert!(!own.as_object().unwrap().has_own("greeting"));
        assert_eq!(
            own.as_object().unwrap().get("greeting").unwrap().as_str(),
            Some("hi")
        );

        let flattened = deep_clone_with(&val, CloneOptions::simple());
        let flattened_obj = flattened.as_object().unwrap();
        assert!(flattened_obj.class().is_none());
        let keys: Vec<String> = flattened_obj.own_keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, ["name", "greeting"]);
    }

    #[test]
    fn test_each_clone_starts_with_empty_map() {
        let shared = Value::object(JsObject::new());
        let mut cloner = DeepCloner::new();
        let first = cloner.clone(&shared);
        let second = cloner.clone(&shared);
        assert!(!first.strict_equals(&second));
        assert_eq!(cloner.last_stats().identity_hits, 0);
    }

    #[test]
    fn test_clone_with_map_continues_identity() {
        let shared = Value::object(JsObject::new());
        let left = JsArray::new();
        left.push(shared.clone());
        let right = JsObject::new();
        right.set("inner", shared.clone());

        let mut memory = IdentityMap::new();
        let mut cloner = DeepCloner::new();
        let left_clone = cloner.clone_with_map(&Value::array(left), &mut memory);
        let right_clone = cloner.clone_with_map(&Value::object(right), &mut memory);

        let from_left = left_clone.as_array().unwrap().get(0).unwrap();
        let from_right = right_clone.as_object().unwrap().get_own("inner").unwrap();
        assert!(from_left.strict_equals(&from_right));
        assert!(memory.get(&shared).unwrap().strict_equals(&from_left));
        assert_eq!(memory.len(), 3);
        assert_eq!(cloner.last_stats().identity_hits, 1);
    }

    #[test]
    fn test_worklist_preserves_order_and_cycles() {
        let arr = Rc::new(JsArray::new());
        let inner = JsObject::new();
        inner.set("a", Value::number(1.0));
        inner.set("b", Value::number(2.0));
        arr.push(Value::object(inner));
        arr.push(Value::Array(Rc::clone(&arr)));
        arr.push(Value::from("tail"));
        let val = Value::Array(Rc::clone(&arr));

        let cloned = deep_clone_with(&val, CloneOptions::new().with_traversal(Traversal::Worklist));
        let cloned_arr = cloned.as_array().unwrap();
        assert_eq!(cloned_arr.len(), 3);
        assert!(cloned_arr.get(1).unwrap().strict_equals(&cloned));
        assert_eq!(cloned_arr.get(2).unwrap().as_str(), Some("tail"));
        let keys: Vec<String> = cloned_arr
            .get(0)
            .unwrap()
            .as_object()
            .unwrap()
            .own_keys()
            .iter()
            .map(|k| k.to_string())
            .collect();
        assert_eq!(keys, ["a", "b"]);

        val.release();
        cloned.release();
    }

    #[test]
    fn test_worklist_handles_deep_nesting() {
        let depth = 100_000;
        let source = nested_arrays(depth);

        let mut cloner = DeepCloner::with_options(
            CloneOptions::new().with_traversal(Traversal::Worklist),
        );
        let cloned = cloner.clone(&source);
        assert_eq!(cloner.last_stats().containers, depth + 1);

        let mut levels = 0;
        let mut current = cloned.clone();
        while let Some(next) = current.as_array().and_then(|arr| arr.get(0)) {
            levels += 1;
            current = next;
        }
        assert_eq!(levels, depth);

        drop(current);
        cloned.release();
        source.release();
    }
}
