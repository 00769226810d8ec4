//! Structural equality
//!
//! Two graphs are equal when they have the same shape and the same primitive
//! at every position. Pairs of containers under comparison are assumed equal
//! while their members are checked, which makes the check terminate on cycles
//! and accept two cycles of matching shape.

use crate::object::PropertyKey;
use crate::value::Value;
use rustc_hash::{FxHashMap, FxHashSet};
use std::rc::Rc;

/// Deep structural equality.
///
/// Numbers compare with SameValueZero (`NaN` equals `NaN`). Objects compare
/// own enumerable properties regardless of order, and must share a class.
/// Callables compare by identity.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    let mut assumed = FxHashSet::default();
    equal(a, b, &mut assumed)
}

fn equal(a: &Value, b: &Value, assumed: &mut FxHashSet<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Date(x), Value::Date(y)) => x.time() == y.time(),
        (Value::RegExp(x), Value::RegExp(y)) => x.source() == y.source() && x.flags() == y.flags(),
        (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),
        (Value::Array(x), Value::Array(y)) => {
            if !assume(a, b, assumed) {
                return true;
            }
            let (xs, ys) = (x.elements(), y.elements());
            xs.len() == ys.len() && xs.iter().zip(&ys).all(|(p, q)| equal(p, q, assumed))
        }
        (Value::Object(x), Value::Object(y)) => {
            if !assume(a, b, assumed) {
                return true;
            }
            let same_class = match (x.class(), y.class()) {
                (Some(cx), Some(cy)) => Rc::ptr_eq(cx, cy),
                (None, None) => true,
                _ => false,
            };
            if !same_class {
                return false;
            }

            let xs = x.own_enumerable_entries();
            let ys: FxHashMap<PropertyKey, Value> = y.own_enumerable_entries().into_iter().collect();
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, p)| ys.get(key).is_some_and(|q| equal(p, q, assumed)))
        }
        _ => false,
    }
}

/// Record the pair; `false` if it was already under comparison
fn assume(a: &Value, b: &Value, assumed: &mut FxHashSet<(usize, usize)>) -> bool {
    match (a.heap_addr(), b.heap_addr()) {
        (Some(x), Some(y)) => assumed.insert((x, y)),
        _ => true,
    }
}
