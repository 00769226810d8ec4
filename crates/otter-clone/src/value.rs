//! Script values
//!
//! A closed set of kinds. Primitives are held inline; every other kind is
//! reference-counted so that identity (and therefore sharing and cycles) is
//! observable through `Rc::ptr_eq`.

use crate::date::JsDate;
use crate::function::JsFunction;
use crate::object::{JsArray, JsObject};
use crate::regexp::JsRegExp;
use std::rc::Rc;

/// A script value
#[derive(Clone, Default)]
pub enum Value {
    /// `undefined`
    #[default]
    Undefined,
    /// `null`
    Null,
    /// Boolean
    Boolean(bool),
    /// IEEE 754 double
    Number(f64),
    /// Immutable string, shared freely
    String(Rc<str>),
    /// Ordered sequence
    Array(Rc<JsArray>),
    /// Key-value mapping
    Object(Rc<JsObject>),
    /// Instant in time
    Date(Rc<JsDate>),
    /// Compiled pattern
    RegExp(Rc<JsRegExp>),
    /// Opaque callable
    Function(Rc<JsFunction>),
}

impl Value {
    /// `undefined`
    pub const fn undefined() -> Self {
        Self::Undefined
    }

    /// `null`
    pub const fn null() -> Self {
        Self::Null
    }

    /// Boolean value
    pub const fn boolean(b: bool) -> Self {
        Self::Boolean(b)
    }

    /// Number value
    pub const fn number(n: f64) -> Self {
        Self::Number(n)
    }

    /// String value
    pub fn string(s: &str) -> Self {
        Self::String(Rc::from(s))
    }

    /// Wrap an array
    pub fn array(arr: JsArray) -> Self {
        Self::Array(Rc::new(arr))
    }

    /// Wrap an object
    pub fn object(obj: JsObject) -> Self {
        Self::Object(Rc::new(obj))
    }

    /// Wrap a date
    pub fn date(date: JsDate) -> Self {
        Self::Date(Rc::new(date))
    }

    /// Wrap a pattern
    pub fn regex(re: JsRegExp) -> Self {
        Self::RegExp(Rc::new(re))
    }

    /// Wrap a callable
    pub fn function(func: JsFunction) -> Self {
        Self::Function(Rc::new(func))
    }

    /// Check if undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Check if null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if null or undefined
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// Check if callable
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    /// Check if this is an array or object, the kinds with nested members
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_))
    }

    /// Boolean payload
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Number payload
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Array payload
    pub fn as_array(&self) -> Option<&Rc<JsArray>> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Object payload
    pub fn as_object(&self) -> Option<&Rc<JsObject>> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Date payload
    pub fn as_date(&self) -> Option<&Rc<JsDate>> {
        match self {
            Self::Date(date) => Some(date),
            _ => None,
        }
    }

    /// Pattern payload
    pub fn as_regex(&self) -> Option<&Rc<JsRegExp>> {
        match self {
            Self::RegExp(re) => Some(re),
            _ => None,
        }
    }

    /// Callable payload
    pub fn as_function(&self) -> Option<&Rc<JsFunction>> {
        match self {
            Self::Function(func) => Some(func),
            _ => None,
        }
    }

    /// `typeof` result
    pub fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Function(_) => "function",
            Self::Null | Self::Array(_) | Self::Object(_) | Self::Date(_) | Self::RegExp(_) => {
                "object"
            }
        }
    }

    /// Address of the heap cell for reference kinds, `None` for primitives.
    ///
    /// Strings are primitives here even though they live behind an `Rc`.
    pub fn heap_addr(&self) -> Option<usize> {
        match self {
            Self::Array(arr) => Some(Rc::as_ptr(arr) as usize),
            Self::Object(obj) => Some(Rc::as_ptr(obj) as usize),
            Self::Date(date) => Some(Rc::as_ptr(date) as usize),
            Self::RegExp(re) => Some(Rc::as_ptr(re) as usize),
            Self::Function(func) => Some(Rc::as_ptr(func) as usize),
            Self::Undefined
            | Self::Null
            | Self::Boolean(_)
            | Self::Number(_)
            | Self::String(_) => None,
        }
    }

    /// `===`: primitives by value, everything else by identity
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            _ => match (self.heap_addr(), other.heap_addr()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Empty every array and object reachable from this value.
    ///
    /// `Rc` cannot collect cycles, so a cyclic graph (including the clone of
    /// one) stays allocated until its containers are emptied. Walks with a
    /// heap stack, so depth is not limited by the native call stack. Class
    /// prototypes are left alone.
    pub fn release(&self) {
        let mut pending = vec![self.clone()];
        while let Some(value) = pending.pop() {
            match value {
                Self::Array(arr) => pending.extend(arr.drain()),
                Self::Object(obj) => pending.extend(obj.drain()),
                _ => {}
            }
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "\"{}\"", s),
            Self::Array(arr) => write!(f, "[object Array({})]", arr.len()),
            Self::Object(obj) => write!(f, "[object {}]", obj.class_name()),
            Self::Date(date) => write!(f, "Date({})", date.to_iso_string()),
            Self::RegExp(re) => write!(f, "{}", re),
            Self::Function(func) => write!(f, "[Function: {}]", func.name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_of() {
        assert_eq!(Value::undefined().type_of(), "undefined");
        assert_eq!(Value::null().type_of(), "object");
        assert_eq!(Value::from("x").type_of(), "string");
        assert_eq!(Value::array(JsArray::new()).type_of(), "object");
        assert_eq!(
            Value::function(JsFunction::new("f", |_| Value::Undefined)).type_of(),
            "function"
        );
    }

    #[test]
    fn test_strict_equals() {
        assert!(Value::number(1.0).strict_equals(&Value::from(1)));
        assert!(!Value::number(f64::NAN).strict_equals(&Value::number(f64::NAN)));
        assert!(Value::from("a").strict_equals(&Value::string("a")));
        assert!(!Value::null().strict_equals(&Value::undefined()));

        let obj = Value::object(JsObject::new());
        let other = Value::object(JsObject::new());
        assert!(obj.strict_equals(&obj.clone()));
        assert!(!obj.strict_equals(&other));
    }

    #[test]
    fn test_release_frees_cyclic_graph() {
        let obj = Rc::new(JsObject::new());
        let arr = Rc::new(JsArray::new());
        obj.set("list", Value::Array(Rc::clone(&arr)));
        arr.push(Value::Object(Rc::clone(&obj)));
        arr.push(Value::from("leaf"));
        let weak_obj = Rc::downgrade(&obj);
        let weak_arr = Rc::downgrade(&arr);

        let root = Value::Object(obj);
        drop(arr);
        root.release();
        drop(root);

        assert!(weak_obj.upgrade().is_none());
        assert!(weak_arr.upgrade().is_none());
    }

    #[test]
    fn test_release_on_primitive_is_noop() {
        Value::from("s").release();
        Value::undefined().release();
    }

    #[test]
    fn test_heap_addr_only_for_reference_kinds() {
        assert!(Value::from("s").heap_addr().is_none());
        assert!(Value::from(3).heap_addr().is_none());
        assert!(Value::array(JsArray::new()).heap_addr().is_some());
    }

    #[test]
    fn test_debug_is_shallow() {
        let obj = Rc::new(JsObject::new());
        obj.set("self", Value::Object(Rc::clone(&obj)));
        assert_eq!(format!("{:?}", Value::Object(obj)), "[object Object]");
    }
}
