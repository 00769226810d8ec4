//! # Otter Clone
//!
//! Cycle-aware deep copy for script values.
//!
//! Arrays and objects are copied member by member; dates and patterns are
//! rebuilt from their instant or source and flags; primitives pass through.
//! An identity map, filled before children are visited, keeps shared
//! references shared and cycles cyclic in the copy.
//!
//! ```
//! use otter_clone::{deep_clone, JsObject, Value};
//! use std::rc::Rc;
//!
//! let obj = Rc::new(JsObject::new());
//! obj.set("name", Value::from("otter"));
//! obj.set("self", Value::Object(Rc::clone(&obj)));
//!
//! let copy = deep_clone(&Value::Object(Rc::clone(&obj)));
//! let inner = copy.as_object().unwrap().get_own("self").unwrap();
//! assert!(inner.strict_equals(&copy));
//! # copy.release();
//! # Value::Object(obj).release();
//! ```
//!
//! ## Known boundary
//!
//! [`Traversal::Recursive`] uses the native call stack, so very deep acyclic
//! input can overflow it. [`Traversal::Worklist`] walks the same graph with a
//! heap-allocated pending stack.
//!
//! Values are reference counted, so a cyclic graph, and therefore the clone of
//! one, is never freed on drop alone. Call [`Value::release`] on a graph that
//! is no longer needed to empty its containers and let them drop.

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod cloner;
pub mod date;
pub mod equality;
pub mod error;
pub mod format;
pub mod function;
pub mod json;
pub mod object;
pub mod options;
pub mod regexp;
pub mod value;

pub use cloner::{CloneStats, DeepCloner, IdentityMap, deep_clone, deep_clone_with};
pub use date::JsDate;
pub use equality::deep_equal;
pub use error::{JsonError, ValueError};
pub use format::inspect;
pub use function::JsFunction;
pub use object::{Class, EmptyLike, JsArray, JsObject, Property, PropertyKey};
pub use options::{AllocationPolicy, CallablePolicy, CloneOptions, KeyPolicy, Traversal};
pub use regexp::{JsRegExp, RegExpFlags};
pub use value::Value;
