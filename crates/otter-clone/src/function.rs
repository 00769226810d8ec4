//! Callable values
//!
//! Callables are opaque to the cloner: they are never invoked or inspected
//! while copying.

use crate::value::Value;

type NativeFn = dyn Fn(&[Value]) -> Value;

/// A host-provided callable
pub struct JsFunction {
    name: String,
    call: Box<NativeFn>,
}

impl JsFunction {
    /// Wrap a native closure
    pub fn new(name: impl Into<String>, call: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self {
            name: name.into(),
            call: Box::new(call),
        }
    }

    /// Function name, empty for anonymous functions
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke with the given arguments
    pub fn call(&self, args: &[Value]) -> Value {
        (self.call)(args)
    }
}

impl std::fmt::Debug for JsFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsFunction").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_native() {
        let double = JsFunction::new("double", |args| match args.first() {
            Some(Value::Number(n)) => Value::number(n * 2.0),
            _ => Value::undefined(),
        });
        assert_eq!(double.name(), "double");
        assert_eq!(double.call(&[Value::number(21.0)]).as_number(), Some(42.0));
        assert!(double.call(&[]).is_undefined());
    }
}
