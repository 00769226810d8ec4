//! Clone configuration

/// What happens to callable values met during a clone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CallablePolicy {
    /// Hand back the same function (the clone aliases it)
    #[default]
    Share,
    /// Replace the function with `null`
    Null,
}

/// Which object keys are copied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Own enumerable keys only
    #[default]
    Own,
    /// Own and inherited enumerable keys (`for..in`), flattened into own keys of the clone
    Inherited,
}

/// How the empty target for an object is allocated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AllocationPolicy {
    /// Instance of the source's class
    #[default]
    SameClass,
    /// Always a plain object
    Plain,
}

/// How the value graph is walked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Traversal {
    /// Native recursion. Depth is bounded by the thread's stack.
    #[default]
    Recursive,
    /// Explicit pending stack on the heap
    Worklist,
}

/// Clone configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloneOptions {
    /// Callable handling (default: share)
    pub callables: CallablePolicy,
    /// Key selection for objects (default: own enumerable)
    pub keys: KeyPolicy,
    /// Target allocation for objects (default: same class)
    pub allocation: AllocationPolicy,
    /// Walk strategy (default: recursive)
    pub traversal: Traversal,
}

impl CloneOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// The `for..in` flavour: plain targets, inherited keys flattened in
    pub fn simple() -> Self {
        Self {
            keys: KeyPolicy::Inherited,
            allocation: AllocationPolicy::Plain,
            ..Self::default()
        }
    }

    /// Set the callable policy
    pub fn with_callables(mut self, callables: CallablePolicy) -> Self {
        self.callables = callables;
        self
    }

    /// Set the key policy
    pub fn with_keys(mut self, keys: KeyPolicy) -> Self {
        self.keys = keys;
        self
    }

    /// Set the allocation policy
    pub fn with_allocation(mut self, allocation: AllocationPolicy) -> Self {
        self.allocation = allocation;
        self
    }

    /// Set the traversal strategy
    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CloneOptions::new();
        assert_eq!(options.callables, CallablePolicy::Share);
        assert_eq!(options.keys, KeyPolicy::Own);
        assert_eq!(options.allocation, AllocationPolicy::SameClass);
        assert_eq!(options.traversal, Traversal::Recursive);
    }

    #[test]
    fn test_builder() {
        let options = CloneOptions::simple()
            .with_callables(CallablePolicy::Null)
            .with_traversal(Traversal::Worklist);
        assert_eq!(options.keys, KeyPolicy::Inherited);
        assert_eq!(options.allocation, AllocationPolicy::Plain);
        assert_eq!(options.callables, CallablePolicy::Null);
        assert_eq!(options.traversal, Traversal::Worklist);
    }
}
