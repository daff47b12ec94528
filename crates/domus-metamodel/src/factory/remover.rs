//! The shrinking set of methods still open for interpretation

use crate::class::MethodDescriptor;

/// Name prefixes of supporting methods; a method starting with one of these
/// followed by an upper-case letter or digit is never an action
pub const SUPPORTING_PREFIXES: &[&str] = &[
    "hide",
    "disable",
    "choices",
    "autoComplete",
    "default",
    "validate",
    "set",
    "clear",
    "modify",
];

/// Whether `name` looks like a supporting method (`hideName`, `choices0Place`, ...)
pub fn is_supporting_method(name: &str) -> bool {
    SUPPORTING_PREFIXES.iter().any(|prefix| {
        name.strip_prefix(prefix)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    })
}

/// Methods of a class that have not been consumed yet, in declaration order
#[derive(Debug, Clone, Default)]
pub struct MethodRemover {
    methods: Vec<MethodDescriptor>,
}

impl MethodRemover {
    /// Create from the full method list
    pub fn new(methods: Vec<MethodDescriptor>) -> Self {
        Self { methods }
    }

    /// Find a method by name, optionally with a given number of parameters
    pub fn find(&self, name: &str, arity: Option<usize>) -> Option<&MethodDescriptor> {
        self.methods
            .iter()
            .find(|m| m.name == name && arity.map_or(true, |n| m.params.len() == n))
    }

    /// Remove and return the first method with `name`
    pub fn remove(&mut self, name: &str) -> Option<MethodDescriptor> {
        let pos = self.methods.iter().position(|m| m.name == name)?;
        Some(self.methods.remove(pos))
    }

    /// Remove and return all methods matching `pred`, in order
    pub fn remove_where<F>(&mut self, mut pred: F) -> Vec<MethodDescriptor>
    where
        F: FnMut(&MethodDescriptor) -> bool,
    {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.methods.len());
        for method in self.methods.drain(..) {
            if pred(&method) {
                removed.push(method);
            } else {
                kept.push(method);
            }
        }
        self.methods = kept;
        removed
    }

    /// Methods still present
    pub fn remaining(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Number of methods still present
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether every method has been consumed
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
