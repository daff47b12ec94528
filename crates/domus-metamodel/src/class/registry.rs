//! Class descriptor sources

use dashmap::DashMap;
use rustc_hash::FxHashSet;
use std::sync::Arc;

use super::{ClassDescriptor, ClassName};

/// Scalar value types known to every fresh [`ClassRegistry`]
pub const VALUE_TYPES: &[&str] = &["string", "int", "long", "decimal", "boolean", "date"];

/// Source of class metadata
///
/// This is the only place the metamodel reads class structure from.
pub trait ClassSource: Send + Sync {
    /// Describe a class, or `None` if it is unknown
    fn describe(&self, class: &ClassName) -> Option<Arc<ClassDescriptor>>;

    /// Superclass chain of `class`, nearest first, excluding `class` itself
    ///
    /// Stops at the first unknown class or at a repeated name.
    fn superclasses(&self, class: &ClassName) -> Vec<ClassName> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        seen.insert(class.clone());

        let mut current = self.describe(class).and_then(|d| d.superclass.clone());
        while let Some(parent) = current {
            if !seen.insert(parent.clone()) {
                break;
            }
            current = self.describe(&parent).and_then(|d| d.superclass.clone());
            chain.push(parent);
        }
        chain
    }
}

/// In-memory, thread-safe registry of class descriptors
pub struct ClassRegistry {
    classes: DashMap<ClassName, Arc<ClassDescriptor>>,
}

impl ClassRegistry {
    /// Create a registry with the built-in value types registered
    pub fn new() -> Self {
        let registry = Self::empty();
        for name in VALUE_TYPES {
            registry.register(ClassDescriptor::value(name));
        }
        registry
    }

    /// Create a registry with no classes at all
    pub fn empty() -> Self {
        Self {
            classes: DashMap::new(),
        }
    }

    /// Register (or replace) a class descriptor
    pub fn register(&self, descriptor: ClassDescriptor) -> Arc<ClassDescriptor> {
        let descriptor = Arc::new(descriptor);
        self.classes
            .insert(descriptor.name.clone(), descriptor.clone());
        descriptor
    }

    /// Builder-style registration
    pub fn with(self, descriptor: ClassDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Whether a class is registered
    pub fn contains(&self, class: &ClassName) -> bool {
        self.classes.contains_key(class)
    }

    /// Number of registered classes
    pub fn count(&self) -> usize {
        self.classes.len()
    }

    /// All registered class names, sorted
    pub fn names(&self) -> Vec<ClassName> {
        let mut names: Vec<ClassName> = self.classes.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassSource for ClassRegistry {
    fn describe(&self, class: &ClassName) -> Option<Arc<ClassDescriptor>> {
        self.classes.get(class).map(|entry| entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_types_preregistered() {
        let registry = ClassRegistry::new();
        assert_eq!(registry.count(), VALUE_TYPES.len());
        let string = registry.describe(&ClassName::new("string")).unwrap();
        assert!(string.is_value());
    }

    #[test]
    fn test_empty_registry() {
        let registry = ClassRegistry::empty();
        assert_eq!(registry.count(), 0);
        assert!(registry.describe(&ClassName::new("string")).is_none());
    }

    #[test]
    fn test_register_and_replace() {
        let registry = ClassRegistry::empty();
        registry.register(ClassDescriptor::new("Customer"));
        registry.register(ClassDescriptor::new("Customer").superclass("Party"));

        assert_eq!(registry.count(), 1);
        let desc = registry.describe(&ClassName::new("Customer")).unwrap();
        assert_eq!(desc.superclass, Some(ClassName::new("Party")));
    }

    #[test]
    fn test_superclass_chain() {
        let registry = ClassRegistry::empty()
            .with(ClassDescriptor::new("Entity"))
            .with(ClassDescriptor::new("Party").superclass("Entity"))
            .with(ClassDescriptor::new("Customer").superclass("Party"));

        assert_eq!(
            registry.superclasses(&ClassName::new("Customer")),
            vec![ClassName::new("Party"), ClassName::new("Entity")]
        );
        assert!(registry.superclasses(&ClassName::new("Entity")).is_empty());
    }

    #[test]
    fn test_superclass_chain_stops_on_loop() {
        let registry = ClassRegistry::empty()
            .with(ClassDescriptor::new("A").superclass("B"))
            .with(ClassDescriptor::new("B").superclass("A"));

        assert_eq!(
            registry.superclasses(&ClassName::new("A")),
            vec![ClassName::new("B")]
        );
    }

    #[test]
    fn test_names_sorted() {
        let registry = ClassRegistry::empty()
            .with(ClassDescriptor::new("Zeta"))
            .with(ClassDescriptor::new("Alpha"));
        assert_eq!(
            registry.names(),
            vec![ClassName::new("Alpha"), ClassName::new("Zeta")]
        );
    }
}
