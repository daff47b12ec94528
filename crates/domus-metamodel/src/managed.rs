//! Managed objects: a domain instance paired with its specification

use serde::{Serialize, Serializer};
use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::class::ClassName;
use crate::error::{MetaModelError, MetaModelResult};
use crate::spec::{ObjectSpecification, SpecificationLoader};

/// A plain domain instance
pub trait DomainObject: Send + Sync + 'static {
    /// Runtime class of the instance (possibly a proxy or enhanced subtype)
    fn runtime_class(&self) -> ClassName;

    /// Persistent identifier, if the instance is persistent
    fn identifier(&self) -> Option<String> {
        None
    }

    /// Upcast for downcasting to the concrete type
    fn as_any(&self) -> &dyn Any;
}

/// Stable identity of a persistent object: `logical-type:identifier`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bookmark {
    logical_type: String,
    identifier: String,
}

impl Bookmark {
    /// Create a bookmark
    pub fn new(logical_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            logical_type: logical_type.into(),
            identifier: identifier.into(),
        }
    }

    /// Logical type name of the object's specification
    pub fn logical_type(&self) -> &str {
        &self.logical_type
    }

    /// Identifier within the logical type
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.logical_type, self.identifier)
    }
}

impl FromStr for Bookmark {
    type Err = MetaModelError;

    /// Split at the first `:`; the identifier may itself contain colons
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((logical_type, identifier)) if !logical_type.is_empty() && !identifier.is_empty() => {
                Ok(Bookmark::new(logical_type, identifier))
            }
            _ => Err(MetaModelError::InvalidBookmark(s.to_string())),
        }
    }
}

impl Serialize for Bookmark {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A domain instance together with its specification
///
/// Created per access; not cached.
#[derive(Clone)]
pub struct ManagedObject {
    spec: Arc<ObjectSpecification>,
    pojo: Arc<dyn DomainObject>,
    bookmark: Option<Bookmark>,
}

impl ManagedObject {
    /// Pair `pojo` with `spec`
    ///
    /// Fails with [`MetaModelError::TypeMismatch`] unless the canonical
    /// runtime class of `pojo` is the specification's class or a subclass of
    /// it. Persistent instances get a bookmark from the specification's
    /// logical type name.
    pub fn of(
        loader: &SpecificationLoader,
        spec: Arc<ObjectSpecification>,
        pojo: Arc<dyn DomainObject>,
    ) -> MetaModelResult<Self> {
        let canonicalizer = loader.canonicalizer();
        let runtime = pojo.runtime_class();
        if !canonicalizer.is_assignable(&runtime, spec.class())? {
            return Err(MetaModelError::TypeMismatch {
                expected: spec.class().clone(),
                actual: canonicalizer.canonicalize(&runtime)?,
            });
        }

        let bookmark = pojo
            .identifier()
            .map(|id| Bookmark::new(spec.logical_type_name(), id));
        Ok(Self { spec, pojo, bookmark })
    }

    /// Replace the bookmark
    pub fn with_bookmark(mut self, bookmark: Bookmark) -> Self {
        self.bookmark = Some(bookmark);
        self
    }

    /// The specification
    pub fn spec(&self) -> &Arc<ObjectSpecification> {
        &self.spec
    }

    /// The domain instance
    pub fn pojo(&self) -> &Arc<dyn DomainObject> {
        &self.pojo
    }

    /// Bookmark, for persistent instances
    pub fn bookmark(&self) -> Option<&Bookmark> {
        self.bookmark.as_ref()
    }

    /// The domain instance as its concrete type
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.pojo.as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for ManagedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedObject")
            .field("spec", self.spec.class())
            .field("runtime_class", &self.pojo.runtime_class())
            .field("bookmark", &self.bookmark)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ClassDescriptor, ClassOrigin, ClassRegistry, Marker, MethodDescriptor, TypeRef};
    use crate::factory::ProgrammingModel;

    struct Customer {
        class: &'static str,
        id: Option<u32>,
    }

    impl DomainObject for Customer {
        fn runtime_class(&self) -> ClassName {
            ClassName::new(self.class)
        }

        fn identifier(&self) -> Option<String> {
            self.id.map(|id| id.to_string())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn loader() -> SpecificationLoader {
        let registry = ClassRegistry::new()
            .with(ClassDescriptor::new("Party"))
            .with(
                ClassDescriptor::new("Customer")
                    .superclass("Party")
                    .marker(Marker::new("DomainObject").with("logicalTypeName", "crm.Customer"))
                    .method(MethodDescriptor::new("getName").returns(TypeRef::class("string"))),
            )
            .with(ClassDescriptor::new("Customer$Enhanced").origin(ClassOrigin::Enhanced {
                target: ClassName::new("Customer"),
            }))
            .with(ClassDescriptor::new("Supplier"));
        SpecificationLoader::new(Arc::new(registry), ProgrammingModel::new())
    }

    #[test]
    fn test_of_with_enhanced_runtime_class() {
        let loader = loader();
        let spec = loader.load(&ClassName::new("Customer")).unwrap();
        let pojo = Arc::new(Customer { class: "Customer$Enhanced", id: Some(42) });

        let managed = ManagedObject::of(&loader, spec, pojo).unwrap();
        assert_eq!(managed.bookmark().unwrap().to_string(), "crm.Customer:42");
        assert_eq!(managed.downcast_ref::<Customer>().unwrap().id, Some(42));
    }

    #[test]
    fn test_of_with_superclass_spec() {
        let loader = loader();
        let party = loader.load(&ClassName::new("Party")).unwrap();
        let pojo = Arc::new(Customer { class: "Customer", id: None });
        let managed = ManagedObject::of(&loader, party, pojo).unwrap();
        assert!(managed.bookmark().is_none());
    }

    #[test]
    fn test_type_mismatch() {
        let loader = loader();
        let supplier = loader.load(&ClassName::new("Supplier")).unwrap();
        let pojo = Arc::new(Customer { class: "Customer$Enhanced", id: None });
        let err = ManagedObject::of(&loader, supplier, pojo).unwrap_err();
        assert_eq!(
            err,
            MetaModelError::TypeMismatch {
                expected: ClassName::new("Supplier"),
                actual: ClassName::new("Customer"),
            }
        );
    }

    #[test]
    fn test_adapt() {
        let loader = loader();
        let managed = loader
            .adapt(Arc::new(Customer { class: "Customer$Enhanced", id: Some(7) }))
            .unwrap();
        assert_eq!(managed.spec().class().as_str(), "Customer");
    }

    #[test]
    fn test_bookmark_parse() {
        let bookmark: Bookmark = "crm.Customer:a:b".parse().unwrap();
        assert_eq!(bookmark.logical_type(), "crm.Customer");
        assert_eq!(bookmark.identifier(), "a:b");
        assert!("no-separator".parse::<Bookmark>().is_err());
        assert!(":42".parse::<Bookmark>().is_err());
        assert_eq!(
            serde_json::to_string(&Bookmark::new("crm.Customer", "42")).unwrap(),
            "\"crm.Customer:42\""
        );
    }
}
