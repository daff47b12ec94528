//! Domus metamodel
//!
//! Derives a typed, facet-decorated metamodel from domain class
//! descriptions:
//!
//! - **Classes**: descriptors, the metadata source seam, canonicalization (`class` module)
//! - **Facets**: typed units of behavior and the precedence-resolving holder (`facet` module)
//! - **Factories**: facet factories and the phased programming model (`factory` module)
//! - **Specifications**: per-class metamodel and the two-phase loader (`spec` module)
//! - **Managed objects**: domain instances paired with their specification (`managed` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use domus_metamodel::*;
//!
//! let classes = ClassRegistry::new().with(
//!     ClassDescriptor::new("Customer")
//!         .method(MethodDescriptor::new("getName").returns(TypeRef::class("string")))
//!         .method(MethodDescriptor::new("hideName").returns(TypeRef::class("boolean"))),
//! );
//!
//! let loader = SpecificationLoader::new(Arc::new(classes), ProgrammingModel::new());
//! let customer = loader.load(&ClassName::new("Customer"))?;
//! assert!(customer.member("name").unwrap().facets().contains(FacetType::Visibility));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// ============================================================================
// Core Modules
// ============================================================================

/// Class model, metadata source and canonicalizer
pub mod class;

/// Metamodel configuration
pub mod config;

/// Error types
pub mod error;

/// Metamodel export traversal
pub mod export;

/// Facets and facet holders
pub mod facet;

/// Facet factories and the programming model
pub mod factory;

/// Feature types and identifiers
pub mod feature;

/// Managed objects and bookmarks
pub mod managed;

/// Persistence extension module
pub mod persistence;

/// Specifications and the specification loader
pub mod spec;

/// Post-build validation
pub mod validate;

// ============================================================================
// Re-exports
// ============================================================================

pub use class::{
    ClassCanonicalizer, ClassDescriptor, ClassKind, ClassName, ClassOrigin, ClassRegistry,
    ClassSource, Marker, MarkerValue, MethodDescriptor, ParamDescriptor, TypeRef,
};
pub use config::{IntrospectionPolicy, MetaModelConfig, ValidationConfig};
pub use error::{ConfigError, FacetFactoryError, MetaModelError, MetaModelResult};
pub use export::{json::export_json, walk_metamodel, MetaModelVisitor};
pub use facet::{
    AddOutcome, AttributeValue, ChoicesSource, Facet, FacetHolder, FacetKind, FacetType,
    Precedence, RejectedFacet, RejectionReason, Semantics,
};
pub use factory::{
    ClassContext, FacetFactory, FactoryMeta, InsertionPoint, MemberContext, ParameterContext,
    ProcessingPhase, ProgrammingModel, ProgrammingModelExtension,
};
pub use feature::{FeatureIdentifier, FeatureType, FeatureTypes};
pub use managed::{Bookmark, DomainObject, ManagedObject};
pub use persistence::PersistenceExtension;
pub use spec::{
    IntrospectionState, ObjectMember, ObjectSpecification, ParameterSpec, SpecId,
    SpecificationLoader,
};
pub use validate::{MetaModelValidator, ValidationFailure, ValidationReport};
