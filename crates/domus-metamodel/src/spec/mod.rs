//! Specifications
//!
//! An [`ObjectSpecification`] is the metamodel of one canonical class: its
//! class-level facets plus its members in discovery order. Specifications
//! live in the [`SpecificationLoader`]'s arena and refer to each other
//! through [`SpecId`] handles, never through direct references, so cyclic
//! class graphs need no placeholders.
//!
//! Specifications are immutable once built. There is no API to add facets
//! to a built specification.

mod introspector;
mod loader;

pub use loader::SpecificationLoader;
pub(crate) use introspector::accessor_id;

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::class::{ClassKind, ClassName, TypeRef};
use crate::facet::{Facet, FacetHolder, FacetKind, FacetType, RejectedFacet};
use crate::feature::{FeatureIdentifier, FeatureType};

/// Handle of a specification in the loader's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SpecId(u32);

impl SpecId {
    pub(crate) fn new(index: usize) -> Self {
        SpecId(index as u32)
    }

    /// Position in the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw handle value
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SpecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Build state of a specification slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum IntrospectionState {
    /// Registered (phase 1) but not built
    NotIntrospected = 0,
    /// The pipeline is running
    Introspecting = 1,
    /// Fully built
    Introspected = 2,
    /// The pipeline failed; terminal until reset
    Failed = 3,
}

impl IntrospectionState {
    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            0 => IntrospectionState::NotIntrospected,
            1 => IntrospectionState::Introspecting,
            2 => IntrospectionState::Introspected,
            3 => IntrospectionState::Failed,
            other => unreachable!("invalid introspection state {}", other),
        }
    }

    /// Stable name
    pub fn name(&self) -> &'static str {
        match self {
            IntrospectionState::NotIntrospected => "not-introspected",
            IntrospectionState::Introspecting => "introspecting",
            IntrospectionState::Introspected => "introspected",
            IntrospectionState::Failed => "failed",
        }
    }
}

/// An action parameter
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    pub(crate) index: usize,
    pub(crate) name: String,
    pub(crate) type_ref: TypeRef,
    pub(crate) type_spec: Option<SpecId>,
    pub(crate) facets: FacetHolder,
}

impl ParameterSpec {
    /// Position in the action's parameter list
    pub fn index(&self) -> usize {
        self.index
    }

    /// Declared parameter name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    /// Specification of the parameter type
    pub fn type_spec(&self) -> Option<SpecId> {
        self.type_spec
    }

    /// Facets of the parameter
    pub fn facets(&self) -> &FacetHolder {
        &self.facets
    }

    /// Feature identifier
    pub fn identifier(&self) -> &FeatureIdentifier {
        self.facets.identifier()
    }
}

/// A property, collection or action
#[derive(Debug, Clone)]
pub struct ObjectMember {
    pub(crate) id: String,
    pub(crate) feature_type: FeatureType,
    pub(crate) method: String,
    pub(crate) type_ref: TypeRef,
    pub(crate) type_spec: Option<SpecId>,
    pub(crate) facets: FacetHolder,
    pub(crate) parameters: Vec<ParameterSpec>,
}

impl ObjectMember {
    /// Member id (`name` for `getName()`, the method name for actions)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Property, collection or action
    pub fn feature_type(&self) -> FeatureType {
        self.feature_type
    }

    /// Accessor or action method
    pub fn method_name(&self) -> &str {
        &self.method
    }

    /// Value type (element type for collections, return type for actions)
    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    /// Specification of the value type; `None` for void actions
    pub fn type_spec(&self) -> Option<SpecId> {
        self.type_spec
    }

    /// Facets of the member
    pub fn facets(&self) -> &FacetHolder {
        &self.facets
    }

    /// Action parameters; empty for associations
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Feature identifier
    pub fn identifier(&self) -> &FeatureIdentifier {
        self.facets.identifier()
    }

    /// Declaring class
    pub fn declaring_class(&self) -> &ClassName {
        &self.facets.identifier().class
    }
}

/// Metamodel of one canonical class
#[derive(Debug, Clone)]
pub struct ObjectSpecification {
    pub(crate) id: SpecId,
    pub(crate) class: ClassName,
    pub(crate) kind: ClassKind,
    pub(crate) superclass: Option<SpecId>,
    pub(crate) facets: FacetHolder,
    pub(crate) members: Vec<ObjectMember>,
    pub(crate) member_index: FxHashMap<String, usize>,
    pub(crate) unconsumed_methods: Vec<String>,
}

impl ObjectSpecification {
    /// Arena handle
    pub fn id(&self) -> SpecId {
        self.id
    }

    /// Canonical class
    pub fn class(&self) -> &ClassName {
        &self.class
    }

    /// Kind of class
    pub fn kind(&self) -> &ClassKind {
        &self.kind
    }

    /// Specification of the direct superclass
    pub fn superclass(&self) -> Option<SpecId> {
        self.superclass
    }

    /// Class-level facets
    pub fn facets(&self) -> &FacetHolder {
        &self.facets
    }

    /// Winning class-level facet of a type
    pub fn facet(&self, facet_type: FacetType) -> Option<&Arc<Facet>> {
        self.facets.get(facet_type)
    }

    /// Whether a class-level facet of the type is present
    pub fn contains_facet(&self, facet_type: FacetType) -> bool {
        self.facets.contains(facet_type)
    }

    /// Members in discovery order
    pub fn members(&self) -> &[ObjectMember] {
        &self.members
    }

    /// Member by id
    pub fn member(&self, id: &str) -> Option<&ObjectMember> {
        self.member_index.get(id).map(|&i| &self.members[i])
    }

    /// Members of one feature type, in discovery order
    pub fn members_of(&self, feature_type: FeatureType) -> impl Iterator<Item = &ObjectMember> {
        self.members.iter().filter(move |m| m.feature_type == feature_type)
    }

    /// Properties
    pub fn properties(&self) -> impl Iterator<Item = &ObjectMember> {
        self.members_of(FeatureType::Property)
    }

    /// Collections
    pub fn collections(&self) -> impl Iterator<Item = &ObjectMember> {
        self.members_of(FeatureType::Collection)
    }

    /// Actions
    pub fn actions(&self) -> impl Iterator<Item = &ObjectMember> {
        self.members_of(FeatureType::Action)
    }

    /// Methods no factory and no member discovery consumed
    pub fn unconsumed_methods(&self) -> &[String] {
        &self.unconsumed_methods
    }

    /// Logical type name, used in bookmarks
    pub fn logical_type_name(&self) -> &str {
        match self.facets.kind(FacetType::LogicalType) {
            Some(FacetKind::LogicalType { name }) => name,
            _ => self.class.as_str(),
        }
    }

    /// Whether this is a scalar value type
    pub fn is_value(&self) -> bool {
        self.facets.contains(FacetType::ValueSemantics)
    }

    /// Every holder of the specification: class, members, parameters
    pub fn holders(&self) -> impl Iterator<Item = &FacetHolder> {
        std::iter::once(&self.facets).chain(self.members.iter().flat_map(|m| {
            std::iter::once(&m.facets).chain(m.parameters.iter().map(|p| &p.facets))
        }))
    }

    /// Contributions rejected by the precedence policy, across all holders
    pub fn rejected_contributions(&self) -> Vec<&RejectedFacet> {
        self.holders().flat_map(|h| h.rejected()).collect()
    }
}
