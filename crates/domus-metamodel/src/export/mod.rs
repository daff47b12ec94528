//! Metamodel traversal for export
//!
//! Depth-first over specifications → members → parameters → facets →
//! attributes. Each `visit_*` method has a default implementation that calls
//! the corresponding `walk_*` function, so a visitor only overrides the
//! levels it cares about.
//!
//! # Example
//!
//! ```rust,ignore
//! struct CountFacets {
//!     count: usize,
//! }
//!
//! impl MetaModelVisitor for CountFacets {
//!     fn visit_facet(&mut self, _facet: &Facet) {
//!         self.count += 1;
//!     }
//! }
//! ```

pub mod json;

use crate::facet::{AttributeValue, Facet, FacetHolder};
use crate::spec::{ObjectMember, ObjectSpecification, ParameterSpec, SpecificationLoader};

/// Metamodel visitor
pub trait MetaModelVisitor: Sized {
    /// Called for each built specification
    fn visit_specification(&mut self, spec: &ObjectSpecification) {
        walk_specification(self, spec);
    }

    /// Called for each member
    fn visit_member(&mut self, member: &ObjectMember) {
        walk_member(self, member);
    }

    /// Called for each action parameter
    fn visit_parameter(&mut self, param: &ParameterSpec) {
        walk_parameter(self, param);
    }

    /// Called for each facet
    fn visit_facet(&mut self, facet: &Facet) {
        walk_facet(self, facet);
    }

    /// Attributes are leaves
    fn visit_attribute(&mut self, _name: &'static str, _value: &AttributeValue) {}
}

/// Visit every built specification of the loader, ordered by class name
pub fn walk_metamodel<V: MetaModelVisitor>(visitor: &mut V, loader: &SpecificationLoader) {
    let mut specs = loader.specifications();
    specs.sort_by(|a, b| a.class().cmp(b.class()));
    for spec in &specs {
        visitor.visit_specification(spec);
    }
}

fn walk_holder<V: MetaModelVisitor>(visitor: &mut V, holder: &FacetHolder) {
    for facet in holder.facets() {
        visitor.visit_facet(facet);
    }
}

/// Visit the class facets, then each member
pub fn walk_specification<V: MetaModelVisitor>(visitor: &mut V, spec: &ObjectSpecification) {
    walk_holder(visitor, spec.facets());
    for member in spec.members() {
        visitor.visit_member(member);
    }
}

/// Visit the member facets, then each parameter
pub fn walk_member<V: MetaModelVisitor>(visitor: &mut V, member: &ObjectMember) {
    walk_holder(visitor, member.facets());
    for param in member.parameters() {
        visitor.visit_parameter(param);
    }
}

/// Visit the parameter facets
pub fn walk_parameter<V: MetaModelVisitor>(visitor: &mut V, param: &ParameterSpec) {
    walk_holder(visitor, param.facets());
}

/// Visit each attribute of a facet
pub fn walk_facet<V: MetaModelVisitor>(visitor: &mut V, facet: &Facet) {
    for (name, value) in facet.attributes() {
        visitor.visit_attribute(name, &value);
    }
}
