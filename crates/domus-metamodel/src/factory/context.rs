//! Contexts handed to facet factories
//!
//! A context exposes the feature being processed (read-only descriptors),
//! the holder's current facets, and the two things a factory may change:
//! the holder (through [`add_facet`](ClassContext::add_facet), which applies
//! the precedence policy) and the remaining method set.

use crate::class::{ClassDescriptor, ClassSource, MethodDescriptor, ParamDescriptor, TypeRef};
use crate::facet::{AddOutcome, Facet, FacetHolder};
use crate::factory::MethodRemover;
use crate::feature::FeatureType;

use super::factories::capitalize;

/// Context for processing a class
pub struct ClassContext<'a> {
    /// Class being processed
    pub class: &'a ClassDescriptor,
    /// All known classes
    pub classes: &'a dyn ClassSource,
    pub(crate) holder: &'a mut FacetHolder,
    pub(crate) methods: &'a mut MethodRemover,
    pub(crate) factory: &'static str,
}

/// Context for processing a property, collection or action
pub struct MemberContext<'a> {
    /// Declaring class
    pub class: &'a ClassDescriptor,
    /// Class-level facets (complete by the time members are processed)
    pub class_facets: &'a FacetHolder,
    /// All known classes
    pub classes: &'a dyn ClassSource,
    /// Property, collection or action
    pub feature_type: FeatureType,
    /// Member id (`name` for `getName()`, the method name for actions)
    pub member_id: &'a str,
    /// Accessor (associations) or action method
    pub method: &'a MethodDescriptor,
    pub(crate) holder: &'a mut FacetHolder,
    pub(crate) methods: &'a mut MethodRemover,
    pub(crate) factory: &'static str,
}

/// Context for processing an action parameter
pub struct ParameterContext<'a> {
    /// Declaring class
    pub class: &'a ClassDescriptor,
    /// All known classes
    pub classes: &'a dyn ClassSource,
    /// The action's method
    pub action: &'a MethodDescriptor,
    /// Parameter index
    pub index: usize,
    /// The parameter
    pub param: &'a ParamDescriptor,
    pub(crate) holder: &'a mut FacetHolder,
    pub(crate) methods: &'a mut MethodRemover,
    pub(crate) factory: &'static str,
}

macro_rules! impl_context_sink {
    ($($ctx:ident),*) => {
        $(
            impl<'a> $ctx<'a> {
                /// Offer a facet to the feature's holder
                pub fn add_facet(&mut self, facet: Facet) -> AddOutcome {
                    self.holder.add(facet.with_origin(self.factory))
                }

                /// Facets currently on the feature's holder
                pub fn holder(&self) -> &FacetHolder {
                    &*self.holder
                }

                /// Methods not consumed so far
                pub fn methods(&self) -> &MethodRemover {
                    &*self.methods
                }

                /// Consume a method, returning it if it was still present
                pub fn remove_method(&mut self, name: &str) -> Option<MethodDescriptor> {
                    self.methods.remove(name)
                }

                /// Consume every method matching `pred`
                pub fn remove_methods_where<F>(&mut self, pred: F) -> Vec<MethodDescriptor>
                where
                    F: FnMut(&MethodDescriptor) -> bool,
                {
                    self.methods.remove_where(pred)
                }
            }
        )*
    };
}

impl_context_sink!(ClassContext, MemberContext, ParameterContext);

impl<'a> MemberContext<'a> {
    /// Type of the member: accessor return type or action return type
    pub fn member_type(&self) -> &TypeRef {
        &self.method.returns
    }

    /// Member id with an upper-case first letter, as used in supporting method names
    pub fn capitalized_id(&self) -> String {
        capitalize(self.member_id)
    }
}

impl<'a> ParameterContext<'a> {
    /// Action name with an upper-case first letter, as used in supporting method names
    pub fn capitalized_action(&self) -> String {
        capitalize(&self.action.name)
    }
}
