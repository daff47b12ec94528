//! Runs the programming model over one class
//!
//! Order of work for a class:
//!
//! 1. class factories, in model order (may consume methods)
//! 2. associations: `getX()` / `isX()` accessors are taken out of the method
//!    set, then member factories run for each
//! 3. actions: the remaining candidates are taken out, member factories run
//!    for each, then parameter factories for each parameter
//!
//! Types referenced by members are only registered with the loader, never
//! built, so introspection cannot recurse into another class.

use rustc_hash::{FxHashMap, FxHashSet};

use super::{ObjectMember, ObjectSpecification, ParameterSpec, SpecId};
use crate::class::{ClassDescriptor, ClassName, ClassSource, MethodDescriptor, TypeRef};
use crate::config::IntrospectionPolicy;
use crate::error::{FacetFactoryError, MetaModelError, MetaModelResult};
use crate::facet::FacetHolder;
use crate::factory::factories::decapitalize;
use crate::factory::{
    is_supporting_method, ClassContext, MemberContext, MethodRemover, ParameterContext,
    ProgrammingModel,
};
use crate::feature::{FeatureIdentifier, FeatureType};

/// Phase-1 registration of referenced types
pub(crate) trait TypeRegistrar {
    fn register_type(&self, class: &ClassName) -> MetaModelResult<SpecId>;
}

pub(crate) struct Introspector<'a> {
    pub classes: &'a dyn ClassSource,
    pub model: &'a ProgrammingModel,
    pub policy: IntrospectionPolicy,
    pub registrar: &'a dyn TypeRegistrar,
}

/// Property id of an accessor, if the method is one
pub(crate) fn accessor_id(method: &MethodDescriptor) -> Option<String> {
    if !method.is_public || method.is_static || !method.params.is_empty() || method.returns.is_void() {
        return None;
    }
    let rest = match method.name.strip_prefix("get") {
        Some(rest) => rest,
        None => {
            let rest = method.name.strip_prefix("is")?;
            if method.returns != TypeRef::class("boolean") {
                return None;
            }
            rest
        }
    };
    rest.chars()
        .next()
        .filter(|c| c.is_uppercase())
        .map(|_| decapitalize(rest))
}

fn failure(class: &ClassName, factory: &'static str, feature: &FeatureIdentifier, source: FacetFactoryError) -> MetaModelError {
    MetaModelError::PipelineFailure {
        class: class.clone(),
        factory,
        feature: feature.to_string(),
        source,
    }
}

impl<'a> Introspector<'a> {
    /// Build the specification of `class` into slot `id`
    pub fn introspect(&self, id: SpecId, class: &ClassDescriptor) -> MetaModelResult<ObjectSpecification> {
        let superclass = class
            .superclass
            .as_ref()
            .map(|s| self.registrar.register_type(s))
            .transpose()?;

        let class_id = FeatureIdentifier::class(class.name.clone());
        let mut facets = FacetHolder::new(class_id.clone());
        let mut methods = MethodRemover::new(self.method_set(class));

        for factory in self.model.factories_for(FeatureType::Class) {
            let name = factory.meta().name;
            let mut ctx = ClassContext {
                class,
                classes: self.classes,
                holder: &mut facets,
                methods: &mut methods,
                factory: name,
            };
            factory
                .process_class(&mut ctx)
                .map_err(|e| failure(&class.name, name, &class_id, e))?;
        }

        let mut members = Vec::new();
        let mut unconsumed = Vec::new();
        let mut seen = FxHashSet::default();

        let accessors = methods.remove_where(|m| accessor_id(m).is_some());
        for accessor in &accessors {
            let Some(member_id) = accessor_id(accessor) else {
                continue;
            };
            if !seen.insert(member_id.clone()) {
                // `getX` and `isX` for one property: the first declared wins.
                unconsumed.push(accessor.name.clone());
                continue;
            }
            let feature_type = if accessor.returns.is_collection() {
                FeatureType::Collection
            } else {
                FeatureType::Property
            };
            members.push(self.member(class, &facets, &mut methods, feature_type, member_id, accessor)?);
        }

        let actions = methods.remove_where(|m| self.is_action_candidate(m));
        for action in &actions {
            if !seen.insert(action.name.clone()) {
                // Overloads share an id; only the first becomes an action.
                unconsumed.push(action.name.clone());
                continue;
            }
            members.push(self.member(class, &facets, &mut methods, FeatureType::Action, action.name.clone(), action)?);
        }

        unconsumed.extend(methods.remaining().iter().map(|m| m.name.clone()));

        let member_index: FxHashMap<String, usize> = members
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect();

        Ok(ObjectSpecification {
            id,
            class: class.name.clone(),
            kind: class.kind.clone(),
            superclass,
            facets,
            members,
            member_index,
            unconsumed_methods: unconsumed,
        })
    }

    /// Declared methods plus inherited ones; a subclass method hides an
    /// inherited method with the same name and arity
    fn method_set(&self, class: &ClassDescriptor) -> Vec<MethodDescriptor> {
        let mut methods = class.methods.clone();
        for parent in self.classes.superclasses(&class.name) {
            let Some(desc) = self.classes.describe(&parent) else {
                break;
            };
            for method in &desc.methods {
                let hidden = methods
                    .iter()
                    .any(|m| m.name == method.name && m.params.len() == method.params.len());
                if !hidden {
                    methods.push(method.clone());
                }
            }
        }
        methods
    }

    fn is_action_candidate(&self, method: &MethodDescriptor) -> bool {
        if !method.is_public || method.is_static || is_supporting_method(&method.name) {
            return false;
        }
        match self.policy {
            IntrospectionPolicy::AllPublic => true,
            IntrospectionPolicy::AnnotationRequired => method.find_marker("Action").is_some(),
        }
    }

    fn register(&self, ty: &TypeRef) -> MetaModelResult<Option<SpecId>> {
        ty.class_name()
            .map(|c| self.registrar.register_type(c))
            .transpose()
    }

    fn member(
        &self,
        class: &ClassDescriptor,
        class_facets: &FacetHolder,
        methods: &mut MethodRemover,
        feature_type: FeatureType,
        member_id: String,
        method: &MethodDescriptor,
    ) -> MetaModelResult<ObjectMember> {
        let identifier = FeatureIdentifier::member(class.name.clone(), member_id.clone());
        let mut holder = FacetHolder::new(identifier.clone());

        for factory in self.model.factories_for(feature_type) {
            let name = factory.meta().name;
            let mut ctx = MemberContext {
                class,
                class_facets,
                classes: self.classes,
                feature_type,
                member_id: &member_id,
                method,
                holder: &mut holder,
                methods: &mut *methods,
                factory: name,
            };
            factory
                .process_member(&mut ctx)
                .map_err(|e| failure(&class.name, name, &identifier, e))?;
        }

        let mut parameters = Vec::new();
        if feature_type == FeatureType::Action {
            for (index, param) in method.params.iter().enumerate() {
                let param_id = FeatureIdentifier::parameter(class.name.clone(), member_id.clone(), index);
                let mut param_holder = FacetHolder::new(param_id.clone());

                for factory in self.model.factories_for(FeatureType::Parameter) {
                    let name = factory.meta().name;
                    let mut ctx = ParameterContext {
                        class,
                        classes: self.classes,
                        action: method,
                        index,
                        param,
                        holder: &mut param_holder,
                        methods: &mut *methods,
                        factory: name,
                    };
                    factory
                        .process_parameter(&mut ctx)
                        .map_err(|e| failure(&class.name, name, &param_id, e))?;
                }

                parameters.push(ParameterSpec {
                    index,
                    name: param.name.clone(),
                    type_ref: param.ty.clone(),
                    type_spec: self.register(&param.ty)?,
                    facets: param_holder,
                });
            }
        }

        Ok(ObjectMember {
            id: member_id,
            feature_type,
            method: method.name.clone(),
            type_ref: method.returns.clone(),
            type_spec: self.register(&method.returns)?,
            facets: holder,
            parameters,
        })
    }
}
