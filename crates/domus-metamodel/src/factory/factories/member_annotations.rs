//! Factory: member-annotations
//!
//! Declarative markers on members and parameters:
//!
//! - `Property(maxLength, editing, optionality, regexPattern)`
//! - `Collection(editing)`
//! - `Action(semantics)`
//! - `Parameter(maxLength, optionality, regexPattern)`
//! - `Hidden`, `Disabled(reason)`, `Named(value)`, `DescribedAs(value)`
//!
//! An enumeration attribute with an unknown constant fails the build.

use crate::class::{find_marker, Marker};
use crate::error::FacetFactoryError;
use crate::facet::{Facet, FacetKind, Precedence, Semantics};
use crate::factory::{FacetFactory, FactoryMeta, MemberContext, ParameterContext};
use crate::feature::{FeatureType, FeatureTypes};

use super::{enum_attr, not_a_member, str_attr, uint_attr, Editing, Optionality, Toggle};

/// Facets from member and parameter markers
pub struct MemberAnnotations;

static META: FactoryMeta = FactoryMeta {
    name: "member-annotations",
    description: "Property, Collection, Action, Parameter and common member markers",
    feature_types: FeatureTypes::MEMBERS_AND_PARAMETERS,
};

fn explicit(kind: FacetKind) -> Facet {
    Facet::new(kind, Precedence::Explicit)
}

fn editing(marker: &Marker, out: &mut Vec<Facet>) -> Result<(), FacetFactoryError> {
    let reason = str_attr(marker, "editingDisabledReason")?;
    match enum_attr::<Editing>(marker, "editing")?.map(|e| e.0) {
        Some(Toggle::On) => out.push(explicit(FacetKind::Mutability {
            editable: true,
            reason: None,
        })),
        Some(Toggle::Off) => out.push(explicit(FacetKind::Mutability {
            editable: false,
            reason: reason.map(str::to_string),
        })),
        Some(Toggle::AsConfigured) | None => {}
    }
    Ok(())
}

fn value_constraints(marker: &Marker, out: &mut Vec<Facet>) -> Result<(), FacetFactoryError> {
    if let Some(len) = uint_attr(marker, "maxLength")? {
        out.push(explicit(FacetKind::MaxLength(len)));
    }
    match enum_attr::<Optionality>(marker, "optionality")?.map(|o| o.0) {
        Some(Toggle::On) => out.push(explicit(FacetKind::Mandatory { required: true })),
        Some(Toggle::Off) => out.push(explicit(FacetKind::Mandatory { required: false })),
        Some(Toggle::AsConfigured) | None => {}
    }
    if let Some(pattern) = str_attr(marker, "regexPattern")? {
        out.push(explicit(FacetKind::Regex {
            pattern: pattern.to_string(),
        }));
    }
    Ok(())
}

fn common(markers: &[Marker], out: &mut Vec<Facet>) -> Result<(), FacetFactoryError> {
    if find_marker(markers, "Hidden").is_some() {
        out.push(explicit(FacetKind::Visibility { hidden: true }));
    }
    if let Some(marker) = find_marker(markers, "Disabled") {
        out.push(explicit(FacetKind::Mutability {
            editable: false,
            reason: str_attr(marker, "reason")?.map(str::to_string),
        }));
    }
    if let Some(name) = find_marker(markers, "Named").map(|m| str_attr(m, "value")).transpose()?.flatten() {
        out.push(explicit(FacetKind::Named { name: name.to_string() }));
    }
    if let Some(text) = find_marker(markers, "DescribedAs")
        .map(|m| str_attr(m, "value"))
        .transpose()?
        .flatten()
    {
        out.push(explicit(FacetKind::Description { text: text.to_string() }));
    }
    Ok(())
}

impl FacetFactory for MemberAnnotations {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) -> Result<(), FacetFactoryError> {
        let method = ctx.method;
        let mut facets = Vec::new();

        match ctx.feature_type {
            FeatureType::Property => {
                if let Some(marker) = method.find_marker("Property") {
                    editing(marker, &mut facets)?;
                    value_constraints(marker, &mut facets)?;
                }
            }
            FeatureType::Collection => {
                if let Some(marker) = method.find_marker("Collection") {
                    editing(marker, &mut facets)?;
                }
            }
            FeatureType::Action => {
                if let Some(marker) = method.find_marker("Action") {
                    if let Some(semantics) = enum_attr::<Semantics>(marker, "semantics")? {
                        facets.push(explicit(FacetKind::ActionSemantics(semantics)));
                    }
                }
            }
            FeatureType::Class | FeatureType::Parameter => return Err(not_a_member(ctx.feature_type)),
        }
        common(&method.markers, &mut facets)?;

        for facet in facets {
            ctx.add_facet(facet);
        }
        Ok(())
    }

    fn process_parameter(&self, ctx: &mut ParameterContext<'_>) -> Result<(), FacetFactoryError> {
        let param = ctx.param;
        let mut facets = Vec::new();

        if let Some(marker) = find_marker(&param.markers, "Parameter") {
            value_constraints(marker, &mut facets)?;
        }
        common(&param.markers, &mut facets)?;

        for facet in facets {
            ctx.add_facet(facet);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::class::{ClassDescriptor, Marker, MethodDescriptor, ParamDescriptor, TypeRef};
    use crate::error::{FacetFactoryError, MetaModelError};
    use crate::facet::{FacetKind, FacetType, Precedence, Semantics};
    use crate::factory::factories::test_support::{load, try_load};

    fn customer(property: Marker) -> ClassDescriptor {
        ClassDescriptor::new("Customer")
            .method(
                MethodDescriptor::new("getName")
                    .returns(TypeRef::class("string"))
                    .marker(property),
            )
            .method(
                MethodDescriptor::new("setName")
                    .param(ParamDescriptor::new("name", TypeRef::class("string"))),
            )
    }

    #[test]
    fn test_property_marker() {
        let marker = Marker::new("Property")
            .with("maxLength", 30)
            .with("editing", "DISABLED")
            .with("editingDisabledReason", "Set at creation")
            .with("optionality", "OPTIONAL")
            .with("regexPattern", "[A-Z].*");
        let spec = load(vec![customer(marker)], "Customer");
        let name = spec.member("name").unwrap();

        assert_eq!(name.facets().max_length(), Some(30));
        assert!(!name.facets().is_editable());
        assert_eq!(
            name.facets().kind(FacetType::Mandatory),
            Some(&FacetKind::Mandatory { required: false })
        );
        assert_eq!(
            name.facets().kind(FacetType::Regex),
            Some(&FacetKind::Regex { pattern: "[A-Z].*".to_string() })
        );
        assert_eq!(
            name.facets().get(FacetType::Mandatory).unwrap().precedence(),
            Precedence::Explicit
        );
    }

    #[test]
    fn test_as_configured_keeps_defaults() {
        let marker = Marker::new("Property")
            .with("editing", "AS_CONFIGURED")
            .with("optionality", "DEFAULT");
        let spec = load(vec![customer(marker)], "Customer");
        let name = spec.member("name").unwrap();
        assert!(name.facets().is_editable());
        assert_eq!(
            name.facets().get(FacetType::Mandatory).unwrap().precedence(),
            Precedence::Default
        );
    }

    #[test]
    fn test_unknown_enum_value_fails() {
        let marker = Marker::new("Property").with("editing", "SOMETIMES");
        let err = try_load(vec![customer(marker)], "Customer").unwrap_err();
        match err {
            MetaModelError::PipelineFailure { factory, feature, source, .. } => {
                assert_eq!(factory, "member-annotations");
                assert_eq!(feature, "Customer#name");
                assert!(matches!(source, FacetFactoryError::UnrecognizedValue { ref value, .. } if value == "SOMETIMES"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_action_and_parameter_markers() {
        let class = ClassDescriptor::new("Customer").method(
            MethodDescriptor::new("lookup")
                .marker(Marker::new("Action").with("semantics", "SAFE"))
                .marker(Marker::new("DescribedAs").with("value", "Find a customer"))
                .param(
                    ParamDescriptor::new("query", TypeRef::class("string"))
                        .marker(Marker::new("Parameter").with("maxLength", 40))
                        .marker(Marker::new("Named").with("value", "Search for")),
                ),
        );
        let spec = load(vec![class], "Customer");
        let action = spec.member("lookup").unwrap();
        assert_eq!(
            action.facets().kind(FacetType::ActionSemantics),
            Some(&FacetKind::ActionSemantics(Semantics::Safe))
        );
        assert!(action.facets().contains(FacetType::Description));
        let param = &action.parameters()[0];
        assert_eq!(param.facets().max_length(), Some(40));
        assert_eq!(param.facets().named(), Some("Search for"));
    }

    #[test]
    fn test_hidden_and_disabled() {
        let class = ClassDescriptor::new("Customer").method(
            MethodDescriptor::new("getCode")
                .returns(TypeRef::class("string"))
                .marker(Marker::new("Hidden"))
                .marker(Marker::new("Disabled").with("reason", "system managed")),
        );
        let spec = load(vec![class], "Customer");
        let code = spec.member("code").unwrap();
        assert!(code.facets().is_hidden());
        assert_eq!(
            code.facets().kind(FacetType::Mutability),
            Some(&FacetKind::Mutability {
                editable: false,
                reason: Some("system managed".to_string()),
            })
        );
    }

    #[test]
    fn test_non_member_feature_type_rejected() {
        use crate::class::{ClassName, ClassRegistry};
        use crate::facet::FacetHolder;
        use crate::factory::{FacetFactory, MemberContext, MethodRemover};
        use crate::feature::{FeatureIdentifier, FeatureType};

        let class = customer(Marker::new("Property"));
        let registry = ClassRegistry::new();
        let class_facets = FacetHolder::new(FeatureIdentifier::class(ClassName::new("Customer")));
        let mut holder = FacetHolder::new(FeatureIdentifier::member(ClassName::new("Customer"), "name"));
        let mut methods = MethodRemover::new(class.methods.clone());
        let mut ctx = MemberContext {
            class: &class,
            class_facets: &class_facets,
            classes: &registry,
            feature_type: FeatureType::Parameter,
            member_id: "name",
            method: &class.methods[0],
            holder: &mut holder,
            methods: &mut methods,
            factory: "member-annotations",
        };
        let err = super::MemberAnnotations.process_member(&mut ctx).unwrap_err();
        assert!(matches!(err, FacetFactoryError::Failed(ref msg) if msg.contains("parameter")));
        assert!(holder.is_empty());
    }
}
