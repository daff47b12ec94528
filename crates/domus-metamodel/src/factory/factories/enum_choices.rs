//! Factory: enum-choices
//!
//! Members and parameters typed by an enum choose from its constants.

use crate::class::{ClassSource, TypeRef};
use crate::error::FacetFactoryError;
use crate::facet::{ChoicesSource, Facet, FacetKind, Precedence};
use crate::factory::{FacetFactory, FactoryMeta, MemberContext, ParameterContext};
use crate::feature::{FeatureType, FeatureTypes};

/// Choices from the constants of enum-typed features
pub struct EnumChoices;

static META: FactoryMeta = FactoryMeta {
    name: "enum-choices",
    description: "Choices from the constants of enum-typed values",
    feature_types: FeatureTypes::PROPERTIES_AND_PARAMETERS,
};

fn choices(classes: &dyn ClassSource, ty: &TypeRef) -> Option<Facet> {
    let TypeRef::Class(name) = ty else {
        return None;
    };
    let class = classes.describe(name)?;
    let constants = class.enum_constants()?.to_vec();
    Some(Facet::new(
        FacetKind::ChoicesProvider(ChoicesSource::EnumConstants(constants)),
        Precedence::Inferred,
    ))
}

impl FacetFactory for EnumChoices {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) -> Result<(), FacetFactoryError> {
        if ctx.feature_type != FeatureType::Property {
            return Ok(());
        }
        if let Some(facet) = choices(ctx.classes, ctx.member_type()) {
            ctx.add_facet(facet);
        }
        Ok(())
    }

    fn process_parameter(&self, ctx: &mut ParameterContext<'_>) -> Result<(), FacetFactoryError> {
        if let Some(facet) = choices(ctx.classes, &ctx.param.ty) {
            ctx.add_facet(facet);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::class::{ClassDescriptor, MethodDescriptor, ParamDescriptor, TypeRef};
    use crate::facet::{ChoicesSource, FacetKind, FacetType};
    use crate::factory::factories::test_support::load;

    fn classes() -> Vec<ClassDescriptor> {
        vec![
            ClassDescriptor::enumeration("Status", &["OPEN", "CLOSED"]),
            ClassDescriptor::new("Ticket")
                .method(MethodDescriptor::new("getStatus").returns(TypeRef::class("Status")))
                .method(MethodDescriptor::new("choicesStatus").returns(TypeRef::collection("Status")))
                .method(
                    MethodDescriptor::new("reopen")
                        .param(ParamDescriptor::new("status", TypeRef::class("Status"))),
                ),
        ]
    }

    #[test]
    fn test_enum_parameter_choices() {
        let spec = load(classes(), "Ticket");
        let param = &spec.member("reopen").unwrap().parameters()[0];
        assert_eq!(
            param.facets().kind(FacetType::ChoicesProvider),
            Some(&FacetKind::ChoicesProvider(ChoicesSource::EnumConstants(vec![
                "OPEN".to_string(),
                "CLOSED".to_string(),
            ])))
        );
    }

    #[test]
    fn test_explicit_choices_method_not_trampled() {
        let spec = load(classes(), "Ticket");
        let status = spec.member("status").unwrap();
        assert_eq!(
            status.facets().kind(FacetType::ChoicesProvider),
            Some(&FacetKind::ChoicesProvider(ChoicesSource::Method("choicesStatus".to_string())))
        );
    }
}
