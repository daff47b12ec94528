//! Factory: fallback
//!
//! Framework defaults every feature starts with. Everything here is
//! contributed at `Inferred` or `Default` precedence so any declared
//! behavior replaces it.

use crate::error::FacetFactoryError;
use crate::facet::{Facet, FacetKind, Precedence, Semantics};
use crate::factory::{ClassContext, FacetFactory, FactoryMeta, MemberContext, ParameterContext};
use crate::feature::{FeatureType, FeatureTypes};

use super::{natural_name, not_a_member};

/// Default facets every feature starts with
pub struct Fallback;

static META: FactoryMeta = FactoryMeta {
    name: "fallback",
    description: "Default names, optionality and action semantics",
    feature_types: FeatureTypes::ALL,
};

fn named(id: &str) -> Facet {
    Facet::new(
        FacetKind::Named {
            name: natural_name(id),
        },
        Precedence::Inferred,
    )
}

impl FacetFactory for Fallback {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) -> Result<(), FacetFactoryError> {
        let name = ctx.class.name.simple_name().to_string();
        ctx.add_facet(named(&name));
        Ok(())
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) -> Result<(), FacetFactoryError> {
        let id = ctx.member_id.to_string();
        ctx.add_facet(named(&id));
        match ctx.feature_type {
            FeatureType::Property => {
                ctx.add_facet(Facet::new(FacetKind::Mandatory { required: true }, Precedence::Default));
            }
            FeatureType::Action => {
                ctx.add_facet(Facet::new(
                    FacetKind::ActionSemantics(Semantics::NonIdempotent),
                    Precedence::Default,
                ));
            }
            FeatureType::Collection => {}
            FeatureType::Class | FeatureType::Parameter => return Err(not_a_member(ctx.feature_type)),
        }
        Ok(())
    }

    fn process_parameter(&self, ctx: &mut ParameterContext<'_>) -> Result<(), FacetFactoryError> {
        let name = ctx.param.name.clone();
        ctx.add_facet(named(&name));
        ctx.add_facet(Facet::new(FacetKind::Mandatory { required: true }, Precedence::Default));
        Ok(())
    }
}
